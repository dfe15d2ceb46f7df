//! End-to-end tests against synthetic output files.
//!
//! The writer below produces the scenario file: 1 subcatchment with 2
//! variables, 2 nodes with 3 variables each, 1 link with 2 variables,
//! no pollutants, and 1 system variable, over 3 hourly periods.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::Duration;
use swmm_reader::swmm::epoch;
use swmm_reader::{ObjectKind, PropertyValue, SeriesRequest, SwmmError, SwmmReader};
use tempfile::NamedTempFile;

const MAGIC: i32 = 516_114_522;
const N_PERIODS: i32 = 3;
const START_DAY: f64 = 36526.0;
const REPORT_SECONDS: i32 = 3600;

/// Deterministic value for one (kind code, item, variable, period) cell.
fn cell(kind: ObjectKind, item: usize, var: usize, period: usize) -> f32 {
    (1000 * kind.code() + 100 * item + 10 * var + period) as f32 * 0.5
}

fn raw_date(period: usize) -> f64 {
    START_DAY + (period as f64 * f64::from(REPORT_SECONDS)) / 86400.0
}

struct FileTweaks {
    magic2: i32,
    error_code: i32,
    n_periods: i32,
}

impl Default for FileTweaks {
    fn default() -> Self {
        Self {
            magic2: MAGIC,
            error_code: 0,
            n_periods: N_PERIODS,
        }
    }
}

fn write_scenario_file(tweaks: FileTweaks) -> NamedTempFile {
    let mut buf: Vec<u8> = Vec::new();

    buf.write_i32::<LittleEndian>(MAGIC).unwrap();
    buf.write_i32::<LittleEndian>(51013).unwrap(); // engine version
    buf.write_i32::<LittleEndian>(3).unwrap(); // flow units: CMS
    buf.write_i32::<LittleEndian>(1).unwrap(); // subcatchments
    buf.write_i32::<LittleEndian>(2).unwrap(); // nodes
    buf.write_i32::<LittleEndian>(1).unwrap(); // links
    buf.write_i32::<LittleEndian>(0).unwrap(); // pollutants

    let names_start = buf.len() as i32;
    for name in ["S1", "N1", "N2", "L1"] {
        buf.write_i32::<LittleEndian>(name.len() as i32).unwrap();
        buf.extend_from_slice(name.as_bytes());
    }
    // No pollutant unit codes.

    // Subcatchment properties: Area only.
    buf.write_i32::<LittleEndian>(1).unwrap();
    buf.write_i32::<LittleEndian>(1).unwrap();
    buf.write_f32::<LittleEndian>(42.5).unwrap();

    // Node properties: Type, Inv_elev, Max_depth.
    buf.write_i32::<LittleEndian>(3).unwrap();
    for code in [0, 2, 3] {
        buf.write_i32::<LittleEndian>(code).unwrap();
    }
    for (type_code, elev, depth) in [(0i32, 100.0f32, 2.5f32), (1, 95.0, 0.0)] {
        buf.write_i32::<LittleEndian>(type_code).unwrap();
        buf.write_f32::<LittleEndian>(elev).unwrap();
        buf.write_f32::<LittleEndian>(depth).unwrap();
    }

    // Link properties: Type, Inv_offset, Max_depth, Length.
    buf.write_i32::<LittleEndian>(4).unwrap();
    for code in [0, 4, 3, 5] {
        buf.write_i32::<LittleEndian>(code).unwrap();
    }
    buf.write_i32::<LittleEndian>(0).unwrap();
    for value in [0.0f32, 1.2, 120.0] {
        buf.write_f32::<LittleEndian>(value).unwrap();
    }

    // Variable-code lists: subcatchment, node, link, system.
    for codes in [vec![0, 1], vec![0, 1, 2], vec![0, 1], vec![4]] {
        buf.write_i32::<LittleEndian>(codes.len() as i32).unwrap();
        for code in codes {
            buf.write_i32::<LittleEndian>(code).unwrap();
        }
    }

    buf.write_f64::<LittleEndian>(START_DAY).unwrap();
    buf.write_i32::<LittleEndian>(REPORT_SECONDS).unwrap();

    let records_start = buf.len() as i32;
    for period in 0..N_PERIODS as usize {
        buf.write_f64::<LittleEndian>(raw_date(period)).unwrap();
        for var in 0..2 {
            buf.write_f32::<LittleEndian>(cell(ObjectKind::Subcatchment, 0, var, period))
                .unwrap();
        }
        for item in 0..2 {
            for var in 0..3 {
                buf.write_f32::<LittleEndian>(cell(ObjectKind::Node, item, var, period))
                    .unwrap();
            }
        }
        for var in 0..2 {
            buf.write_f32::<LittleEndian>(cell(ObjectKind::Link, 0, var, period))
                .unwrap();
        }
        buf.write_f32::<LittleEndian>(cell(ObjectKind::System, 0, 0, period))
            .unwrap();
    }

    buf.write_i32::<LittleEndian>(names_start).unwrap();
    buf.write_i32::<LittleEndian>(0).unwrap();
    buf.write_i32::<LittleEndian>(records_start).unwrap();
    buf.write_i32::<LittleEndian>(tweaks.n_periods).unwrap();
    buf.write_i32::<LittleEndian>(tweaks.error_code).unwrap();
    buf.write_i32::<LittleEndian>(tweaks.magic2).unwrap();

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&buf).unwrap();
    file.flush().unwrap();
    file
}

fn open_scenario() -> (NamedTempFile, SwmmReader) {
    let file = write_scenario_file(FileTweaks::default());
    let reader = SwmmReader::new(file.path()).unwrap();
    (file, reader)
}

#[test]
fn geometry_matches_the_header() {
    let (_file, reader) = open_scenario();
    let g = reader.geometry();
    assert_eq!(g.n_subcatchments, 1);
    assert_eq!(g.n_nodes, 2);
    assert_eq!(g.n_links, 1);
    assert_eq!(g.n_pollutants, 0);
    assert_eq!(g.n_subcatchment_vars, 2);
    assert_eq!(g.n_node_vars, 3);
    assert_eq!(g.n_link_vars, 2);
    assert_eq!(g.n_system_vars, 1);
    assert_eq!(g.n_periods, 3);
    assert_eq!(g.report_interval, 3600);
    assert_eq!(g.start_date, epoch() + Duration::days(START_DAY as i64));

    // bytesPerPeriod = 4 * (2 + 1*2 + 2*3 + 1*2 + 1)
    assert_eq!(g.bytes_per_period, 4 * 13);
}

#[test]
fn catalog_lists_names_and_variables() {
    let (_file, reader) = open_scenario();
    assert_eq!(reader.objects(ObjectKind::Subcatchment), ["S1"]);
    assert_eq!(reader.objects(ObjectKind::Node), ["N1", "N2"]);
    assert_eq!(reader.objects(ObjectKind::Link), ["L1"]);
    assert!(reader.objects(ObjectKind::Pollutant).is_empty());
    // System "names" are the labels of the declared system codes.
    assert_eq!(reader.objects(ObjectKind::System), ["Runoff"]);

    let node_vars = reader.variables(ObjectKind::Node);
    assert_eq!(node_vars[0], (0, "Depth_above_invert".to_string()));
    assert_eq!(node_vars[2], (2, "Volume_stored_ponded".to_string()));
    assert_eq!(reader.variables(ObjectKind::System), [(4, "Runoff".to_string())]);
}

#[test]
fn object_properties_round_trip() {
    let (_file, reader) = open_scenario();
    let props = reader.properties(ObjectKind::Node, "N2").unwrap();
    assert_eq!(props[0].code, 0);
    assert_eq!(props[0].value, PropertyValue::TypeCode(1));
    assert_eq!(props[1].value, PropertyValue::Number(95.0));

    let props = reader.properties(ObjectKind::Subcatchment, "S1").unwrap();
    assert_eq!(props, [swmm_reader::ObjectProperty {
        code: 1,
        value: PropertyValue::Number(42.5),
    }]);
}

#[test]
fn single_series_reads_values_and_timestamps() {
    let (_file, reader) = open_scenario();
    let series = reader.single_series(ObjectKind::Node, "N2", 1).unwrap();
    assert_eq!(series.len(), 3);
    for (period, (timestamp, value)) in series.iter().enumerate() {
        assert_eq!(*value, cell(ObjectKind::Node, 1, 1, period));
        let expected = epoch()
            + Duration::days(START_DAY as i64)
            + Duration::seconds(i64::from(REPORT_SECONDS) * period as i64);
        assert_eq!(*timestamp, expected);
    }
}

#[test]
fn bulk_matches_single_exactly_for_every_series() {
    let (_file, reader) = open_scenario();
    let mut requests = Vec::new();
    for (kind, names, n_vars) in [
        (ObjectKind::Subcatchment, vec!["S1"], 2usize),
        (ObjectKind::Node, vec!["N1", "N2"], 3),
        (ObjectKind::Link, vec!["L1"], 2),
        (ObjectKind::System, vec!["Runoff"], 1),
    ] {
        for name in names {
            for var in 0..n_vars {
                requests.push(SeriesRequest::new(kind, name, var));
            }
        }
    }

    let table = reader.bulk_series(&requests).unwrap();
    assert_eq!(table.columns.len(), requests.len());
    assert_eq!(table.timestamps.len(), 3);

    for request in &requests {
        let single = reader
            .single_series(request.kind, &request.name, request.var_index)
            .unwrap();
        let item_index = match request.kind {
            ObjectKind::System => 0,
            kind => reader.catalog().resolve(kind, &request.name).unwrap(),
        };
        let column = table
            .columns
            .iter()
            .find(|c| {
                c.kind == request.kind
                    && c.item_index == item_index
                    && c.var_index == request.var_index
            })
            .unwrap();
        for (period, (timestamp, value)) in single.iter().enumerate() {
            assert_eq!(column.values[period], *value, "column {}", column.label);
            assert_eq!(table.timestamps[period], *timestamp);
        }
    }
}

#[test]
fn bulk_columns_come_out_in_canonical_order() {
    let (_file, reader) = open_scenario();
    // Shuffled input order, one exact duplicate, and one same-name pair
    // with different variable indices.
    let requests = vec![
        SeriesRequest::new(ObjectKind::Link, "L1", 1),
        SeriesRequest::new(ObjectKind::Node, "N2", 2),
        SeriesRequest::new(ObjectKind::Subcatchment, "S1", 1),
        SeriesRequest::new(ObjectKind::Node, "N2", 0),
        SeriesRequest::new(ObjectKind::Node, "N2", 2), // duplicate collapses
        SeriesRequest::new(ObjectKind::System, "Runoff", 0),
    ];
    let table = reader.bulk_series(&requests).unwrap();

    let order: Vec<(ObjectKind, usize, usize)> = table
        .columns
        .iter()
        .map(|c| (c.kind, c.item_index, c.var_index))
        .collect();
    assert_eq!(
        order,
        vec![
            (ObjectKind::Subcatchment, 0, 1),
            (ObjectKind::Node, 1, 0),
            (ObjectKind::Node, 1, 2),
            (ObjectKind::Link, 0, 1),
            (ObjectKind::System, 0, 0),
        ]
    );

    let labels: Vec<&str> = table.columns.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "subcatchment_S1_Snow_depth",
            "node_N2_Depth_above_invert",
            "node_N2_Volume_stored_ponded",
            "link_L1_Flow_depth",
            "system_Runoff_Runoff",
        ]
    );

    // Same resolved item index behind the two N2 columns.
    assert_eq!(table.columns[1].item_index, table.columns[2].item_index);
}

#[test]
fn lookup_errors_fire_before_any_record_io() {
    let (_file, reader) = open_scenario();
    assert!(matches!(
        reader.single_series(ObjectKind::Node, "N9", 0),
        Err(SwmmError::NameNotFound { .. })
    ));
    assert!(matches!(
        reader.single_series(ObjectKind::Node, "N1", 3),
        Err(SwmmError::VariableOutOfRange {
            index: 3,
            available: 3,
            ..
        })
    ));
    assert!(matches!(
        reader.bulk_series(&[SeriesRequest::new(ObjectKind::Pollutant, "TSS", 0)]),
        Err(SwmmError::NoSeriesForKind(ObjectKind::Pollutant))
    ));
}

#[test]
fn period_range_spans_first_and_last_records() {
    let (_file, reader) = open_scenario();
    let (first, last) = reader.period_range().unwrap();
    assert_eq!(first, epoch() + Duration::days(START_DAY as i64));
    assert_eq!(last, first + Duration::seconds(2 * 3600));
}

#[test]
fn open_rejects_bad_trailer_magic() {
    let file = write_scenario_file(FileTweaks {
        magic2: 0x1234,
        ..Default::default()
    });
    assert!(matches!(
        SwmmReader::new(file.path()),
        Err(SwmmError::BadMagic {
            location: "trailer",
            ..
        })
    ));
}

#[test]
fn open_rejects_failed_runs_and_empty_files() {
    let file = write_scenario_file(FileTweaks {
        error_code: 2,
        ..Default::default()
    });
    assert!(matches!(
        SwmmReader::new(file.path()),
        Err(SwmmError::RunFailed(2))
    ));

    let file = write_scenario_file(FileTweaks {
        n_periods: 0,
        ..Default::default()
    });
    assert!(matches!(
        SwmmReader::new(file.path()),
        Err(SwmmError::NoPeriods)
    ));
}

#[test]
fn open_rejects_non_swmm_files() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"definitely not a simulation results file, but long enough to read")
        .unwrap();
    file.flush().unwrap();
    assert!(matches!(
        SwmmReader::new(file.path()),
        Err(SwmmError::BadMagic {
            location: "start of file",
            ..
        })
    ));
}
