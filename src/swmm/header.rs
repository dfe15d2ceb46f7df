//! Header, trailer, and name-table parsing.
//!
//! File layout (all fields native little-endian, 4-byte record units):
//! - magic-1 (i32), then version, flow units, and the four object counts
//! - name tables, property tables, and variable-code tables at the
//!   names-start offset recorded in the trailer
//! - start date (f64 day-count) and report interval (i32 seconds)
//! - period records at the records-start offset
//! - trailer (last 24 bytes): names-start, reserved, records-start,
//!   period count, error code, magic-2 (six i32)

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::WINDOWS_1252;
use log::{debug, info, trace};

use super::catalog::Catalog;
use super::dates;
use super::error::{Result, SwmmError};
use super::models::{
    FormatVersion, Geometry, ObjectKind, ObjectProperty, PropertyValue, RECORD_SIZE,
};
use super::varcode;

/// Magic-number marker found at the start of the file and in the trailer.
pub const MAGIC: i32 = 516_114_522;

const TRAILER_FIELDS: i64 = 6;

/// Parse the fixed-layout header and trailer into an immutable geometry
/// description plus the object/variable catalog.
///
/// # Errors
/// Fails without recovery when a magic marker is wrong, the stored error
/// code is nonzero, the period count is zero, or any read comes up short.
pub fn parse<R: Read + Seek>(file: &mut R) -> Result<(Geometry, Catalog)> {
    // Trailer first: it locates every other section.
    file.seek(SeekFrom::End(-TRAILER_FIELDS * RECORD_SIZE as i64))?;
    let names_start = file.read_i32::<LittleEndian>()?;
    let _reserved = file.read_i32::<LittleEndian>()?;
    let records_start = file.read_i32::<LittleEndian>()?;
    let n_periods = file.read_i32::<LittleEndian>()?;
    let error_code = file.read_i32::<LittleEndian>()?;
    let magic2 = file.read_i32::<LittleEndian>()?;

    file.seek(SeekFrom::Start(0))?;
    let magic1 = file.read_i32::<LittleEndian>()?;

    if magic1 != MAGIC {
        return Err(SwmmError::BadMagic {
            location: "start of file",
            expected: MAGIC,
            found: magic1,
        });
    }
    if magic2 != MAGIC {
        return Err(SwmmError::BadMagic {
            location: "trailer",
            expected: MAGIC,
            found: magic2,
        });
    }
    if error_code != 0 {
        return Err(SwmmError::RunFailed(error_code));
    }
    if n_periods <= 0 {
        return Err(SwmmError::NoPeriods);
    }

    let engine_version = file.read_i32::<LittleEndian>()?;
    let flow_units = file.read_i32::<LittleEndian>()?;
    let n_subcatchments = non_negative(file.read_i32::<LittleEndian>()?, "subcatchment count")?;
    let n_nodes = non_negative(file.read_i32::<LittleEndian>()?, "node count")?;
    let n_links = non_negative(file.read_i32::<LittleEndian>()?, "link count")?;
    let n_pollutants = non_negative(file.read_i32::<LittleEndian>()?, "pollutant count")?;

    let format_version = FormatVersion::from_engine_version(engine_version);
    debug!(
        "Header counts: version={engine_version}, subcatchments={n_subcatchments}, \
         nodes={n_nodes}, links={n_links}, pollutants={n_pollutants}"
    );

    // Name tables for subcatchment/node/link/pollutant, in that order.
    file.seek(SeekFrom::Start(names_start as u64))?;
    let mut names: [Vec<String>; 5] = Default::default();
    for (kind, count) in [
        (ObjectKind::Subcatchment, n_subcatchments),
        (ObjectKind::Node, n_nodes),
        (ObjectKind::Link, n_links),
        (ObjectKind::Pollutant, n_pollutants),
    ] {
        let table = &mut names[kind.code()];
        table.reserve(count);
        for _ in 0..count {
            table.push(read_name(file)?);
        }
        trace!("Read {} {} names", table.len(), kind);
    }

    // Concentration-unit code per pollutant.
    let mut pollutant_units = Vec::with_capacity(n_pollutants);
    for _ in 0..n_pollutants {
        pollutant_units.push(file.read_i32::<LittleEndian>()?);
    }

    // Property tables. Node and link objects carry a leading integer
    // "type" property; everything else is a float.
    let (sub_prop_codes, sub_props) = read_property_table(file, n_subcatchments, false)?;
    let (node_prop_codes, node_props) = read_property_table(file, n_nodes, true)?;
    let (link_prop_codes, link_props) = read_property_table(file, n_links, true)?;

    // Variable-code lists. Pollutant has the implicit single code 0.
    let subcatchment_codes = read_code_list(file)?;
    let node_codes = read_code_list(file)?;
    let link_codes = read_code_list(file)?;
    let system_codes = read_code_list(file)?;

    let n_subcatchment_vars = subcatchment_codes.len();
    let n_node_vars = node_codes.len();
    let n_link_vars = link_codes.len();
    let n_system_vars = system_codes.len();

    // System variables have no catalog names; label them with their
    // variable code's fixed textual label.
    let system_labels = varcode::native_labels(format_version, ObjectKind::System);
    names[ObjectKind::System.code()] = system_codes
        .iter()
        .map(|&code| match system_labels.get(code.max(0) as usize) {
            Some(label) => (*label).to_string(),
            None => code.to_string(),
        })
        .collect();

    let raw_start_date = file.read_f64::<LittleEndian>()?;
    let start_date = dates::decode_date(raw_start_date);
    let report_interval = i64::from(file.read_i32::<LittleEndian>()?);

    let bytes_per_period = RECORD_SIZE
        * (2 + n_subcatchments as u64 * n_subcatchment_vars as u64
            + n_nodes as u64 * n_node_vars as u64
            + n_links as u64 * n_link_vars as u64
            + n_system_vars as u64);

    let geometry = Geometry {
        engine_version,
        format_version,
        flow_units,
        n_subcatchments,
        n_nodes,
        n_links,
        n_pollutants,
        n_subcatchment_vars,
        n_node_vars,
        n_link_vars,
        n_system_vars,
        names_start: names_start as u64,
        records_start: records_start as u64,
        n_periods: n_periods as usize,
        bytes_per_period,
        start_date,
        report_interval,
    };

    let catalog = Catalog::new(
        format_version,
        names,
        [
            subcatchment_codes,
            node_codes,
            link_codes,
            vec![0],
            system_codes,
        ],
        pollutant_units,
        [sub_prop_codes, node_prop_codes, link_prop_codes],
        [sub_props, node_props, link_props],
    );

    info!(
        "Output file opened: {} periods of {} bytes starting at offset {}, from {}",
        geometry.n_periods, geometry.bytes_per_period, geometry.records_start, geometry.start_date
    );

    Ok((geometry, catalog))
}

/// Read one length-prefixed name and decode it, replacing undecodable bytes.
fn read_name<R: Read>(file: &mut R) -> Result<String> {
    let len = non_negative(file.read_i32::<LittleEndian>()?, "name length")?;
    let mut bytes = vec![0u8; len];
    file.read_exact(&mut bytes)?;
    let (decoded, _, _) = WINDOWS_1252.decode(&bytes);
    Ok(decoded.into_owned())
}

/// Read one property-code table and the per-object value rows beneath it.
fn read_property_table<R: Read>(
    file: &mut R,
    n_objects: usize,
    leading_type_code: bool,
) -> Result<(Vec<i32>, Vec<Vec<ObjectProperty>>)> {
    let codes = read_code_list(file)?;
    let mut rows = Vec::with_capacity(n_objects);
    for _ in 0..n_objects {
        let mut row = Vec::with_capacity(codes.len());
        for (slot, &code) in codes.iter().enumerate() {
            let value = if leading_type_code && slot == 0 {
                PropertyValue::TypeCode(file.read_i32::<LittleEndian>()?)
            } else {
                PropertyValue::Number(file.read_f32::<LittleEndian>()?)
            };
            row.push(ObjectProperty { code, value });
        }
        rows.push(row);
    }
    Ok((codes, rows))
}

/// Read a count-prefixed list of i32 codes.
fn read_code_list<R: Read>(file: &mut R) -> Result<Vec<i32>> {
    let count = non_negative(file.read_i32::<LittleEndian>()?, "code count")?;
    let mut codes = Vec::with_capacity(count);
    for _ in 0..count {
        codes.push(file.read_i32::<LittleEndian>()?);
    }
    Ok(codes)
}

fn non_negative(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| SwmmError::InvalidFormat(format!("Negative {what}: {value}")))
}
