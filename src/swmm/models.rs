//! Data structures representing SWMM 5 output-file components

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use super::error::{Result, SwmmError};

/// Size in bytes of one record unit: every count, code, and value in the
/// file is a 4-byte field (dates are two units).
pub const RECORD_SIZE: u64 = 4;

/// The five kinds of simulated objects.
///
/// The discriminants match the type codes used throughout the file format;
/// the declaration order of the first four matches the order their name
/// tables appear in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKind {
    Subcatchment = 0,
    Node = 1,
    Link = 2,
    Pollutant = 3,
    System = 4,
}

impl ObjectKind {
    /// All five kinds, in catalog order.
    pub const ALL: [ObjectKind; 5] = [
        ObjectKind::Subcatchment,
        ObjectKind::Node,
        ObjectKind::Link,
        ObjectKind::Pollutant,
        ObjectKind::System,
    ];

    /// The kinds that own a block in each period record, in record order.
    /// Pollutants are not a record dimension; their concentrations ride
    /// along as extra variables of the other kinds.
    pub const REPORTED: [ObjectKind; 4] = [
        ObjectKind::Subcatchment,
        ObjectKind::Node,
        ObjectKind::Link,
        ObjectKind::System,
    ];

    /// Numeric type code as used in the file format.
    pub fn code(self) -> usize {
        self as usize
    }

    /// Lowercase token used in labels and request strings.
    pub fn token(self) -> &'static str {
        match self {
            ObjectKind::Subcatchment => "subcatchment",
            ObjectKind::Node => "node",
            ObjectKind::Link => "link",
            ObjectKind::Pollutant => "pollutant",
            ObjectKind::System => "system",
        }
    }

    /// Parse a type token. Accepts the five lowercase names.
    pub fn from_token(token: &str) -> Result<ObjectKind> {
        match token {
            "subcatchment" => Ok(ObjectKind::Subcatchment),
            "node" => Ok(ObjectKind::Node),
            "link" => Ok(ObjectKind::Link),
            "pollutant" => Ok(ObjectKind::Pollutant),
            "system" => Ok(ObjectKind::System),
            other => Err(SwmmError::UnknownObjectType(other.to_string())),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Variable-label table variant, selected once by the engine version
/// stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    /// Engine versions before 5.10.10 (stored version < 5100).
    Legacy,
    /// Engine versions 5.10.10 and later.
    Modern,
}

impl FormatVersion {
    pub fn from_engine_version(version: i32) -> FormatVersion {
        if version < 5100 {
            FormatVersion::Legacy
        } else {
            FormatVersion::Modern
        }
    }
}

/// Immutable record-layout description derived from the header.
///
/// Built once at open time; every offset computation is a pure function
/// of this struct.
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Engine version as stored in the file (e.g. 51013).
    pub engine_version: i32,
    pub format_version: FormatVersion,
    /// Flow-unit code (see [`flow_units_label`](super::varcode::flow_units_label)).
    pub flow_units: i32,

    pub n_subcatchments: usize,
    pub n_nodes: usize,
    pub n_links: usize,
    pub n_pollutants: usize,

    pub n_subcatchment_vars: usize,
    pub n_node_vars: usize,
    pub n_link_vars: usize,
    pub n_system_vars: usize,

    /// Absolute offset of the name tables.
    pub names_start: u64,
    /// Absolute offset of the first period record.
    pub records_start: u64,
    pub n_periods: usize,
    /// Size of one period record, date included.
    pub bytes_per_period: u64,

    pub start_date: NaiveDateTime,
    /// Reporting interval in seconds.
    pub report_interval: i64,
}

impl Geometry {
    /// Number of items of a reported kind in each period record.
    /// The system block is a single implicit item.
    pub fn count(&self, kind: ObjectKind) -> usize {
        match kind {
            ObjectKind::Subcatchment => self.n_subcatchments,
            ObjectKind::Node => self.n_nodes,
            ObjectKind::Link => self.n_links,
            ObjectKind::System => 1,
            ObjectKind::Pollutant => 0,
        }
    }

    /// Number of variables reported per item of a kind.
    pub fn var_count(&self, kind: ObjectKind) -> usize {
        match kind {
            ObjectKind::Subcatchment => self.n_subcatchment_vars,
            ObjectKind::Node => self.n_node_vars,
            ObjectKind::Link => self.n_link_vars,
            ObjectKind::System => self.n_system_vars,
            ObjectKind::Pollutant => 0,
        }
    }
}

/// One time-series request, as supplied by the caller.
///
/// Validated against the catalog before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub kind: ObjectKind,
    pub name: String,
    pub var_index: usize,
}

impl SeriesRequest {
    pub fn new(kind: ObjectKind, name: impl Into<String>, var_index: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            var_index,
        }
    }
}

/// Parses the `"type,name,varindex"` label syntax, e.g. `"node,C64,1"`.
impl FromStr for SeriesRequest {
    type Err = SwmmError;

    fn from_str(label: &str) -> Result<Self> {
        let mut parts = label.splitn(3, ',');
        let (kind, name, index) = match (parts.next(), parts.next(), parts.next()) {
            (Some(kind), Some(name), Some(index)) => (kind, name, index),
            _ => {
                return Err(SwmmError::InvalidFormat(format!(
                    "Bad series label \"{label}\": expected \"type,name,varindex\""
                )))
            }
        };
        let var_index = index.trim().parse::<usize>().map_err(|_| {
            SwmmError::InvalidFormat(format!("Bad variable index \"{index}\" in label \"{label}\""))
        })?;
        Ok(SeriesRequest::new(ObjectKind::from_token(kind)?, name, var_index))
    }
}

/// A request after catalog resolution: the item index is fixed and the
/// variable index has been range-checked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResolvedRequest {
    pub kind: ObjectKind,
    pub item_index: usize,
    pub var_index: usize,
}

/// One column of a bulk-extraction table.
#[derive(Debug, Clone)]
pub struct SeriesColumn {
    /// `{kind}_{name}_{variableLabel}`
    pub label: String,
    pub kind: ObjectKind,
    pub item_index: usize,
    pub var_index: usize,
    /// One value per period, in period order.
    pub values: Vec<f32>,
}

/// A timestamp-indexed table with one column per canonical
/// (kind, item, variable) triple.
#[derive(Debug, Clone)]
pub struct SeriesTable {
    /// One decoded timestamp per period, in period order.
    pub timestamps: Vec<NaiveDateTime>,
    /// Columns in canonical (kind, item index, variable index) order.
    pub columns: Vec<SeriesColumn>,
}

/// A property value attached to an object in the header tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    /// Property code 0 on nodes and links: an integer object-type code.
    TypeCode(i32),
    Number(f32),
}

/// One (property code, value) pair for an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectProperty {
    pub code: i32,
    pub value: PropertyValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tokens_round_trip() {
        for kind in ObjectKind::ALL {
            assert_eq!(ObjectKind::from_token(kind.token()).unwrap(), kind);
        }
        assert!(matches!(
            ObjectKind::from_token("conduit"),
            Err(SwmmError::UnknownObjectType(_))
        ));
    }

    #[test]
    fn reported_order_matches_record_layout() {
        let codes: Vec<usize> = ObjectKind::REPORTED.iter().map(|k| k.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 4]);
    }

    #[test]
    fn request_label_parsing() {
        let req: SeriesRequest = "node,C64,1".parse().unwrap();
        assert_eq!(req.kind, ObjectKind::Node);
        assert_eq!(req.name, "C64");
        assert_eq!(req.var_index, 1);

        // Names may contain no commas, but anything else goes.
        let req: SeriesRequest = "subcatchment,Basin A,0".parse().unwrap();
        assert_eq!(req.name, "Basin A");

        assert!("node,C64".parse::<SeriesRequest>().is_err());
        assert!("node,C64,x".parse::<SeriesRequest>().is_err());
        assert!("pipe,C64,1".parse::<SeriesRequest>().is_err());
    }

    #[test]
    fn version_table_selection() {
        assert_eq!(FormatVersion::from_engine_version(5099), FormatVersion::Legacy);
        assert_eq!(FormatVersion::from_engine_version(5100), FormatVersion::Modern);
        assert_eq!(FormatVersion::from_engine_version(51013), FormatVersion::Modern);
    }
}
