//! Fixed label tables for variable codes, property codes, object-type
//! codes, and flow units.
//!
//! The variable tables come in two variants selected by engine version;
//! everything else is version-independent.

use super::models::{FormatVersion, ObjectKind};

/// Subcatchment variable labels, engine 5.10.10 and later.
const SUBCATCHMENT_VARS: &[&str] = &[
    "Rainfall",
    "Snow_depth",
    "Evaporation_loss",
    "Infiltration_loss",
    "Runoff_rate",
    "Groundwater_outflow",
    "Groundwater_elevation",
    "Soil_moisture",
    "Pollutant_washoff",
];

/// Subcatchment variable labels prior to 5.10.10.
const SUBCATCHMENT_VARS_OLD: &[&str] = &[
    "Rainfall",
    "Snow_depth",
    "Evaporation_loss",
    "Runoff_rate",
    "Groundwater_outflow",
    "Groundwater_elevation",
];

const NODE_VARS: &[&str] = &[
    "Depth_above_invert",
    "Hydraulic_head",
    "Volume_stored_ponded",
    "Lateral_inflow",
    "Total_inflow",
    "Flow_lost_flooding",
];

const LINK_VARS: &[&str] = &[
    "Flow_rate",
    "Flow_depth",
    "Flow_velocity",
    "Froude_number",
    "Capacity",
];

const SYSTEM_VARS: &[&str] = &[
    "Air_temperature",
    "Rainfall",
    "Snow_depth",
    "Evaporation_infiltration",
    "Runoff",
    "Dry_weather_inflow",
    "Groundwater_inflow",
    "RDII_inflow",
    "User_direct_inflow",
    "Total_lateral_inflow",
    "Flow_lost_to_flooding",
    "Flow_leaving_outfalls",
    "Volume_stored_water",
    "Evaporation_rate",
    "Potential_PET",
];

/// Identical to [`SYSTEM_VARS`] minus the trailing `Potential_PET` entry.
const SYSTEM_VARS_OLD: &[&str] = &[
    "Air_temperature",
    "Rainfall",
    "Snow_depth",
    "Evaporation_infiltration",
    "Runoff",
    "Dry_weather_inflow",
    "Groundwater_inflow",
    "RDII_inflow",
    "User_direct_inflow",
    "Total_lateral_inflow",
    "Flow_lost_to_flooding",
    "Flow_leaving_outfalls",
    "Volume_stored_water",
    "Evaporation_rate",
];

/// Native (pollutant-free) variable label table for a kind.
///
/// Pollutant concentration labels are appended past the end of these
/// tables by the catalog, with codes continuing numerically.
pub fn native_labels(version: FormatVersion, kind: ObjectKind) -> &'static [&'static str] {
    match (kind, version) {
        (ObjectKind::Subcatchment, FormatVersion::Modern) => SUBCATCHMENT_VARS,
        (ObjectKind::Subcatchment, FormatVersion::Legacy) => SUBCATCHMENT_VARS_OLD,
        (ObjectKind::Node, _) => NODE_VARS,
        (ObjectKind::Link, _) => LINK_VARS,
        (ObjectKind::System, FormatVersion::Modern) => SYSTEM_VARS,
        (ObjectKind::System, FormatVersion::Legacy) => SYSTEM_VARS_OLD,
        (ObjectKind::Pollutant, _) => &[],
    }
}

/// Label for an input/property code in the header property tables.
pub fn property_label(kind: ObjectKind, code: i32) -> Option<&'static str> {
    match (kind, code) {
        (ObjectKind::Subcatchment, 1) => Some("Area"),
        (ObjectKind::Node, 0) | (ObjectKind::Link, 0) => Some("Type"),
        (ObjectKind::Node, 2) => Some("Inv_elev"),
        (ObjectKind::Node, 3) | (ObjectKind::Link, 3) => Some("Max_depth"),
        (ObjectKind::Link, 4) => Some("Inv_offset"),
        (ObjectKind::Link, 5) => Some("Length"),
        _ => None,
    }
}

/// Label for the integer object-type code carried as property 0 on nodes
/// and links.
pub fn type_code_label(kind: ObjectKind, code: i32) -> Option<&'static str> {
    match (kind, code) {
        (ObjectKind::Node, 0) => Some("Junction"),
        (ObjectKind::Node, 1) => Some("Outfall"),
        (ObjectKind::Node, 2) => Some("Storage"),
        (ObjectKind::Node, 3) => Some("Divider"),
        (ObjectKind::Link, 0) => Some("Conduit"),
        (ObjectKind::Link, 1) => Some("Pump"),
        (ObjectKind::Link, 2) => Some("Orifice"),
        (ObjectKind::Link, 3) => Some("Weir"),
        (ObjectKind::Link, 4) => Some("Outlet"),
        _ => None,
    }
}

/// Label for the flow-unit code stored in the header.
pub fn flow_units_label(code: i32) -> Option<&'static str> {
    match code {
        0 => Some("CFS"),
        1 => Some("GPM"),
        2 => Some("MGD"),
        3 => Some("CMS"),
        4 => Some("LPS"),
        5 => Some("LPD"),
        _ => None,
    }
}
