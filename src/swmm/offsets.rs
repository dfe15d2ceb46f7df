//! Record-offset arithmetic.
//!
//! Pure functions of [`Geometry`]. Both extraction paths (the positioned
//! single-value reads and the memory-mapped bulk gather) compute their
//! byte positions here; they must never carry private copies of this
//! arithmetic.

use super::models::{Geometry, ObjectKind, RECORD_SIZE};

/// Absolute offset of a period's record. The date field occupies the
/// first two record units.
pub fn period_base(geometry: &Geometry, period: usize) -> u64 {
    geometry.records_start + period as u64 * geometry.bytes_per_period
}

/// Absolute offset of a period's 8-byte date field.
pub fn date_offset(geometry: &Geometry, period: usize) -> u64 {
    period_base(geometry, period)
}

/// Byte offset of a kind's value block within the post-date payload.
///
/// Sums the block sizes of every reported kind preceding `kind` in the
/// fixed record order {subcatchment, node, link, system}.
pub fn type_base(geometry: &Geometry, kind: ObjectKind) -> u64 {
    let mut base = 0u64;
    for preceding in ObjectKind::REPORTED {
        if preceding == kind {
            break;
        }
        base += RECORD_SIZE
            * geometry.count(preceding) as u64
            * geometry.var_count(preceding) as u64;
    }
    base
}

/// Offset of one value within the post-date payload of any period record.
///
/// This is the quantity the bulk extractor marks in its byte mask.
pub fn relative_value_offset(
    geometry: &Geometry,
    kind: ObjectKind,
    item_index: usize,
    var_index: usize,
) -> u64 {
    type_base(geometry, kind)
        + item_index as u64 * geometry.var_count(kind) as u64 * RECORD_SIZE
        + var_index as u64 * RECORD_SIZE
}

/// Absolute offset of one value in one period record.
pub fn value_offset(
    geometry: &Geometry,
    kind: ObjectKind,
    item_index: usize,
    var_index: usize,
    period: usize,
) -> u64 {
    period_base(geometry, period)
        + 2 * RECORD_SIZE
        + relative_value_offset(geometry, kind, item_index, var_index)
}
