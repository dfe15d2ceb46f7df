//! Vectorized bulk extraction.
//!
//! Resolves every request up front, builds one byte-selection mask over a
//! period record's post-date payload, then memory-maps each period's
//! payload read-only and gathers only the masked bytes. Per-value seeking
//! costs O(periods x requests) syscalls; this path costs O(periods)
//! mapped windows regardless of how many series are requested.

use std::fs::File;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, info};
use memmap2::MmapOptions;

use super::catalog::Catalog;
use super::error::Result;
use super::models::{
    Geometry, ObjectKind, ResolvedRequest, SeriesColumn, SeriesRequest, SeriesTable, RECORD_SIZE,
};
use super::offsets;
use super::record;

/// Map-window alignment. A multiple of every page size in use on the
/// platforms we target, and of the Windows allocation granularity.
const MAP_ALIGN: u64 = 64 * 1024;

/// Byte-selection mask over one period record's post-date payload.
///
/// Period-independent: built once from the resolved requests, applied to
/// every period's window. Each selected value covers four contiguous
/// bytes; `starts` lists the group starts in ascending (mask) order,
/// which coincides with the canonical column order.
pub(crate) struct RecordMask {
    selected: Vec<bool>,
    starts: Vec<usize>,
}

impl RecordMask {
    pub(crate) fn new(payload_len: usize) -> Self {
        Self {
            selected: vec![false; payload_len],
            starts: Vec::new(),
        }
    }

    /// Mark the four bytes of one value. Offsets must be supplied in
    /// ascending order; duplicates are ignored.
    pub(crate) fn mark_value(&mut self, offset: usize) {
        if self.starts.last() == Some(&offset) {
            return;
        }
        for byte in &mut self.selected[offset..offset + RECORD_SIZE as usize] {
            *byte = true;
        }
        self.starts.push(offset);
    }

    pub(crate) fn len(&self) -> usize {
        self.selected.len()
    }

    #[cfg(test)]
    fn is_selected(&self, offset: usize) -> bool {
        self.selected[offset]
    }

    /// Gather the selected values from one period's payload, in mask order.
    ///
    /// `payload` is the record's post-date byte block.
    fn gather(&self, payload: &[u8], out: &mut Vec<f32>) {
        for &start in &self.starts {
            out.push(LittleEndian::read_f32(&payload[start..start + RECORD_SIZE as usize]));
        }
    }

    pub(crate) fn num_values(&self) -> usize {
        self.starts.len()
    }
}

/// Extract many series at once into a timestamp-indexed table.
///
/// Columns come out in canonical (kind, item index, variable index)
/// order regardless of request order; requests resolving to the same
/// triple collapse into one column.
pub fn fetch_all(
    file: &mut File,
    geometry: &Geometry,
    catalog: &Catalog,
    requests: &[SeriesRequest],
) -> Result<SeriesTable> {
    // Validate everything before touching the records section.
    let mut resolved: Vec<ResolvedRequest> = requests
        .iter()
        .map(|request| catalog.resolve_request(request))
        .collect::<Result<_>>()?;
    resolved.sort();
    resolved.dedup();

    let payload_len = (geometry.bytes_per_period - 2 * RECORD_SIZE) as usize;
    let mut mask = RecordMask::new(payload_len);
    for request in &resolved {
        let offset = offsets::relative_value_offset(
            geometry,
            request.kind,
            request.item_index,
            request.var_index,
        );
        mask.mark_value(offset as usize);
    }
    debug_assert_eq!(mask.num_values(), resolved.len());
    debug_assert_eq!(mask.len(), payload_len);

    info!(
        "Bulk extraction: {} columns over {} periods ({} payload bytes each)",
        resolved.len(),
        geometry.n_periods,
        payload_len
    );

    let mut per_period = Vec::with_capacity(geometry.n_periods);
    if !resolved.is_empty() {
        for period in 0..geometry.n_periods {
            let payload_start = offsets::period_base(geometry, period) + 2 * RECORD_SIZE;
            let payload_end = offsets::period_base(geometry, period + 1);

            // Map windows must start on an allocation-granularity boundary;
            // align down and skip the left gap when indexing.
            let window_start = (payload_start / MAP_ALIGN) * MAP_ALIGN;
            assert!(
                window_start % MAP_ALIGN == 0,
                "misaligned map window at period {period}: offset {window_start}"
            );
            let gap = (payload_start - window_start) as usize;
            let window_len = (payload_end - window_start) as usize;

            let window = unsafe {
                MmapOptions::new()
                    .offset(window_start)
                    .len(window_len)
                    .map(&*file)?
            };
            let mut values = Vec::with_capacity(resolved.len());
            mask.gather(&window[gap..gap + payload_len], &mut values);
            per_period.push(values);
        }
    } else {
        per_period.resize(geometry.n_periods, Vec::new());
    }

    // Dates go through the same positioned reads as the random-access path.
    let mut timestamps = Vec::with_capacity(geometry.n_periods);
    for period in 0..geometry.n_periods {
        timestamps.push(record::read_date(file, geometry, period)?);
    }

    let mut columns: Vec<SeriesColumn> = resolved
        .iter()
        .map(|request| SeriesColumn {
            label: column_label(catalog, request),
            kind: request.kind,
            item_index: request.item_index,
            var_index: request.var_index,
            values: Vec::with_capacity(geometry.n_periods),
        })
        .collect();
    for values in per_period {
        debug!("Gathered {} values for one period", values.len());
        for (column, value) in columns.iter_mut().zip(values) {
            column.values.push(value);
        }
    }

    Ok(SeriesTable {
        timestamps,
        columns,
    })
}

/// Column heading: `{kind}_{name}_{variableLabel}`.
///
/// The system block is a single implicit item, so its columns take the
/// variable's label as the object name as well.
fn column_label(catalog: &Catalog, request: &ResolvedRequest) -> String {
    let var_label = catalog.var_label(request.kind, request.var_index);
    let name = match request.kind {
        ObjectKind::System => var_label.clone(),
        kind => catalog.names(kind)[request.item_index].clone(),
    };
    format!("{}_{}_{}", request.kind, name, var_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_marks_four_contiguous_bytes() {
        let mut mask = RecordMask::new(32);
        mask.mark_value(4);
        mask.mark_value(20);
        assert_eq!(mask.num_values(), 2);
        for offset in 0..mask.len() {
            let expected = (4..8).contains(&offset) || (20..24).contains(&offset);
            assert_eq!(mask.is_selected(offset), expected, "byte {offset}");
        }
    }

    #[test]
    fn mask_collapses_duplicate_offsets() {
        let mut mask = RecordMask::new(16);
        mask.mark_value(8);
        mask.mark_value(8);
        assert_eq!(mask.num_values(), 1);
    }

    #[test]
    fn gather_reinterprets_le_floats_in_mask_order() {
        let mut mask = RecordMask::new(12);
        mask.mark_value(0);
        mask.mark_value(8);
        let mut payload = Vec::new();
        for value in [1.5f32, -2.0, 42.25] {
            payload.extend_from_slice(&value.to_le_bytes());
        }
        let mut out = Vec::new();
        mask.gather(&payload, &mut out);
        assert_eq!(out, vec![1.5, 42.25]);
    }
}
