//! Random-access reads of single (date, value) pairs.
//!
//! Two positioned reads per call. Cheap for ad-hoc lookups; for many
//! series at once the bulk extractor amortizes the per-call seek cost.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use chrono::NaiveDateTime;

use super::dates;
use super::error::Result;
use super::models::{Geometry, ResolvedRequest};
use super::offsets;

/// Fetch one value and its period timestamp.
pub fn fetch<R: Read + Seek>(
    file: &mut R,
    geometry: &Geometry,
    resolved: &ResolvedRequest,
    period: usize,
) -> Result<(NaiveDateTime, f32)> {
    let date = read_date(file, geometry, period)?;
    file.seek(SeekFrom::Start(offsets::value_offset(
        geometry,
        resolved.kind,
        resolved.item_index,
        resolved.var_index,
        period,
    )))?;
    let value = file.read_f32::<LittleEndian>()?;
    Ok((date, value))
}

/// Read and decode the 8-byte date field of one period record.
pub fn read_date<R: Read + Seek>(
    file: &mut R,
    geometry: &Geometry,
    period: usize,
) -> Result<NaiveDateTime> {
    file.seek(SeekFrom::Start(offsets::date_offset(geometry, period)))?;
    Ok(dates::decode_date(file.read_f64::<LittleEndian>()?))
}
