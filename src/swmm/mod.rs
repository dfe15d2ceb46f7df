//! Core SWMM 5 output reader module

pub mod catalog;
pub mod error;
pub mod models;
mod bulk;
mod dates;
mod header;
mod offsets;
mod record;
mod varcode;

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDateTime;
use log::info;

use self::catalog::Catalog;
pub use self::error::{Result, SwmmError};
use self::models::{Geometry, ObjectKind, ObjectProperty, SeriesRequest, SeriesTable};

pub use self::dates::epoch;
pub use self::header::MAGIC;
pub use self::varcode::{flow_units_label, property_label, type_code_label};

/// An open session on one completed-simulation output file.
///
/// The header is parsed exactly once at open time; the resulting geometry
/// and catalog are immutable for the session's lifetime, so queries take
/// `&self` and never re-read the header.
#[derive(Debug)]
pub struct SwmmReader {
    file: Mutex<File>,
    geometry: Geometry,
    catalog: Catalog,
}

impl SwmmReader {
    /// Open an output file and parse its header.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be opened or a read comes up short
    /// - Either magic-number marker is wrong
    /// - The stored error code is nonzero (the simulation run failed)
    /// - The file declares zero reporting periods
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening SWMM output file: {}", path.display());
        let mut file = File::open(path)?;
        let (geometry, catalog) = header::parse(&mut file)?;
        Ok(Self {
            file: Mutex::new(file),
            geometry,
            catalog,
        })
    }

    /// Record-layout description derived from the header.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The object-name and variable-code catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Ordered object names for a kind.
    pub fn objects(&self, kind: ObjectKind) -> &[String] {
        self.catalog.names(kind)
    }

    /// Ordered `(code, label)` pairs for every variable a kind reports,
    /// pollutant concentrations included.
    pub fn variables(&self, kind: ObjectKind) -> Vec<(i32, String)> {
        self.catalog.variables(kind)
    }

    /// Property values for one named object, as stored in the header.
    pub fn properties(&self, kind: ObjectKind, name: &str) -> Result<&[ObjectProperty]> {
        let index = self.catalog.resolve(kind, name)?;
        self.catalog.properties(kind, index)
    }

    /// One full time series via positioned per-period reads.
    ///
    /// O(1) I/O operations per period. Suited to a handful of series or
    /// ad-hoc lookups; use [`bulk_series`](Self::bulk_series) when
    /// extracting many series at once.
    pub fn single_series(
        &self,
        kind: ObjectKind,
        name: &str,
        var_index: usize,
    ) -> Result<Vec<(NaiveDateTime, f32)>> {
        let resolved = self
            .catalog
            .resolve_request(&SeriesRequest::new(kind, name, var_index))?;
        let mut file = self.file.lock().map_err(|_| SwmmError::LockPoisoned)?;
        let mut series = Vec::with_capacity(self.geometry.n_periods);
        for period in 0..self.geometry.n_periods {
            series.push(record::fetch(&mut *file, &self.geometry, &resolved, period)?);
        }
        Ok(series)
    }

    /// Many time series in one pass over the records section.
    ///
    /// One short-lived read-only memory map per period satisfies every
    /// request for that period in a single masked gather. Columns come
    /// out in canonical (kind, item, variable) order with duplicate
    /// requests collapsed.
    pub fn bulk_series(&self, requests: &[SeriesRequest]) -> Result<SeriesTable> {
        let mut file = self.file.lock().map_err(|_| SwmmError::LockPoisoned)?;
        bulk::fetch_all(&mut *file, &self.geometry, &self.catalog, requests)
    }

    /// Timestamps of the first and last reporting periods.
    pub fn period_range(&self) -> Result<(NaiveDateTime, NaiveDateTime)> {
        let mut file = self.file.lock().map_err(|_| SwmmError::LockPoisoned)?;
        let first = record::read_date(&mut *file, &self.geometry, 0)?;
        let last = record::read_date(&mut *file, &self.geometry, self.geometry.n_periods - 1)?;
        Ok((first, last))
    }
}
