//! # swmm-reader
//!
//! A reader and time-series extraction engine for SWMM 5 binary output
//! (`.out`) files. Parses the fixed-layout header into an immutable
//! geometry and catalog, then answers single-series queries via
//! positioned reads and bulk queries via per-period memory-mapped
//! gathers.
pub mod swmm;

// Re-export the main types for convenience
pub use crate::swmm::{
    catalog::Catalog,
    models::{
        Geometry, ObjectKind, ObjectProperty, PropertyValue, SeriesColumn, SeriesRequest,
        SeriesTable,
    },
    Result, SwmmError, SwmmReader,
};
