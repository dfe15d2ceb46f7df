//! Custom error types for the swmm-reader crate.

use thiserror::Error;

use super::models::ObjectKind;

/// The primary error type for all operations in this crate.
///
/// Format variants are fatal at open time; lookup variants are raised while
/// validating a request, before any file I/O happens for it.
#[derive(Debug, Error)]
pub enum SwmmError {
    /// An error originating from I/O operations, including short reads.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// A magic-number marker did not match the SWMM 5 constant.
    #[error("Bad magic number at {location}: expected {expected:#x}, got {found:#x}")]
    BadMagic {
        location: &'static str,
        expected: i32,
        found: i32,
    },

    /// The stored error code is nonzero: the simulation run failed and the
    /// results section cannot be trusted.
    #[error("Output file reports simulation error code {0}")]
    RunFailed(i32),

    /// The file declares zero reporting periods, so there is nothing to read.
    #[error("Output file contains zero reporting periods")]
    NoPeriods,

    /// The file is structurally invalid beyond the specific checks above.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A type token did not name one of the five recognized object kinds.
    #[error("Unknown object type \"{0}\". Must be one of subcatchment, node, link, pollutant, system.")]
    UnknownObjectType(String),

    /// The named object is absent from the catalog for its kind.
    #[error("\"{name}\" was not found in the {kind} list")]
    NameNotFound { kind: ObjectKind, name: String },

    /// A variable index outside the declared range for the object kind.
    #[error("Variable index {index} out of range for {kind}: {available} variables declared")]
    VariableOutOfRange {
        kind: ObjectKind,
        index: usize,
        available: usize,
    },

    /// Pollutants extend the variable lists of other kinds; they have no
    /// record block of their own to extract from.
    #[error("Object type {0} has no time-series records")]
    NoSeriesForKind(ObjectKind),

    /// Only subcatchments, nodes, and links carry property tables.
    #[error("Object type {0} carries no property table")]
    NoPropertiesForKind(ObjectKind),

    /// A mutex lock was poisoned, indicating a panic in another thread holding the lock.
    #[error("A mutex lock was poisoned, indicating a panic in another thread holding the lock.")]
    LockPoisoned,
}

/// A convenience `Result` type alias using the crate's `SwmmError` type.
pub type Result<T> = std::result::Result<T, SwmmError>;
