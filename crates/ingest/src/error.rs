//! Ingestion Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Only *structural* faults surface here: a missing class directory, an
//! unlistable directory, a quarantine area that cannot be created. Per-file
//! faults (corrupt images, wrong extensions, failed quarantine moves) are
//! deliberately not errors: they are logged, reflected in the run's
//! [`Disposition`](crate::Disposition) list, and never abort the run.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// An ingestion error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structural faults that stop an ingestion run.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A required class directory is absent from the dataset root.
    #[display("class directory not found: {}", _0.display())]
    MissingClassDir(#[error(not(source))] PathBuf),
    /// The quarantine directory could not be created.
    #[display("could not create quarantine directory {}: {_1}", _0.display())]
    QuarantineDir(#[error(not(source))] PathBuf, IoError),
    /// A class directory exists but could not be enumerated.
    #[display("could not list directory {}: {_1}", _0.display())]
    ReadDir(#[error(not(source))] PathBuf, IoError),
    /// The class vocabulary was empty; there is nothing to ingest.
    #[display("class vocabulary must contain at least one class")]
    EmptyClasses,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::QuarantineDir(_, _) | Self::ReadDir(_, _))
    }
}
