//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The configuration file or environment could not be read or parsed.
    #[display("could not load configuration: {_0}")]
    Figment(figment::Error),
    /// The class vocabulary resolved to an empty list.
    #[display("dataset class vocabulary must contain at least one class")]
    EmptyClasses,
    /// The same class name appears more than once in the vocabulary.
    #[display("duplicate class name in vocabulary: {_0}")]
    DuplicateClass(#[error(not(source))] String),
    /// The configured quarantine directory name clashes with a class name.
    #[display("quarantine directory shares its name with class: {_0}")]
    QuarantineClash(#[error(not(source))] String),
}

impl From<figment::Error> for ErrorKind {
    fn from(err: figment::Error) -> Self {
        Self::Figment(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            _ => false,
        }
    }
}
