//! Dataset ingestion and cleaning for class-per-subdirectory image trees.
//!
//! The [`Ingestor`] verifies that every class directory exists, decodes each
//! candidate file to RGB, relocates corrupted or non-image files into a
//! quarantine directory, and tallies per-class counts. The [`dataset`]
//! module builds a lazy path/label index over the same tree and partitions
//! it deterministically for training.
//!
//! Processing is synchronous and sequential by design: a dataset scan is a
//! one-time local operation with nothing to suspend on.

pub mod dataset;
pub mod error;
mod file;
mod ingestor;
mod quarantine;
mod summary;

pub use crate::file::{Disposition, IMAGE_EXTENSIONS, QuarantineReason};
pub use crate::ingestor::{Ingestor, Sample};
pub use crate::quarantine::Quarantine;
pub use crate::summary::Summary;
