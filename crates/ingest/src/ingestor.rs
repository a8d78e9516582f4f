//! The Dataset Ingestor.
//!
//! Walks a class-per-subdirectory tree, verifies its structure, decodes every
//! candidate image, quarantines anything unusable, and tallies per-class
//! counts. The documented call order is `verify` → `clean_load` →
//! `summarize`, though each operation is independently callable.

use crate::error::{ErrorKind, Result};
use crate::file::{Disposition, process_file};
use crate::quarantine::Quarantine;
use crate::summary::Summary;
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

/// One successfully loaded image together with its class label.
///
/// Samples are ephemeral: they live only for the duration of one ingestion
/// run and are never persisted by this crate.
#[derive(Debug, Clone)]
pub struct Sample {
    pub image: RgbImage,
    pub class: String,
}

/// Scans and cleans one dataset root.
///
/// Holds the run's in-memory sample list. All I/O is synchronous and
/// sequential, one file at a time within one class directory at a time, so
/// there is no shared state to coordinate and aborting simply means not calling
/// the next operation.
#[derive(Debug)]
pub struct Ingestor {
    root: PathBuf,
    classes: Vec<String>,
    quarantine: Quarantine,
    samples: Vec<Sample>,
}

impl Ingestor {
    /// Create an ingestor for `root` with the given ordered class
    /// vocabulary, ensuring the quarantine subdirectory `quarantine_dir`
    /// exists beneath the root.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::EmptyClasses`] for an empty vocabulary and
    /// [`ErrorKind::QuarantineDir`] when the quarantine directory cannot be
    /// created.
    pub fn new(root: impl Into<PathBuf>, classes: Vec<String>, quarantine_dir: &str) -> Result<Self> {
        if classes.is_empty() {
            exn::bail!(ErrorKind::EmptyClasses);
        }
        let root = root.into();
        let quarantine = Quarantine::ensure(root.join(quarantine_dir))?;
        Ok(Self {
            root,
            classes,
            quarantine,
            samples: Vec::new(),
        })
    }

    /// The dataset root this ingestor scans.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The quarantine directory beneath the root.
    pub fn quarantine_dir(&self) -> &Path {
        self.quarantine.dir()
    }

    /// Samples loaded by the most recent [`clean_load`](Self::clean_load).
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Check that every class directory exists beneath the root.
    ///
    /// Fails fast: the first missing directory is returned as
    /// [`ErrorKind::MissingClassDir`] carrying the exact offending path, and
    /// no further classes are checked. The fault is logged before being
    /// signalled.
    pub fn verify(&self) -> Result<()> {
        for class in &self.classes {
            let path = self.root.join(class);
            if !path.is_dir() {
                tracing::error!(path = %path.display(), "expected class directory not found; check the dataset path");
                exn::bail!(ErrorKind::MissingClassDir(path));
            }
        }
        Ok(())
    }

    /// Scan every class directory, loading valid images and quarantining
    /// everything else.
    ///
    /// Structure is re-verified first, so calling this against a partially
    /// missing tree fails loudly instead of treating the missing class as
    /// zero files. The sample list is rebuilt from scratch on every run.
    ///
    /// Class directories are processed in vocabulary order; within each
    /// directory, entries are sorted by filename so repeated runs over the
    /// same snapshot behave identically.
    ///
    /// Per-file failures never abort the run; each one resolves into a
    /// [`Disposition`] in the returned list.
    pub fn clean_load(&mut self) -> Result<Vec<Disposition>> {
        self.verify()?;
        self.samples.clear();
        let mut dispositions = Vec::new();
        for class in &self.classes {
            let dir = self.root.join(class);
            for path in sorted_entries(&dir)? {
                let (disposition, image) = process_file(&path, &self.quarantine);
                if let Some(image) = image {
                    self.samples.push(Sample { image, class: class.clone() });
                }
                dispositions.push(disposition);
            }
        }
        Ok(dispositions)
    }

    /// Tally the in-memory sample list into per-class counts.
    ///
    /// Pure function of the state built by the last
    /// [`clean_load`](Self::clean_load); does not touch the disk. Classes
    /// that loaded nothing are present with a count of zero.
    pub fn summarize(&self) -> Summary {
        let summary = Summary::tally(&self.classes, self.samples.iter().map(|sample| sample.class.as_str()));
        tracing::info!(%summary, "dataset summary");
        summary
    }
}

/// List the files of `dir` sorted by filename.
///
/// Subdirectories are skipped; in particular this keeps a quarantine
/// directory nested under a class directory from being walked.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| ErrorKind::ReadDir(dir.to_path_buf(), e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ErrorKind::ReadDir(dir.to_path_buf(), e))?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
