//! Path/label index and deterministic train/test splitting.
//!
//! Complements the [`Ingestor`](crate::Ingestor): where the ingestor decodes
//! and cleans, the index merely enumerates `(path, label)` pairs so a
//! training pipeline can load images lazily. Building the index performs no
//! decoding and moves no files.

use crate::error::{ErrorKind, Result};
use crate::file::has_image_extension;
use std::fs;
use std::path::{Path, PathBuf};

/// One indexed file: its path and the index of its class in the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub label: usize,
}

/// An enumeration of every whitelisted-extension file in the dataset tree.
#[derive(Debug, Clone)]
pub struct DatasetIndex {
    classes: Vec<String>,
    entries: Vec<Entry>,
}

impl DatasetIndex {
    /// Enumerate `root/<class>` for every class in vocabulary order,
    /// collecting files with whitelisted extensions. Filenames are sorted
    /// within each class directory, so the index is stable for a fixed
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingClassDir`] for an absent class directory
    /// and [`ErrorKind::ReadDir`] when one cannot be enumerated.
    pub fn build(root: impl AsRef<Path>, classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            exn::bail!(ErrorKind::EmptyClasses);
        }
        let root = root.as_ref();
        let mut entries = Vec::new();
        for (label, class) in classes.iter().enumerate() {
            let dir = root.join(class);
            if !dir.is_dir() {
                tracing::error!(path = %dir.display(), "expected class directory not found");
                exn::bail!(ErrorKind::MissingClassDir(dir));
            }
            let listing = fs::read_dir(&dir).map_err(|e| ErrorKind::ReadDir(dir.clone(), e))?;
            let mut paths = Vec::new();
            for entry in listing {
                let entry = entry.map_err(|e| ErrorKind::ReadDir(dir.clone(), e))?;
                let path = entry.path();
                if path.is_file() && has_image_extension(&path) {
                    paths.push(path);
                }
            }
            paths.sort();
            entries.extend(paths.into_iter().map(|path| Entry { path, label }));
        }
        tracing::info!(total = entries.len(), "dataset index built");
        Ok(Self { classes, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The vocabulary the labels index into.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of indexed files carrying `label`.
    pub fn class_count(&self, label: usize) -> usize {
        self.entries.iter().filter(|entry| entry.label == label).count()
    }

    /// Partition the index into `(train, test)` sets.
    ///
    /// Entries are ordered by the BLAKE3 digest of their path before the
    /// cut, which scatters classes across both partitions like a shuffle
    /// would, but reproducibly, with no RNG state to carry between runs or
    /// machines. `train_fraction` is clamped to `[0, 1]`.
    pub fn split(&self, train_fraction: f64) -> (Vec<Entry>, Vec<Entry>) {
        let mut shuffled = self.entries.clone();
        shuffled.sort_by_key(|entry| *blake3::hash(entry.path.as_os_str().as_encoded_bytes()).as_bytes());
        let total = shuffled.len();
        let split_at = ((total as f64) * train_fraction.clamp(0.0, 1.0)).round() as usize;
        let test = shuffled.split_off(split_at.min(total));
        (shuffled, test)
    }
}
