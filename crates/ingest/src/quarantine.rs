//! Quarantine directory management.
//!
//! Unusable files are *relocated* into a holding directory instead of being
//! deleted, so a bad run never destroys data irreversibly. Moves are
//! best-effort: a file that cannot be relocated is logged and left in place,
//! and the run carries on.

use crate::error::{ErrorKind, Result};
use crate::file::{Disposition, QuarantineReason};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum numeric suffixes tried before a collision counts as a failed move.
const MAX_COLLISION_SUFFIX: usize = 100;

/// A holding directory for files that fail validation.
#[derive(Debug, Clone)]
pub struct Quarantine {
    dir: PathBuf,
}

impl Quarantine {
    /// Create a quarantine rooted at `dir`, creating the directory if it
    /// does not already exist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::QuarantineDir`] when the directory cannot be
    /// created.
    pub fn ensure(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| ErrorKind::QuarantineDir(dir.clone(), e))?;
        Ok(Self { dir })
    }

    /// The quarantine directory itself.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Move `path` into the quarantine, resolving the result to a
    /// [`Disposition`].
    ///
    /// Relocation failures are logged with their cause and reported as
    /// [`Disposition::LeftInPlace`], never raised. A file we cannot move is
    /// simply skipped for this run.
    pub(crate) fn admit(&self, path: &Path, reason: QuarantineReason) -> Disposition {
        match self.relocate(path) {
            Ok(dest) => {
                tracing::info!(from = %path.display(), to = %dest.display(), "file quarantined");
                Disposition::Quarantined(dest, reason)
            },
            Err(cause) => {
                tracing::error!(path = %path.display(), %cause, "failed to move file to quarantine; leaving in place");
                Disposition::LeftInPlace(path.to_path_buf())
            },
        }
    }

    fn relocate(&self, path: &Path) -> io::Result<PathBuf> {
        let dest = self.vacant_slot(path)?;
        fs::rename(path, &dest)?;
        Ok(dest)
    }

    /// Pick a destination that preserves the base filename, appending a
    /// numeric suffix before the extension (`cell-1.png`, `cell-2.png`, …)
    /// when differently-pathed files share a name. Bounded, so two files
    /// can never chase each other indefinitely.
    fn vacant_slot(&self, path: &Path) -> io::Result<PathBuf> {
        let name = path.file_name().ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        let candidate = self.dir.join(name);
        if !candidate.exists() {
            return Ok(candidate);
        }
        let stem = path.file_stem().unwrap_or(name).to_string_lossy();
        let extension = path.extension().and_then(OsStr::to_str);
        for n in 1..=MAX_COLLISION_SUFFIX {
            let disambiguated = match extension {
                Some(ext) => format!("{stem}-{n}.{ext}"),
                None => format!("{stem}-{n}"),
            };
            let candidate = self.dir.join(disambiguated);
            if !candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(io::Error::new(io::ErrorKind::AlreadyExists, "too many quarantined files share this base name"))
    }
}
