//! Configuration loading and validation for plasmo.
//!
//! Settings are resolved in layers, later layers overriding earlier ones:
//!
//! 1. Compiled-in defaults ([`Config::default`]).
//! 2. A TOML file: either an explicit path, or `config.toml` in the
//!    platform configuration directory for `plasmo` when present.
//! 3. Environment variables prefixed with `PLASMO_`, using `__` as the
//!    section separator (e.g. `PLASMO_DATASET__ROOT`).

pub mod error;

use crate::error::{ErrorKind, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "PLASMO_";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
}

/// Settings describing the on-disk dataset layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Root directory containing one subdirectory per class.
    pub root: PathBuf,
    /// Ordered class vocabulary. Each entry names a subdirectory of `root`
    /// and doubles as the label attached to samples loaded from it.
    pub classes: Vec<String>,
    /// Name of the quarantine subdirectory created under `root`.
    pub quarantine_dir: String,
    /// Fraction of the dataset index assigned to the training partition.
    pub train_fraction: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig {
                root: PathBuf::from("data/raw"),
                classes: vec!["Parasitized".to_owned(), "Uninfected".to_owned()],
                quarantine_dir: "corrupted".to_owned(),
                train_fraction: 0.8,
            },
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional TOML file, and the
    /// environment.
    ///
    /// When `file` is given it must exist; otherwise the platform default
    /// location is consulted and silently skipped when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Figment`] when a layer fails to read or parse,
    /// and a validation error when the merged result is inconsistent.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let figment = match file {
            Some(path) => figment.merge(Toml::file_exact(path)),
            None => match default_config_file() {
                Some(path) => figment.merge(Toml::file(path)),
                None => figment,
            },
        };
        let config: Self = figment.merge(Env::prefixed(ENV_PREFIX).split("__")).extract().map_err(ErrorKind::from)?;
        config.validate()?;
        tracing::debug!(root = %config.dataset.root.display(), classes = ?config.dataset.classes, "configuration resolved");
        Ok(config)
    }

    /// Check invariants that the individual layers cannot express.
    pub fn validate(&self) -> Result<()> {
        let dataset = &self.dataset;
        if dataset.classes.is_empty() {
            exn::bail!(ErrorKind::EmptyClasses);
        }
        for (index, class) in dataset.classes.iter().enumerate() {
            if dataset.classes[..index].contains(class) {
                exn::bail!(ErrorKind::DuplicateClass(class.clone()));
            }
            if *class == dataset.quarantine_dir {
                exn::bail!(ErrorKind::QuarantineClash(class.clone()));
            }
        }
        Ok(())
    }
}

/// Platform-specific default configuration file (`config.toml` inside the
/// user's configuration directory for plasmo).
fn default_config_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "plasmo").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config_with_classes(classes: &[&str]) -> Config {
        let mut config = Config::default();
        config.dataset.classes = classes.iter().map(|s| s.to_string()).collect();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.dataset.classes, vec!["Parasitized", "Uninfected"]);
        assert_eq!(config.dataset.quarantine_dir, "corrupted");
        assert_eq!(config.dataset.root, PathBuf::from("data/raw"));
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(&["Parasitized", "Uninfected"], true)]
    #[case(&["Parasitized"], true)]
    #[case(&["a", "b", "c"], true)]
    #[case(&[], false)]
    #[case(&["Parasitized", "Parasitized"], false)]
    #[case(&["corrupted"], false)]
    fn test_validate(#[case] classes: &[&str], #[case] valid: bool) {
        let config = config_with_classes(classes);
        assert_eq!(config.validate().is_ok(), valid);
    }

    #[test]
    fn test_duplicate_class_names_offender() {
        let config = config_with_classes(&["Parasitized", "Uninfected", "Parasitized"]);
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::DuplicateClass(name) if name == "Parasitized"));
    }

    #[test]
    fn test_file_and_env_layers() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "plasmo.toml",
                r#"
                    [dataset]
                    root = "/srv/cells"
                    classes = ["Parasitized", "Uninfected", "Ambiguous"]
                "#,
            )?;
            jail.set_env("PLASMO_DATASET__QUARANTINE_DIR", "rejects");
            let config = Config::load(Some(Path::new("plasmo.toml"))).expect("config should load");
            assert_eq!(config.dataset.root, PathBuf::from("/srv/cells"));
            assert_eq!(config.dataset.classes.len(), 3);
            assert_eq!(config.dataset.quarantine_dir, "rejects");
            // Unset keys fall back to compiled defaults.
            assert_eq!(config.dataset.train_fraction, 0.8);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        let err = Config::load(Some(&missing)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Figment(_)));
    }
}
