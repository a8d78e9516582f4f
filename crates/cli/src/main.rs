//! The `plasmo` binary.
//!
//! Thin command surface over [`plasmo_ingest`]: structural faults are caught
//! here and printed as a one-line diagnosis; per-file recoveries are visible
//! only through the log stream and the final counts.

use clap::{Parser, Subcommand};
use plasmo_config::Config;
use plasmo_ingest::dataset::DatasetIndex;
use plasmo_ingest::{Disposition, Ingestor};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod exit_codes {
    pub const OK: u8 = 0;
    /// Structural fault: missing class directory, unreadable tree.
    pub const FAILURE: u8 = 1;
    /// Configuration could not be loaded or validated.
    pub const CONFIG_ERROR: u8 = 2;
}

#[derive(Parser)]
#[command(name = "plasmo", version, about = "Malaria cell-image dataset preparation")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Dataset root directory, overriding the configured value
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that every class directory exists under the dataset root
    Verify,
    /// Verify, clean-load and summarize the dataset
    Ingest,
    /// Build the path/label index and report train/test partition sizes
    Split {
        /// Training fraction, overriding the configured value
        #[arg(long)]
        ratio: Option<f64>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", &*e);
            return ExitCode::from(exit_codes::CONFIG_ERROR);
        },
    };
    match dispatch(cli, config) {
        Ok(()) => ExitCode::from(exit_codes::OK),
        Err(e) => {
            eprintln!("error: {}", &*e);
            ExitCode::from(exit_codes::FAILURE)
        },
    }
}

fn dispatch(cli: Cli, mut config: Config) -> plasmo_ingest::error::Result<()> {
    if let Some(root) = cli.root {
        config.dataset.root = root;
    }
    let dataset = config.dataset;
    match cli.command {
        Command::Verify => {
            let ingestor = Ingestor::new(&dataset.root, dataset.classes, &dataset.quarantine_dir)?;
            ingestor.verify()?;
            println!("ok: all class directories present under {}", dataset.root.display());
        },
        Command::Ingest => {
            let mut ingestor = Ingestor::new(&dataset.root, dataset.classes, &dataset.quarantine_dir)?;
            ingestor.verify()?;
            let dispositions = ingestor.clean_load()?;
            let summary = ingestor.summarize();
            let quarantined = dispositions.iter().filter(|d| matches!(d, Disposition::Quarantined(_, _))).count();
            let skipped = dispositions.iter().filter(|d| matches!(d, Disposition::LeftInPlace(_))).count();
            println!("{summary}");
            println!("quarantined: {quarantined}");
            if skipped > 0 {
                println!("left in place (quarantine move failed): {skipped}");
            }
        },
        Command::Split { ratio } => {
            let index = DatasetIndex::build(&dataset.root, dataset.classes)?;
            for (label, class) in index.classes().iter().enumerate() {
                println!("{class}: {} files", index.class_count(label));
            }
            let (train, test) = index.split(ratio.unwrap_or(dataset.train_fraction));
            println!("train: {} / test: {}", train.len(), test.len());
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dispatch_end_to_end() {
        let temp_dir = tempfile::tempdir().unwrap();
        for class in ["Parasitized", "Uninfected"] {
            std::fs::create_dir_all(temp_dir.path().join(class)).unwrap();
        }
        let cli = Cli::parse_from(["plasmo", "--root", temp_dir.path().to_str().unwrap(), "verify"]);
        let mut config = Config::default();
        config.dataset.root = PathBuf::from("/does/not/exist");
        assert!(dispatch(cli, config).is_ok());
    }

    #[test]
    fn test_dispatch_missing_root_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from(["plasmo", "--root", temp_dir.path().to_str().unwrap(), "verify"]);
        assert!(dispatch(cli, Config::default()).is_err());
    }
}
