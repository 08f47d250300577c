//! CLI error type.

use std::path::PathBuf;

use binscan::config::ConfigError;
use binscan::logging::LoggingError;
use binscan::registry::RegistryError;
use binscan::scan::ScanError;
use console::style;
use thiserror::Error;

/// Errors surfaced to the command line. Every variant exits with status 1.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("Failed to set up client: {0}")]
    Client(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("{0}")]
    InvalidArgument(String),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl CliError {
    /// Print the error to stderr and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("{} {}", style("Error:").red().bold(), self);
        std::process::exit(1);
    }
}
