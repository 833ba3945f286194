use namdrestart::engine::error::RestartError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Restart(#[from] RestartError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error(
        "Could not launch NAMD executable '{executable}': {source}. \
         Specify its path with -e/--namd-exe."
    )]
    ExecutableMissing {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dynamic ended with error status, see '{}'", err_path.display())]
    Simulation { err_path: PathBuf },

    #[error("Interrupted by user.")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
