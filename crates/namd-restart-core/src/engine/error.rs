use thiserror::Error;

use super::rewriter::RewriteError;
use crate::core::checkpoint::resolver::ResolveError;
use crate::core::io::conf::ConfError;
use crate::core::io::xsc::XscError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum RestartError {
    #[error("No .conf file found under {}. Please specify its path explicitly.", directory.display())]
    ConfNotFound { directory: PathBuf },

    #[error("Found {} .conf files under {}. Please specify which one to use.", candidates.len(), directory.display())]
    AmbiguousConf {
        directory: PathBuf,
        candidates: Vec<PathBuf>,
    },

    #[error("Failed to scan {}: {source}", directory.display())]
    Scan {
        directory: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Could not read restart step from '{}': {source}", path.display())]
    Xsc {
        path: PathBuf,
        #[source]
        source: XscError,
    },

    #[error("Could not read configuration file '{}': {source}", path.display())]
    ReadConf {
        path: PathBuf,
        #[source]
        source: ConfError,
    },

    #[error("Configuration rewrite failed: {0}")]
    Rewrite(#[from] RewriteError),

    #[error("Could not prepare output folder '{}': {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not write configuration file '{}': {source}", path.display())]
    WriteConf {
        path: PathBuf,
        #[source]
        source: ConfError,
    },
}
