//! Error types for reference loading.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    /// Neither the cache nor the snapshot source could be read.
    #[error("{0}")]
    Unavailable(String),
}

impl ReferenceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReferenceError::Io {
            path: path.into(),
            source,
        }
    }
}
