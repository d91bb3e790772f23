//! Errors for the fallible outer surface
//!
//! The simulation core never fails; only reading levels, settings and save
//! data from their serialized forms can.

use std::path::PathBuf;

use thiserror::Error;

/// Crate error type
#[derive(Debug, Error)]
pub enum Error {
    /// Serialized data could not be parsed or produced
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A file could not be read or written
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
