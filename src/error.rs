// File: src/error.rs
//! Error types for the ontext pipeline.
//!
//! Every error is fatal: the run aborts and no matrices are emitted.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OntextError {
    /// An input file or directory could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A category pair names a category with no instance file.
    #[error("no instance file for category '{category}' at {}", .path.display())]
    MissingCategory { category: String, path: PathBuf },

    /// A malformed line in the category or SVO file.
    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The report could not be serialized or written.
    #[error("emit failed: {0}")]
    Emit(String),

    /// Invalid runtime configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl OntextError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for OntextError {
    fn from(e: serde_json::Error) -> Self {
        Self::Emit(e.to_string())
    }
}

pub type OntextResult<T> = Result<T, OntextError>;
