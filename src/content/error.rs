//! Errors raised while reading the content store

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed `{field}` in {path:?}: {reason}")]
    Malformed {
        path: PathBuf,
        field: String,
        reason: String,
    },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ContentError::Io {
            path: path.into(),
            source,
        }
    }
}
