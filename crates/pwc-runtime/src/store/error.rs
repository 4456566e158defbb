//! Store error types.

use pwc_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from a [`KeyValueStore`](super::KeyValueStore) backend.
///
/// | Error | Code | Recoverable |
/// |-------|------|-------------|
/// | [`StoreError::Io`] | `STORE_IO` | Yes |
/// | [`StoreError::DirectoryCreation`] | `STORE_DIRECTORY_CREATION` | No |
/// | [`StoreError::InvalidKey`] | `STORE_INVALID_KEY` | No |
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to create store directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid store key: {0:?}")]
    InvalidKey(String),
}

impl StoreError {
    /// Creates a DirectoryCreation error.
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }
}

impl ErrorCode for StoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "STORE_IO",
            Self::DirectoryCreation { .. } => "STORE_DIRECTORY_CREATION",
            Self::InvalidKey(_) => "STORE_INVALID_KEY",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
