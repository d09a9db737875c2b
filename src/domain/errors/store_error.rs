//! Collection storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Collection storage error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StoreError {
    #[error("collection directory {path} is unavailable: {message}")]
    DirectoryUnavailable { path: PathBuf, message: String },

    #[error("failed to write image {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },
}

impl StoreError {
    /// Creates a directory-level error.
    #[must_use]
    pub fn directory(path: impl Into<PathBuf>, source: &std::io::Error) -> Self {
        Self::DirectoryUnavailable {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a single-file write error.
    #[must_use]
    pub fn write(path: impl Into<PathBuf>, source: &std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            message: source.to_string(),
        }
    }
}
