//! Download error types.

use thiserror::Error;

use super::StoreError;

/// Reasons a single locator could not be turned into a stored image.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("invalid image url {url}: {reason}")]
    InvalidLocator { url: String, reason: String },

    #[error("request timed out")]
    Timeout,

    #[error("network error: {message}")]
    Network { message: String },

    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("image too large: {actual} bytes exceeds limit of {limit} bytes")]
    TooLarge { limit: u64, actual: u64 },

    #[error("failed to store image: {0}")]
    Store(#[from] StoreError),
}

impl FetchError {
    /// Creates an invalid locator error.
    #[must_use]
    pub fn invalid(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocator {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Returns whether the failure came from the remote side rather than local storage.
    #[must_use]
    pub const fn is_download_failure(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                status: status.as_u16(),
            }
        } else {
            Self::network(err.to_string())
        }
    }
}
