//! Port definition for downloading images.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::FetchError;

/// Port for turning a locator into raw image bytes.
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Downloads the body behind `url`, applying transport and size policy.
    async fn download(&self, url: &str) -> Result<Bytes, FetchError>;
}
