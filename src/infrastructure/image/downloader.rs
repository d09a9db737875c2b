//! HTTP download of sticker images.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::Url;
use tracing::{debug, trace};

use crate::domain::errors::FetchError;
use crate::domain::ports::ImageFetchPort;
use crate::infrastructure::config::FetchConfig;

use super::downgrade::{DowngradeRule, apply_downgrade};

/// Downloads locators with a timeout, a size ceiling and per-host scheme rules.
pub struct ImageDownloader {
    http_client: reqwest::Client,
    max_bytes: u64,
    downgrade: Vec<DowngradeRule>,
}

impl std::fmt::Debug for ImageDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageDownloader")
            .field("max_bytes", &self.max_bytes)
            .field("downgrade", &self.downgrade)
            .finish_non_exhaustive()
    }
}

impl ImageDownloader {
    /// Creates a downloader from the fetch configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            max_bytes: config.max_download_bytes,
            downgrade: config.downgrade.clone(),
        })
    }

    fn resolve(&self, url: &str) -> Result<Url, FetchError> {
        let target = apply_downgrade(url, &self.downgrade);
        if target != url {
            debug!(from = %url, to = %target, "Applied scheme downgrade");
        }

        let parsed = Url::parse(&target).map_err(|e| FetchError::invalid(url, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::invalid(url, "unsupported scheme"));
        }
        Ok(parsed)
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::TooLarge {
            limit: self.max_bytes,
            actual,
        }
    }
}

#[async_trait]
impl ImageFetchPort for ImageDownloader {
    async fn download(&self, url: &str) -> Result<Bytes, FetchError> {
        let target = self.resolve(url)?;
        debug!(url = %target, "Downloading sticker");

        let mut response = self.http_client.get(target).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        if let Some(declared) = response.content_length()
            && declared > self.max_bytes
        {
            return Err(self.too_large(declared));
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            let received = (body.len() + chunk.len()) as u64;
            if received > self.max_bytes {
                return Err(self.too_large(received));
            }
            body.extend_from_slice(&chunk);
        }

        trace!(size = body.len(), "Download complete");
        Ok(body.freeze())
    }
}
