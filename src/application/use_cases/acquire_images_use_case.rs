//! Download-and-store workflow for new stickers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::services::LocatorExtractor;
use crate::domain::entities::StoredImage;
use crate::domain::errors::FetchError;
use crate::domain::ports::{CollectionPort, ImageFetchPort};

/// Result of processing a batch of locators.
#[derive(Debug, Default)]
pub struct AcquireOutcome {
    /// Images persisted to the collection.
    pub stored: Vec<StoredImage>,
    /// Locators that could not be stored, with the reason.
    pub failures: Vec<(String, FetchError)>,
}

impl AcquireOutcome {
    /// Number of stored images.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.stored.len()
    }

    /// Number of dropped locators.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Turns locators into stored images, one at a time, never aborting the batch.
#[derive(Clone)]
pub struct AcquireImagesUseCase {
    fetch_port: Arc<dyn ImageFetchPort>,
    collection_port: Arc<dyn CollectionPort>,
}

impl AcquireImagesUseCase {
    /// Creates new acquire use case.
    #[must_use]
    pub const fn new(
        fetch_port: Arc<dyn ImageFetchPort>,
        collection_port: Arc<dyn CollectionPort>,
    ) -> Self {
        Self {
            fetch_port,
            collection_port,
        }
    }

    /// Downloads and stores a single locator.
    ///
    /// # Errors
    /// Returns error if the download or the write fails.
    pub async fn acquire_one(&self, locator: &str) -> Result<StoredImage, FetchError> {
        let bytes = self.fetch_port.download(locator).await?;
        let extension = LocatorExtractor::extension_of(locator);
        debug!(url = %locator, size = bytes.len(), ?extension, "Downloaded sticker");

        Ok(self.collection_port.store(&bytes, extension).await?)
    }

    /// Processes every locator and folds the per-item results.
    pub async fn execute(&self, locators: &[String]) -> AcquireOutcome {
        let mut outcome = AcquireOutcome::default();

        for locator in locators {
            match self.acquire_one(locator).await {
                Ok(image) => outcome.stored.push(image),
                Err(e) => {
                    warn!(url = %locator, error = %e, "Failed to add sticker");
                    outcome.failures.push((locator.clone(), e));
                }
            }
        }

        info!(
            stored = outcome.success_count(),
            failed = outcome.failure_count(),
            "Sticker batch processed"
        );
        outcome
    }
}
