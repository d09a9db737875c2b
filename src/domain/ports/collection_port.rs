//! Port definition for the sticker collection.

use std::cmp::Reverse;
use std::path::Path;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::domain::entities::{CollectionStats, ImageExtension, StoredImage};
use crate::domain::errors::StoreError;

/// Port for the on-disk bag of images.
/// Implementations hold no in-memory state beyond their root location.
#[async_trait]
pub trait CollectionPort: Send + Sync {
    /// Location shown to users in statistics.
    fn root(&self) -> &Path;

    /// Lists every allow-listed image currently in the collection.
    async fn list(&self) -> Result<Vec<StoredImage>, StoreError>;

    /// Persists bytes under a freshly generated name.
    async fn store(
        &self,
        bytes: &[u8],
        extension: Option<ImageExtension>,
    ) -> Result<StoredImage, StoreError>;

    /// Deletes every listed image and returns how many were removed.
    async fn clear(&self) -> Result<usize, StoreError>;

    /// Picks one image uniformly at random, or `None` when empty.
    async fn pick_random(&self) -> Result<Option<StoredImage>, StoreError> {
        let images = self.list().await?;
        let picked = {
            let mut rng = rand::thread_rng();
            images.choose(&mut rng).cloned()
        };
        Ok(picked)
    }

    /// Aggregates count, total size and the `recent` newest images.
    async fn stats(&self, recent: usize) -> Result<CollectionStats, StoreError> {
        let mut images = self.list().await?;
        let count = images.len();
        let total_size_bytes = images.iter().map(StoredImage::size).sum();

        images.sort_by_key(|image| Reverse(image.modified()));
        images.truncate(recent);

        Ok(CollectionStats {
            count,
            total_size_bytes,
            recent: images,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockCollection;
    use super::*;

    #[tokio::test]
    async fn test_pick_random_on_empty_collection() {
        let collection = MockCollection::new();
        assert!(collection.pick_random().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pick_random_returns_member() {
        let collection = MockCollection::new()
            .with_image("a.png", 1, 10)
            .with_image("b.gif", 2, 20);

        let listed = collection.list().await.unwrap();
        for _ in 0..20 {
            let picked = collection.pick_random().await.unwrap().unwrap();
            assert!(listed.contains(&picked));
        }
    }

    #[tokio::test]
    async fn test_stats_orders_recent_by_mtime() {
        let collection = MockCollection::new()
            .with_image("old.png", 100, 10)
            .with_image("new.png", 200, 30)
            .with_image("mid.png", 300, 20);

        let stats = collection.stats(2).await.unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.total_size_bytes, 600);
        let names: Vec<_> = stats.recent.iter().map(StoredImage::file_name).collect();
        assert_eq!(names, vec!["new.png", "mid.png"]);
    }

    #[tokio::test]
    async fn test_stats_propagates_directory_error() {
        let collection = MockCollection::unavailable();
        assert!(matches!(
            collection.stats(5).await,
            Err(StoreError::DirectoryUnavailable { .. })
        ));
    }
}
