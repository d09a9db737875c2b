//! Flat directory of sticker images.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::domain::entities::{ImageExtension, StoredImage};
use crate::domain::errors::StoreError;
use crate::domain::ports::CollectionPort;

/// Sticker collection backed by a single directory.
///
/// The directory listing is the whole state: files are named by a random
/// token plus an allow-listed extension, and anything else in the
/// directory is ignored.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    root: PathBuf,
}

impl CollectionStore {
    /// Opens the collection, creating the directory if needed.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created.
    pub async fn new(root: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::directory(&root, &e))?;

        debug!(path = %root.display(), "Opened sticker collection");
        Ok(Self { root })
    }

    fn image_path(&self, token: &str, extension: ImageExtension) -> PathBuf {
        self.root.join(format!("{token}{extension}"))
    }

    /// Reads one directory entry, returning `None` for anything that is not a member.
    async fn read_member(path: PathBuf) -> Option<StoredImage> {
        let extension = ImageExtension::from_path(&path)?;

        let meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to stat sticker, skipping");
                return None;
            }
        };

        if !meta.is_file() {
            trace!(path = %path.display(), "Skipping non-file entry");
            return None;
        }

        let modified =
            DateTime::<Utc>::from(meta.modified().unwrap_or(std::time::SystemTime::UNIX_EPOCH));

        Some(StoredImage::new(path, meta.len(), modified, extension))
    }
}

#[async_trait]
impl CollectionPort for CollectionStore {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn list(&self) -> Result<Vec<StoredImage>, StoreError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| StoreError::directory(&self.root, &e))?;

        let mut images = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::directory(&self.root, &e))?
        {
            if let Some(image) = Self::read_member(entry.path()).await {
                images.push(image);
            }
        }

        trace!(count = images.len(), "Listed sticker collection");
        Ok(images)
    }

    async fn store(
        &self,
        bytes: &[u8],
        extension: Option<ImageExtension>,
    ) -> Result<StoredImage, StoreError> {
        let extension = extension.unwrap_or_default();
        let token = Uuid::new_v4().simple().to_string();
        let path = self.image_path(&token, extension);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| StoreError::write(&path, &e))?;

        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %cleanup, "Failed to remove partial sticker");
            }
            return Err(StoreError::write(&path, &e));
        }
        drop(file);

        let modified = fs::metadata(&path)
            .await
            .and_then(|meta| meta.modified())
            .map_or_else(|_| Utc::now(), DateTime::<Utc>::from);

        info!(path = %path.display(), size = bytes.len(), "Stored sticker");

        Ok(StoredImage::new(
            path,
            bytes.len() as u64,
            modified,
            extension,
        ))
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let images = self.list().await?;

        let mut deleted = 0usize;
        let mut failed = 0usize;
        for image in &images {
            match fs::remove_file(image.path()).await {
                Ok(()) => {
                    debug!(path = %image.path().display(), "Removed sticker");
                    deleted += 1;
                }
                Err(e) => {
                    warn!(path = %image.path().display(), error = %e, "Failed to remove sticker");
                    failed += 1;
                }
            }
        }

        info!(deleted, failed, "Cleared sticker collection");
        Ok(deleted)
    }
}
