use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Image file extensions accepted into the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum ImageExtension {
    #[default]
    Jpg,
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
}

impl ImageExtension {
    /// Every allow-listed extension.
    pub const ALL: [Self; 6] = [
        Self::Jpg,
        Self::Jpeg,
        Self::Png,
        Self::Gif,
        Self::Bmp,
        Self::Webp,
    ];

    /// Parses an extension, ignoring case and an optional leading dot.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.strip_prefix('.').unwrap_or(value);
        Self::ALL
            .into_iter()
            .find(|ext| ext.as_str().eq_ignore_ascii_case(value))
    }

    /// Reads the extension of a file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    /// Returns the extension without the leading dot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Webp => "webp",
        }
    }
}

impl std::fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ".{}", self.as_str())
    }
}

/// An image file persisted in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    path: PathBuf,
    size: u64,
    modified: DateTime<Utc>,
    extension: ImageExtension,
}

#[allow(missing_docs)]
impl StoredImage {
    #[must_use]
    pub const fn new(
        path: PathBuf,
        size: u64,
        modified: DateTime<Utc>,
        extension: ImageExtension,
    ) -> Self {
        Self {
            path,
            size,
            modified,
            extension,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub const fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    #[must_use]
    pub const fn extension(&self) -> ImageExtension {
        self.extension
    }

    /// File name including the extension, used as the stable identifier.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }
}

/// Aggregate view over the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Number of images.
    pub count: usize,
    /// Sum of file sizes in bytes.
    pub total_size_bytes: u64,
    /// Most recently modified images, newest first.
    pub recent: Vec<StoredImage>,
}

impl CollectionStats {
    /// Total size in mebibytes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_size_mb(&self) -> f64 {
        self.total_size_bytes as f64 / (1024.0 * 1024.0)
    }
}
