//! Image handling infrastructure.
//!
//! This module provides:
//! - The directory-backed sticker collection
//! - HTTP downloads with size and timeout limits
//! - Per-host scheme downgrade rules

pub mod collection_store;
pub mod downgrade;
pub mod downloader;

pub use collection_store::CollectionStore;
pub use downgrade::{DowngradeRule, apply_downgrade};
pub use downloader::ImageDownloader;
