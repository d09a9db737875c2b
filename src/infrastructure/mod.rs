//! Infrastructure layer with filesystem, network and configuration adapters.

/// Application configuration.
pub mod config;
/// Sticker storage and downloads.
pub mod image;

pub use config::{AppConfig, CliArgs, ConfigError, ConfigOrigin, LogLevel, StorageManager};
pub use image::{CollectionStore, DowngradeRule, ImageDownloader, apply_downgrade};
