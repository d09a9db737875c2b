//! Application configuration.

/// Config file schema and defaults.
pub mod app_config;
/// Command-line flags.
pub mod args;
/// Config file loading and saving.
pub mod storage;

pub use app_config::{AppConfig, FetchConfig, LogLevel, StickersConfig};
pub use args::CliArgs;
pub use storage::{ConfigError, ConfigOrigin, StorageManager};
