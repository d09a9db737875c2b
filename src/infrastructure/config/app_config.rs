//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::infrastructure::image::DowngradeRule;

pub(super) const APP_NAME: &str = "maodie";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "maodie";

/// Trigger phrase used when the config does not set one.
pub const DEFAULT_TRIGGER_PHRASE: &str = "哈个气";

/// Largest accepted download (50 MiB).
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, loaded from TOML and overridden by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory holding the sticker collection.
    #[serde(default)]
    pub images_dir: Option<PathBuf>,

    /// Substring that triggers an automatic sticker reply.
    #[serde(default = "default_trigger_phrase")]
    pub trigger_phrase: String,

    /// Download settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Sticker command settings.
    #[serde(default)]
    pub stickers: StickersConfig,
}

/// Download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Responses larger than this are discarded.
    #[serde(default = "default_max_download_bytes")]
    pub max_download_bytes: u64,

    /// User-Agent header sent with downloads.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Hosts whose URLs get their scheme rewritten before download.
    #[serde(default = "default_downgrade_rules")]
    pub downgrade: Vec<DowngradeRule>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_download_bytes: default_max_download_bytes(),
            user_agent: default_user_agent(),
            downgrade: default_downgrade_rules(),
        }
    }
}

/// Sticker command settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StickersConfig {
    /// How many recent stickers the list command shows.
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,
}

impl Default for StickersConfig {
    fn default() -> Self {
        Self {
            recent_count: default_recent_count(),
        }
    }
}

fn default_trigger_phrase() -> String {
    DEFAULT_TRIGGER_PHRASE.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_download_bytes() -> u64 {
    DEFAULT_MAX_DOWNLOAD_BYTES
}

fn default_user_agent() -> String {
    format!("{APP_NAME}/{}", env!("CARGO_PKG_VERSION"))
}

fn default_downgrade_rules() -> Vec<DowngradeRule> {
    vec![DowngradeRule::https_to_http("multimedia.nt.qq.com.cn")]
}

const fn default_recent_count() -> usize {
    5
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(images_dir) = args.images_dir {
            self.images_dir = Some(images_dir);
        }
        if let Some(trigger_phrase) = args.trigger_phrase {
            self.trigger_phrase = trigger_phrase;
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.fetch.timeout_secs = timeout_secs;
        }
        if let Some(max_download_bytes) = args.max_download_bytes {
            self.fetch.max_download_bytes = max_download_bytes;
        }
    }

    /// Returns default sticker directory.
    #[must_use]
    pub fn default_images_dir() -> PathBuf {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME).map_or_else(
            || std::env::temp_dir().join(APP_NAME).join("maodie_images"),
            |dirs| dirs.data_dir().join("maodie_images"),
        )
    }

    /// Returns effective sticker directory.
    #[must_use]
    pub fn effective_images_dir(&self) -> PathBuf {
        self.images_dir
            .clone()
            .unwrap_or_else(Self::default_images_dir)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::Info,
            images_dir: None,
            trigger_phrase: default_trigger_phrase(),
            fetch: FetchConfig::default(),
            stickers: StickersConfig::default(),
        }
    }
}
