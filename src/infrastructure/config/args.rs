use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Command-line flags; every value overrides the config file.
#[derive(Debug, Parser)]
#[command(
    name = "maodie",
    version,
    about = "Sticker collection add-on speaking line-delimited JSON over stdio",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Directory holding the sticker collection.
    #[arg(long, value_name = "DIR", env = "MAODIE_IMAGES_DIR")]
    pub images_dir: Option<PathBuf>,

    /// Substring that triggers an automatic sticker reply.
    #[arg(long)]
    pub trigger_phrase: Option<String>,

    /// Download timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Largest accepted download in bytes.
    #[arg(long)]
    pub max_download_bytes: Option<u64>,
}
