use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use maodie::infrastructure::{
    AppConfig, CliArgs, CollectionStore, ConfigOrigin, ImageDownloader, StorageManager,
};
use maodie::presentation::{PluginOptions, StdioBridge, StickerPlugin};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        // stdout carries the bridge protocol
        let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn load_config() -> Result<(AppConfig, ConfigOrigin)> {
    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let (mut config, origin) = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok((config, origin))
}

async fn create_plugin(config: &AppConfig) -> Result<StickerPlugin> {
    let collection = Arc::new(CollectionStore::new(config.effective_images_dir()).await?);
    let fetcher = Arc::new(ImageDownloader::new(&config.fetch)?);

    Ok(StickerPlugin::new(
        collection,
        fetcher,
        PluginOptions {
            trigger_phrase: config.trigger_phrase.clone(),
            recent_count: config.stickers.recent_count,
        },
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let (config, origin) = load_config()?;
    init_logging(&config)?;

    info!(version = maodie::VERSION, "Starting maodie");
    origin.report();

    let plugin = Arc::new(create_plugin(&config).await?);
    let bridge = StdioBridge::new(plugin);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    bridge.run(stdin, tokio::io::stdout()).await?;

    Ok(())
}
