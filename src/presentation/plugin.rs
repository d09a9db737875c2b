//! Sticker plugin entry points invoked by the host.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::{AcquireImagesUseCase, LocatorExtractor};
use crate::domain::entities::{InboundEvent, Reply};
use crate::domain::errors::StoreError;
use crate::domain::ports::{CollectionPort, ImageFetchPort};

use super::commands::{CommandRegistry, StickerCommand};
use super::replies;

/// Plugin settings that shape replies.
#[derive(Debug, Clone)]
pub struct PluginOptions {
    /// Substring that triggers an automatic sticker reply.
    pub trigger_phrase: String,
    /// How many recent stickers the list command shows.
    pub recent_count: usize,
}

/// Reacts to inbound events with sticker replies.
pub struct StickerPlugin {
    collection: Arc<dyn CollectionPort>,
    acquire: AcquireImagesUseCase,
    registry: CommandRegistry,
    options: PluginOptions,
}

impl StickerPlugin {
    /// Creates the plugin over a collection and a fetcher.
    #[must_use]
    pub fn new(
        collection: Arc<dyn CollectionPort>,
        fetcher: Arc<dyn ImageFetchPort>,
        options: PluginOptions,
    ) -> Self {
        info!(
            path = %collection.root().display(),
            trigger = %options.trigger_phrase,
            "Sticker plugin loaded"
        );

        Self {
            acquire: AcquireImagesUseCase::new(fetcher, collection.clone()),
            collection,
            registry: CommandRegistry::default(),
            options,
        }
    }

    /// Handles any inbound event. Commands win over the trigger phrase.
    pub async fn handle(&self, event: &InboundEvent) -> Option<Reply> {
        if let Some(command) = self.registry.resolve(&event.text) {
            return Some(self.handle_command(command, event).await);
        }
        self.on_message(event).await
    }

    /// Passive trigger: replies with a random sticker when the phrase appears.
    pub async fn on_message(&self, event: &InboundEvent) -> Option<Reply> {
        if self.options.trigger_phrase.is_empty()
            || !event.text.trim().contains(&self.options.trigger_phrase)
        {
            return None;
        }

        info!(sender = %event.sender.name, "Trigger phrase received");

        match self.collection.pick_random().await {
            Ok(Some(image)) => {
                debug!(file = %image.file_name(), "Picked sticker");
                Some(Reply::text_with_image(
                    replies::TRIGGER_CAPTION,
                    image.path(),
                ))
            }
            Ok(None) => {
                warn!("Sticker collection is empty");
                Some(Reply::plain(replies::TRIGGER_EMPTY))
            }
            Err(e) => {
                error!(error = %e, "Failed to handle trigger phrase");
                Some(Reply::plain(replies::TRIGGER_ERROR))
            }
        }
    }

    /// Runs a command after checking the admin gate.
    pub async fn handle_command(&self, command: StickerCommand, event: &InboundEvent) -> Reply {
        if command.requires_admin() && !event.sender.is_admin {
            warn!(%command, sender = %event.sender.id, "Rejected non-admin command");
            return Reply::plain(replies::ADMIN_ONLY);
        }

        debug!(%command, sender = %event.sender.id, "Running command");

        let (result, failure_text) = match command {
            StickerCommand::AddSticker => (Ok(self.add_sticker(event).await), replies::ADD_ERROR),
            StickerCommand::ListStickers => (self.list_stickers().await, replies::LIST_ERROR),
            StickerCommand::ClearStickers => (self.clear_stickers().await, replies::CLEAR_ERROR),
            StickerCommand::RandomSticker => (self.random_sticker().await, replies::RANDOM_ERROR),
        };

        result.unwrap_or_else(|e| {
            error!(%command, error = %e, "Command failed");
            Reply::plain(failure_text)
        })
    }

    async fn add_sticker(&self, event: &InboundEvent) -> Reply {
        let locators = LocatorExtractor::extract(event);
        if locators.is_empty() {
            return Reply::plain(replies::ADD_NO_IMAGE);
        }

        let outcome = self.acquire.execute(&locators).await;
        if outcome.success_count() == 0 {
            return Reply::plain(replies::ADD_FAILED);
        }

        Reply::plain(replies::added(
            outcome.success_count(),
            outcome.failure_count(),
        ))
    }

    async fn list_stickers(&self) -> Result<Reply, StoreError> {
        let stats = self.collection.stats(self.options.recent_count).await?;
        if stats.count == 0 {
            return Ok(Reply::plain(replies::LIST_EMPTY));
        }

        Ok(Reply::plain(replies::stats_report(
            &stats,
            self.collection.root(),
            self.options.recent_count,
        )))
    }

    async fn clear_stickers(&self) -> Result<Reply, StoreError> {
        if self.collection.list().await?.is_empty() {
            return Ok(Reply::plain(replies::CLEAR_EMPTY));
        }

        let deleted = self.collection.clear().await?;
        Ok(Reply::plain(replies::cleared(deleted)))
    }

    async fn random_sticker(&self) -> Result<Reply, StoreError> {
        Ok(match self.collection.pick_random().await? {
            Some(image) => Reply::text_with_image(replies::RANDOM_CAPTION, image.path()),
            None => Reply::plain(replies::RANDOM_EMPTY),
        })
    }

    /// Called once when the host unloads the add-on.
    pub fn terminate(&self) {
        info!("Sticker plugin unloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Segment, Sender};
    use crate::domain::ports::mocks::{MockCollection, MockImageFetcher};
    use crate::infrastructure::image::CollectionStore;
    use tempfile::TempDir;

    fn options() -> PluginOptions {
        PluginOptions {
            trigger_phrase: "哈个气".to_string(),
            recent_count: 5,
        }
    }

    async fn plugin_with(fetcher: MockImageFetcher) -> (StickerPlugin, Arc<CollectionStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(
            CollectionStore::new(temp_dir.path().join("maodie_images"))
                .await
                .unwrap(),
        );
        let plugin = StickerPlugin::new(store.clone(), Arc::new(fetcher), options());
        (plugin, store, temp_dir)
    }

    fn message(text: &str) -> InboundEvent {
        InboundEvent::new(text, Sender::new("10001", "alice"))
    }

    fn reply_with_two_images(text: &str) -> InboundEvent {
        message(text).with_segment(Segment::reply(vec![
            Segment::image("https://img.example.com/a.png"),
            Segment::image("https://img.example.com/b.gif?x=1"),
        ]))
    }

    #[tokio::test]
    async fn test_trigger_on_empty_collection() {
        let (plugin, _store, _temp) = plugin_with(MockImageFetcher::new()).await;

        let reply = plugin.handle(&message("今天哈个气啊")).await.unwrap();

        assert!(reply.image().is_none());
        assert!(reply.text().contains("暂无表情包可用"));
    }

    #[tokio::test]
    async fn test_trigger_on_non_empty_collection() {
        let (plugin, store, _temp) = plugin_with(MockImageFetcher::new()).await;
        let stored = store.store(b"img", None).await.unwrap();

        let reply = plugin.handle(&message("今天哈个气啊")).await.unwrap();

        assert_eq!(reply.text(), "耄耋来咯～");
        assert_eq!(reply.image().map(|p| p.as_path()), Some(stored.path()));
    }

    #[tokio::test]
    async fn test_unrelated_message_is_ignored() {
        let (plugin, _store, _temp) = plugin_with(MockImageFetcher::new()).await;
        assert!(plugin.handle(&message("早上好")).await.is_none());
    }

    #[tokio::test]
    async fn test_add_from_reply_with_two_images() {
        let fetcher = MockImageFetcher::new()
            .with_body("https://img.example.com/a.png", b"aaaa")
            .with_body("https://img.example.com/b.gif?x=1", b"bb");
        let (plugin, store, _temp) = plugin_with(fetcher).await;

        let reply = plugin
            .handle(&reply_with_two_images("添加表情包"))
            .await
            .unwrap();

        assert_eq!(reply.text(), "共添加了 2 张图片");
        let mut extensions: Vec<_> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|image| image.extension().as_str())
            .collect();
        extensions.sort_unstable();
        assert_eq!(extensions, vec!["gif", "png"]);
    }

    #[tokio::test]
    async fn test_add_when_every_download_fails() {
        let (plugin, store, _temp) = plugin_with(MockImageFetcher::new()).await;

        let reply = plugin
            .handle(&reply_with_two_images("添加表情包"))
            .await
            .unwrap();

        assert_eq!(reply.text(), "表情包添加失败，请重试");
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_partial_success() {
        let fetcher = MockImageFetcher::new().with_body("https://img.example.com/a.png", b"aaaa");
        let (plugin, _store, _temp) = plugin_with(fetcher).await;

        let reply = plugin
            .handle(&reply_with_two_images("/add-sticker"))
            .await
            .unwrap();

        assert_eq!(reply.text(), "共添加了 1 张图片（1 张失败）");
    }

    #[tokio::test]
    async fn test_add_from_own_attachment() {
        let fetcher = MockImageFetcher::new().with_body("https://img.example.com/own.jpg", b"j");
        let (plugin, _store, _temp) = plugin_with(fetcher).await;
        let event = message("添加表情包").with_segment(Segment::image("https://img.example.com/own.jpg"));

        let reply = plugin.handle(&event).await.unwrap();

        assert_eq!(reply.text(), "共添加了 1 张图片");
    }

    #[tokio::test]
    async fn test_add_without_image() {
        let (plugin, _store, _temp) = plugin_with(MockImageFetcher::new()).await;

        let reply = plugin.handle(&message("添加表情包")).await.unwrap();

        assert_eq!(reply.text(), replies::ADD_NO_IMAGE);
    }

    #[tokio::test]
    async fn test_list_empty_and_non_empty() {
        let (plugin, store, _temp) = plugin_with(MockImageFetcher::new()).await;

        let reply = plugin.handle(&message("表情包列表")).await.unwrap();
        assert_eq!(reply.text(), replies::LIST_EMPTY);

        store.store(&[0u8; 1024], None).await.unwrap();
        store.store(&[0u8; 1024], None).await.unwrap();

        let reply = plugin.handle(&message("表情包列表")).await.unwrap();
        let text = reply.text();
        assert!(text.contains("总数: 2 张"));
        assert!(text.contains("(1.0 KB)"));
    }

    #[tokio::test]
    async fn test_clear_requires_admin() {
        let (plugin, store, _temp) = plugin_with(MockImageFetcher::new()).await;
        store.store(b"x", None).await.unwrap();

        let reply = plugin.handle(&message("清理表情包")).await.unwrap();

        assert_eq!(reply.text(), replies::ADMIN_ONLY);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_as_admin() {
        let (plugin, store, _temp) = plugin_with(MockImageFetcher::new()).await;
        let admin = Sender::new("1", "root").admin();

        let reply = plugin
            .handle(&InboundEvent::new("清理表情包", admin.clone()))
            .await
            .unwrap();
        assert_eq!(reply.text(), replies::CLEAR_EMPTY);

        store.store(b"x", None).await.unwrap();
        store.store(b"y", None).await.unwrap();

        let reply = plugin
            .handle(&InboundEvent::new("清理表情包", admin))
            .await
            .unwrap();
        assert_eq!(reply.text(), "已清理 2 个表情包文件");
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_random_sticker() {
        let (plugin, store, _temp) = plugin_with(MockImageFetcher::new()).await;

        let reply = plugin.handle(&message("随机表情包")).await.unwrap();
        assert_eq!(reply.text(), replies::RANDOM_EMPTY);

        store.store(b"x", None).await.unwrap();

        let reply = plugin.handle(&message("随机表情包")).await.unwrap();
        assert_eq!(reply.text(), replies::RANDOM_CAPTION);
        assert!(reply.image().is_some());
    }

    #[tokio::test]
    async fn test_directory_failure_degrades_to_message() {
        let plugin = StickerPlugin::new(
            Arc::new(MockCollection::unavailable()),
            Arc::new(MockImageFetcher::new()),
            options(),
        );

        let reply = plugin.handle(&message("表情包列表")).await.unwrap();
        assert_eq!(reply.text(), replies::LIST_ERROR);

        let reply = plugin.handle(&message("随机表情包")).await.unwrap();
        assert_eq!(reply.text(), replies::RANDOM_ERROR);

        let reply = plugin.handle(&message("今天哈个气啊")).await.unwrap();
        assert_eq!(reply.text(), replies::TRIGGER_ERROR);
        assert!(reply.image().is_none());
    }
}
