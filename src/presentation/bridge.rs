//! Line-delimited JSON bridge between a host process and the plugin.
//!
//! Each input line is one [`InboundEvent`]. Each input line produces exactly
//! one output line `{"reply": <Reply or null>}`, in input order. Events are
//! handled concurrently, so a slow download does not hold back later replies
//! beyond the ordering constraint.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::FuturesOrdered;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, warn};

use crate::domain::entities::{InboundEvent, Reply};

use super::plugin::StickerPlugin;

const HANDLER_PANICKED: &str = "处理消息时发生错误";

#[derive(Serialize)]
struct Response<'a> {
    reply: Option<&'a Reply>,
}

/// Feeds host events to the plugin and writes its replies back.
pub struct StdioBridge {
    plugin: Arc<StickerPlugin>,
}

impl StdioBridge {
    /// Creates a bridge around a plugin.
    #[must_use]
    pub const fn new(plugin: Arc<StickerPlugin>) -> Self {
        Self { plugin }
    }

    /// Processes events until the reader reaches end of input and every
    /// pending reply has been written.
    ///
    /// # Errors
    /// Returns error if reading input or writing output fails.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut pending = FuturesOrdered::new();
        let mut input_open = true;

        loop {
            tokio::select! {
                line = lines.next_line(), if input_open => match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => pending.push_back(Self::respond(self.plugin.clone(), line)),
                    None => {
                        debug!("Host closed input");
                        input_open = false;
                    }
                },
                Some(reply) = pending.next(), if !pending.is_empty() => {
                    Self::write_reply(&mut writer, reply.as_ref()).await?;
                }
                else => break,
            }
        }

        self.plugin.terminate();
        Ok(())
    }

    async fn write_reply<W>(writer: &mut W, reply: Option<&Reply>) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let encoded = serde_json::to_string(&Response { reply })?;
        writer.write_all(encoded.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await
    }

    async fn respond(plugin: Arc<StickerPlugin>, line: String) -> Option<Reply> {
        match serde_json::from_str::<InboundEvent>(line.trim()) {
            Ok(event) => Self::dispatch(plugin, event).await,
            Err(e) => {
                warn!(error = %e, "Skipping malformed event");
                None
            }
        }
    }

    /// Runs one event on its own task so a panic cannot take the bridge down.
    async fn dispatch(plugin: Arc<StickerPlugin>, event: InboundEvent) -> Option<Reply> {
        match tokio::spawn(async move { plugin.handle(&event).await }).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Event handler panicked");
                Some(Reply::plain(HANDLER_PANICKED))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ImageExtension, StoredImage};
    use crate::domain::errors::StoreError;
    use crate::domain::ports::CollectionPort;
    use crate::domain::ports::mocks::MockImageFetcher;
    use crate::infrastructure::image::CollectionStore;
    use crate::presentation::plugin::PluginOptions;
    use async_trait::async_trait;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::Barrier;

    fn options() -> PluginOptions {
        PluginOptions {
            trigger_phrase: "哈个气".to_string(),
            recent_count: 5,
        }
    }

    async fn bridge_with(fetcher: MockImageFetcher) -> (StdioBridge, Arc<CollectionStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(
            CollectionStore::new(temp_dir.path().to_path_buf())
                .await
                .unwrap(),
        );
        let plugin = StickerPlugin::new(store.clone(), Arc::new(fetcher), options());
        (StdioBridge::new(Arc::new(plugin)), store, temp_dir)
    }

    async fn bridge() -> (StdioBridge, Arc<CollectionStore>, TempDir) {
        bridge_with(MockImageFetcher::new()).await
    }

    struct BrokenCollection;

    #[async_trait]
    impl CollectionPort for BrokenCollection {
        fn root(&self) -> &Path {
            Path::new("/broken")
        }

        async fn list(&self) -> Result<Vec<StoredImage>, StoreError> {
            panic!("listing blew up");
        }

        async fn store(
            &self,
            _bytes: &[u8],
            _extension: Option<ImageExtension>,
        ) -> Result<StoredImage, StoreError> {
            unreachable!()
        }

        async fn clear(&self) -> Result<usize, StoreError> {
            unreachable!()
        }
    }

    async fn run_lines(bridge: &StdioBridge, input: &str) -> Vec<serde_json::Value> {
        let mut output = Vec::new();
        bridge.run(input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_response_per_event() {
        let (bridge, _store, _temp) = bridge().await;
        let input = concat!(
            r#"{"text": "今天哈个气啊", "sender": {"id": "1"}}"#,
            "\n",
            "\n",
            r#"{"text": "hello"}"#,
            "\n",
            "{not json\n",
        );

        let responses = run_lines(&bridge, input).await;

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["reply"]["type"], "plain");
        assert_eq!(responses[0]["reply"]["text"], "耄耋来咯～（暂无表情包可用）");
        assert!(responses[1]["reply"].is_null());
        assert!(responses[2]["reply"].is_null());
    }

    #[tokio::test]
    async fn test_loose_host_shapes_still_trigger() {
        let (bridge, _store, _temp) = bridge().await;
        let input = concat!(
            r#"{"text": "今天哈个气啊", "sender": {"id": 12345}}"#,
            "\n",
            r#"{"text": "今天哈个气啊", "segments": [{"type": "image", "file": "x.jpg"}]}"#,
            "\n",
        );

        let responses = run_lines(&bridge, input).await;

        assert_eq!(responses.len(), 2);
        for response in &responses {
            assert_eq!(response["reply"]["text"], "耄耋来咯～（暂无表情包可用）");
        }
    }

    #[tokio::test]
    async fn test_chain_reply_carries_image_path() {
        let (bridge, store, _temp) = bridge().await;
        let stored = store.store(b"img", None).await.unwrap();

        let responses = run_lines(&bridge, "{\"text\": \"随机表情包\"}\n").await;

        let parts = &responses[0]["reply"]["parts"];
        assert_eq!(responses[0]["reply"]["type"], "chain");
        assert_eq!(parts[0]["text"], "随机表情包来咯～");
        assert_eq!(parts[1]["type"], "image");
        assert_eq!(parts[1]["path"].as_str(), stored.path().to_str());
    }

    #[tokio::test]
    async fn test_panicking_handler_gets_generic_reply() {
        let plugin = StickerPlugin::new(
            Arc::new(BrokenCollection),
            Arc::new(MockImageFetcher::new()),
            options(),
        );
        let bridge = StdioBridge::new(Arc::new(plugin));
        let input = concat!(r#"{"text": "哈个气"}"#, "\n", r#"{"text": "hello"}"#, "\n");

        let responses = run_lines(&bridge, input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["reply"]["text"], HANDLER_PANICKED);
        assert!(responses[1]["reply"].is_null());
    }

    #[tokio::test]
    async fn test_events_run_concurrently_and_reply_in_order() {
        let fetcher = MockImageFetcher::new()
            .with_body("https://img.example.com/a.png", b"aa")
            .with_body("https://img.example.com/b.gif", b"b")
            .with_barrier(Arc::new(Barrier::new(2)));
        let (bridge, store, _temp) = bridge_with(fetcher).await;
        let input = concat!(
            r#"{"text": "添加表情包", "segments": [{"type": "image", "url": "https://img.example.com/a.png"}]}"#,
            "\n",
            r#"{"text": "hello"}"#,
            "\n",
            r#"{"text": "添加表情包", "segments": [{"type": "image", "url": "https://img.example.com/b.gif"}]}"#,
            "\n",
        );

        // Each download waits for the other one, so sequential handling never finishes.
        let responses = tokio::time::timeout(Duration::from_secs(5), run_lines(&bridge, input))
            .await
            .unwrap();

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["reply"]["text"], "共添加了 1 张图片");
        assert!(responses[1]["reply"].is_null());
        assert_eq!(responses[2]["reply"]["text"], "共添加了 1 张图片");
        assert_eq!(store.list().await.unwrap().len(), 2);
    }
}
