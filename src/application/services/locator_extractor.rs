use std::path::Path;

use reqwest::Url;

use crate::domain::entities::{ImageExtension, InboundEvent, Segment};

/// Finds image locators in inbound events.
pub struct LocatorExtractor;

impl LocatorExtractor {
    /// Collects image URLs from the replied-to message, falling back to the
    /// message's own segments only when the reply carries none.
    pub fn extract(event: &InboundEvent) -> Vec<String> {
        let from_reply: Vec<String> = event
            .reply_chains()
            .flat_map(Self::image_urls)
            .collect();

        if !from_reply.is_empty() {
            return from_reply;
        }

        Self::image_urls(&event.segments)
    }

    fn image_urls(segments: &[Segment]) -> Vec<String> {
        segments
            .iter()
            .filter_map(Segment::image_url)
            .map(str::to_owned)
            .collect()
    }

    /// Reads an allow-listed extension from the locator's path, ignoring the query.
    pub fn extension_of(locator: &str) -> Option<ImageExtension> {
        let path = match Url::parse(locator) {
            Ok(url) => url.path().to_owned(),
            Err(_) => locator
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_owned(),
        };
        ImageExtension::from_path(Path::new(&path))
    }
}
