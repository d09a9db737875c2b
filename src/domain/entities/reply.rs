use std::path::PathBuf;

use serde::Serialize;

/// One element of a reply chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyPart {
    /// Text element.
    Text {
        /// Text content.
        text: String,
    },
    /// Image read from a local file.
    Image {
        /// Absolute or collection-relative file path.
        path: PathBuf,
    },
}

/// Outbound reply handed back to the host for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reply {
    /// Text-only reply.
    Plain {
        /// Text content.
        text: String,
    },
    /// Ordered chain of text and image parts.
    Chain {
        /// Parts in display order.
        parts: Vec<ReplyPart>,
    },
}

impl Reply {
    /// Creates a text-only reply.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }

    /// Creates a text followed by an image.
    #[must_use]
    pub fn text_with_image(text: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Chain {
            parts: vec![
                ReplyPart::Text { text: text.into() },
                ReplyPart::Image { path: path.into() },
            ],
        }
    }

    /// Concatenated text of every text part.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Plain { text } => text.clone(),
            Self::Chain { parts } => parts
                .iter()
                .filter_map(|part| match part {
                    ReplyPart::Text { text } => Some(text.as_str()),
                    ReplyPart::Image { .. } => None,
                })
                .collect(),
        }
    }

    /// Returns the image path if the reply carries one.
    #[must_use]
    pub fn image(&self) -> Option<&PathBuf> {
        match self {
            Self::Plain { .. } => None,
            Self::Chain { parts } => parts.iter().find_map(|part| match part {
                ReplyPart::Image { path } => Some(path),
                ReplyPart::Text { .. } => None,
            }),
        }
    }
}
