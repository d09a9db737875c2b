use serde::{Deserialize, Deserializer, Serialize};

/// Scalar a host may send where a string is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

/// Reads a string field that hosts may send as a number or `null`.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseScalar>::deserialize(deserializer)? {
        Some(LooseScalar::Text(text)) => text,
        Some(LooseScalar::Unsigned(n)) => n.to_string(),
        Some(LooseScalar::Signed(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Who sent an inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Platform user id. Numeric ids are kept in decimal form.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    /// Display name used in log lines.
    #[serde(default)]
    pub name: String,
    /// Whether the host granted administrator rights.
    #[serde(default)]
    pub is_admin: bool,
}

impl Sender {
    /// Creates a regular (non-admin) sender.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_admin: false,
        }
    }

    /// Marks the sender as administrator.
    #[must_use]
    pub const fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// One typed piece of message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    /// Plain text.
    Plain {
        /// Text content.
        text: String,
    },
    /// Image with a remote URL.
    Image {
        /// Download URL. Empty when the host only sent a local file name.
        #[serde(default, deserialize_with = "lenient_string")]
        url: String,
    },
    /// Reference to another message, carrying that message's content chain.
    Reply {
        /// Segments of the replied-to message.
        #[serde(default)]
        chain: Vec<Segment>,
    },
    /// Anything the add-on does not care about (faces, mentions, files).
    #[serde(other)]
    Other,
}

impl Segment {
    /// Creates a plain text segment.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }

    /// Creates an image segment.
    #[must_use]
    pub fn image(url: impl Into<String>) -> Self {
        Self::Image { url: url.into() }
    }

    /// Creates a reply segment.
    #[must_use]
    pub const fn reply(chain: Vec<Self>) -> Self {
        Self::Reply { chain }
    }

    /// Returns the URL when this is an image segment.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Image { url } if !url.is_empty() => Some(url),
            _ => None,
        }
    }
}

/// Inbound event as delivered by the host, reduced to the fields this add-on reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Raw message text.
    #[serde(default)]
    pub text: String,
    /// Message author.
    #[serde(default)]
    pub sender: Sender,
    /// Ordered content segments.
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl InboundEvent {
    /// Creates an event with text and no segments.
    #[must_use]
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            segments: Vec::new(),
        }
    }

    /// Appends a content segment.
    #[must_use]
    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Iterates over the chains of every reply segment.
    pub fn reply_chains(&self) -> impl Iterator<Item = &[Segment]> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Reply { chain } => Some(chain.as_slice()),
            _ => None,
        })
    }
}
