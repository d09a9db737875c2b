//! Domain entity definitions.

mod message;
mod reply;
mod stored_image;

pub use message::{InboundEvent, Segment, Sender};
pub use reply::{Reply, ReplyPart};
pub use stored_image::{CollectionStats, ImageExtension, StoredImage};
