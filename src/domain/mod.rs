//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{InboundEvent, Reply, StoredImage};
pub use errors::{FetchError, StoreError};
pub use ports::{CollectionPort, ImageFetchPort};
