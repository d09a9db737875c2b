mod collection_port;
mod image_fetch_port;

pub use collection_port::CollectionPort;
pub use image_fetch_port::ImageFetchPort;
