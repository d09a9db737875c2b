//! Domain error types.

mod fetch_error;
mod store_error;

pub use fetch_error::FetchError;
pub use store_error::StoreError;
