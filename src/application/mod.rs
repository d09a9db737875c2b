//! Application layer with use cases and message services.

/// Message content services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use services::LocatorExtractor;
pub use use_cases::{AcquireImagesUseCase, AcquireOutcome};
