//! Use case implementations.

mod acquire_images_use_case;

pub use acquire_images_use_case::{AcquireImagesUseCase, AcquireOutcome};
