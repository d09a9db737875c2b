//! Maodie - a sticker collection add-on for chat bots.
//!
//! Replies to a trigger phrase with a random image from a local collection and
//! provides commands to add, list, and clear that collection by downloading
//! images referenced in chat messages.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and message services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing filesystem, HTTP and config adapters.
pub mod infrastructure;
/// Presentation layer containing commands, replies and the host bridge.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "maodie";
