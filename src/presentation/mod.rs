//! Presentation layer: commands, reply texts and the host bridge.

/// Stdio host bridge.
pub mod bridge;
/// Command definitions and lookup.
pub mod commands;
/// Plugin entry points.
pub mod plugin;
/// Reply texts.
pub mod replies;

pub use bridge::StdioBridge;
pub use commands::{CommandRegistry, StickerCommand};
pub use plugin::{PluginOptions, StickerPlugin};
