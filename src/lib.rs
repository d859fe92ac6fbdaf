//! Block Sandbox - execution core for a visual block-scripting sandbox
//!
//! This crate provides the block catalog, the block and sprite model, and the
//! runtime that animates sprites by interpreting their scripts concurrently.
//! Rendering and drag-and-drop live in the host, which drives a [`Session`]
//! and reads sprite state back.

pub mod config;
pub mod core;
pub mod runtime;
pub mod session;
mod tests;

// Re-export commonly used types
pub use config::SandboxConfig;
pub use core::{BlockCatalog, BlockInstance, BlockKind, Sprite, SpriteId, SpriteKind};
pub use runtime::{Run, RunReport};
pub use session::{Session, SessionError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
