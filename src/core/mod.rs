//! Core sandbox abstractions and types
//!
//! This module defines the block catalog, the block instances a script is made
//! of, their parameters, and the sprites scripts act on.

pub mod block;
pub mod catalog;
pub mod parameter;
pub mod sprite;

pub use block::{BlockInstance, BlockKind, Instruction};
pub use catalog::{BlockCatalog, BlockCategory, BlockDefinition};
pub use parameter::{InputKind, ParameterSpec, ParameterValue};
pub use sprite::{Bubble, Position, Sprite, SpriteId, SpriteKind};

/// An ordered list of blocks owned by one sprite
pub type Script = Vec<BlockInstance>;
