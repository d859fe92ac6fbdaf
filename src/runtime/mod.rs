//! Block runtime
//!
//! This module provides the interpreter that executes a sprite's blocks, the
//! shared stage it mutates, and the orchestration of concurrent per-sprite
//! streams with the hero-mode swap coordinator.

pub mod coordinator;
pub mod cursor;
pub mod engine;
pub mod pacer;
pub mod run;
pub mod stage;

pub use coordinator::CollisionCoordinator;
pub use cursor::ExecutionCursor;
pub use engine::Interpreter;
pub use pacer::{Pacer, TokioPacer};
pub use run::{Run, RunReport, StreamReport};
pub use stage::Stage;
