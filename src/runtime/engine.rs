//! Execution engine
//!
//! Interprets one sprite's blocks against the shared stage. Blocks run
//! strictly in order; a `repeat` runs its whole body, suspensions included,
//! before starting the next iteration. Nothing here fails: unknown kinds are
//! logged and skipped, malformed parameters were already defaulted during
//! decoding, and effects on a sprite that has left the stage do nothing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SandboxConfig;
use crate::core::block::{BlockInstance, Instruction};
use crate::core::sprite::{Position, SpriteId};

use super::pacer::Pacer;
use super::stage::Stage;

/// Boxed future returned by the recursive entry point
pub type BlockFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Interpreter bound to one sprite
#[derive(Clone)]
pub struct Interpreter {
    stage: Stage,
    sprite_id: SpriteId,
    pacer: Arc<dyn Pacer>,
    move_pause: Duration,
}

impl Interpreter {
    pub fn new(
        stage: Stage,
        sprite_id: SpriteId,
        pacer: Arc<dyn Pacer>,
        config: &SandboxConfig,
    ) -> Self {
        Self {
            stage,
            sprite_id,
            pacer,
            move_pause: config.move_pause(),
        }
    }

    pub fn sprite_id(&self) -> SpriteId {
        self.sprite_id
    }

    /// Execute a block list in order
    pub async fn run_script(&self, blocks: &[BlockInstance]) {
        for block in blocks {
            self.execute(block).await;
        }
    }

    /// Execute one block, nested children included, to completion
    pub fn execute<'a>(&'a self, block: &'a BlockInstance) -> BlockFuture<'a> {
        Box::pin(async move {
            log::debug!("[{}] {}", self.sprite_id, block.kind);
            self.dispatch(block.decode()).await;
        })
    }

    async fn dispatch(&self, instruction: Instruction<'_>) {
        match instruction {
            Instruction::Move { distance } => {
                self.stage.update(self.sprite_id, |s| s.move_by(distance));
                self.pacer.pause(self.move_pause).await;
            }
            Instruction::Say { text, seconds } => {
                self.stage.update(self.sprite_id, |s| s.speech.show(text));
                self.pacer.pause(Duration::from_secs(seconds as u64)).await;
                self.stage.update(self.sprite_id, |s| s.speech.hide());
            }
            Instruction::Think { text, seconds } => {
                self.stage.update(self.sprite_id, |s| s.thought.show(text));
                self.pacer.pause(Duration::from_secs(seconds as u64)).await;
                self.stage.update(self.sprite_id, |s| s.thought.hide());
            }
            Instruction::TurnLeft { angle } => {
                self.stage.update(self.sprite_id, |s| s.rotate_left(angle));
            }
            Instruction::Turn { angle } => {
                self.stage.update(self.sprite_id, |s| s.rotate_by(angle));
            }
            Instruction::GoTo { x, y } => {
                self.stage
                    .update(self.sprite_id, |s| s.position = Position::new(x, y));
            }
            Instruction::Repeat { times, body } => {
                for _ in 0..times {
                    for child in body {
                        self.execute(child).await;
                    }
                }
            }
            Instruction::Unknown { kind } => {
                log::warn!("Unknown block type: {}", kind);
            }
        }
    }
}
