//! Multi-sprite run orchestration
//!
//! A run snapshots every sprite's script into a cursor and spawns one tokio
//! task per sprite. Streams only yield at pause points, so the swap step
//! (cursor lock, then a read of the stage) never sees a half-applied effect.
//! There is no cancellation: dropping a [`Run`] detaches its streams, which
//! keep going until their cursors are exhausted.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::SandboxConfig;
use crate::core::block::BlockInstance;
use crate::core::sprite::SpriteId;

use super::coordinator::CollisionCoordinator;
use super::cursor::ExecutionCursor;
use super::engine::Interpreter;
use super::pacer::Pacer;
use super::stage::Stage;

/// Per-stream outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamReport {
    pub sprite_id: SpriteId,
    /// Top-level blocks this stream executed
    pub executed: usize,
}

/// Final result of a run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One entry per stream, in sprite creation order
    pub streams: Vec<StreamReport>,
    /// Run-time swaps performed
    pub swaps: usize,
    /// Time from start until the last stream finished
    pub duration: Duration,
}

impl RunReport {
    pub fn executed_by(&self, sprite_id: SpriteId) -> Option<usize> {
        self.streams
            .iter()
            .find(|s| s.sprite_id == sprite_id)
            .map(|s| s.executed)
    }

    pub fn total_executed(&self) -> usize {
        self.streams.iter().map(|s| s.executed).sum()
    }
}

/// Everything a stream needs, shared between the streams of one run
struct RunContext {
    stage: Stage,
    cursors: Mutex<Vec<ExecutionCursor>>,
    coordinator: Option<CollisionCoordinator>,
    pacer: Arc<dyn Pacer>,
    config: SandboxConfig,
    swaps: AtomicUsize,
}

/// Handle to an in-flight run
pub struct Run {
    context: Arc<RunContext>,
    tasks: Vec<JoinHandle<StreamReport>>,
    started: Instant,
}

impl Run {
    /// Spawn one stream per script
    ///
    /// `scripts` must be in sprite creation order; that order decides which
    /// partner wins when several sprites overlap. A coordinator is installed
    /// only in hero mode. Must be called from within a tokio runtime.
    pub fn start(
        stage: Stage,
        scripts: Vec<(SpriteId, Vec<BlockInstance>)>,
        hero_mode: bool,
        pacer: Arc<dyn Pacer>,
        config: SandboxConfig,
    ) -> Self {
        let cursors: Vec<ExecutionCursor> = scripts
            .into_iter()
            .map(|(id, blocks)| ExecutionCursor::new(id, blocks))
            .collect();
        let stream_count = cursors.len();

        let context = Arc::new(RunContext {
            stage,
            cursors: Mutex::new(cursors),
            coordinator: hero_mode.then(|| CollisionCoordinator::new(config.collision_radius)),
            pacer,
            config,
            swaps: AtomicUsize::new(0),
        });

        log::info!("Starting run with {} streams (hero mode: {})", stream_count, hero_mode);

        let started = Instant::now();
        let tasks = (0..stream_count)
            .map(|index| tokio::spawn(drive_stream(context.clone(), index)))
            .collect();

        Self {
            context,
            tasks,
            started,
        }
    }

    /// Number of streams in this run
    pub fn stream_count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether every stream has finished
    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(JoinHandle::is_finished)
    }

    /// Run-time swaps performed so far
    pub fn swaps(&self) -> usize {
        self.context.swaps.load(Ordering::SeqCst)
    }

    /// Blocks each stream still has to execute, in stream order
    pub fn remaining(&self) -> Vec<(SpriteId, Vec<BlockInstance>)> {
        self.context
            .cursors
            .lock()
            .iter()
            .map(|c| (c.sprite_id, c.remaining().to_vec()))
            .collect()
    }

    /// Wait for every stream to exhaust its cursor
    pub async fn join(self) -> RunReport {
        let mut streams = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            match task.await {
                Ok(report) => streams.push(report),
                Err(e) => log::error!("Stream task failed: {}", e),
            }
        }

        let report = RunReport {
            streams,
            swaps: self.context.swaps.load(Ordering::SeqCst),
            duration: self.started.elapsed(),
        };
        log::info!(
            "Run finished: {} blocks, {} swaps in {:?}",
            report.total_executed(),
            report.swaps,
            report.duration
        );
        report
    }
}

async fn drive_stream(context: Arc<RunContext>, index: usize) -> StreamReport {
    let sprite_id = context.cursors.lock()[index].sprite_id;
    let interpreter = Interpreter::new(
        context.stage.clone(),
        sprite_id,
        context.pacer.clone(),
        &context.config,
    );
    let mut executed = 0;

    loop {
        let block = match context.cursors.lock()[index].begin() {
            Some(block) => block,
            None => break,
        };

        interpreter.execute(&block).await;
        executed += 1;
        finish_step(&context, index);
    }

    StreamReport { sprite_id, executed }
}

/// Advance the cursor and, in hero mode, run the check-and-swap step
///
/// Holds the cursor lock for the whole step so two streams finishing a block
/// in the same tick cannot both claim the same partner.
fn finish_step(context: &RunContext, index: usize) {
    let mut cursors = context.cursors.lock();
    cursors[index].advance();

    let Some(coordinator) = &context.coordinator else {
        return;
    };
    let sprites = context.stage.read();
    if let Some(partner) = coordinator.swap_remaining(&mut cursors, index, &sprites) {
        context.swaps.fetch_add(1, Ordering::SeqCst);
        let name_of = |id: SpriteId| {
            sprites
                .iter()
                .find(|s| s.id == id)
                .map_or_else(|| id.to_string(), |s| s.name.clone())
        };
        log::info!(
            "Sprites {} and {} swapped remaining functions",
            name_of(cursors[index].sprite_id),
            name_of(cursors[partner].sprite_id)
        );
    }
}
