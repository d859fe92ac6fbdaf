//! Execution cursors
//!
//! One cursor per sprite per run: the blocks the stream will execute and the
//! index of the next one. Blocks before `next_index` have completed and are
//! never touched again. While a block is executing it is "in flight": it is
//! neither completed nor part of the remaining blocks a swap may hand away.
//! A cursor that took part in a swap stays marked until it completes its
//! current block, so it is swapped at most once per step.

use crate::core::block::BlockInstance;
use crate::core::sprite::SpriteId;

#[derive(Debug, Clone)]
pub struct ExecutionCursor {
    pub sprite_id: SpriteId,
    pending: Vec<BlockInstance>,
    next_index: usize,
    in_flight: bool,
    swapped: bool,
}

impl ExecutionCursor {
    pub fn new(sprite_id: SpriteId, blocks: Vec<BlockInstance>) -> Self {
        Self {
            sprite_id,
            pending: blocks,
            next_index: 0,
            in_flight: false,
            swapped: false,
        }
    }

    /// Block at the cursor position (in flight or next to run)
    pub fn current(&self) -> Option<&BlockInstance> {
        self.pending.get(self.next_index)
    }

    /// Mark the current block in flight and hand out a copy to execute
    pub fn begin(&mut self) -> Option<BlockInstance> {
        let block = self.pending.get(self.next_index)?.clone();
        self.in_flight = true;
        Some(block)
    }

    /// Mark the current block completed
    pub fn advance(&mut self) {
        self.in_flight = false;
        self.swapped = false;
        if self.next_index < self.pending.len() {
            self.next_index += 1;
        }
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Swapped since this cursor last completed a block
    pub fn is_swapped(&self) -> bool {
        self.swapped
    }

    /// Blocks neither completed nor in flight
    pub fn remaining(&self) -> &[BlockInstance] {
        &self.pending[self.split_point()..]
    }

    /// Blocks already executed
    pub fn completed(&self) -> &[BlockInstance] {
        &self.pending[..self.next_index]
    }

    /// No block in flight and nothing left to run
    pub fn is_exhausted(&self) -> bool {
        self.next_index >= self.pending.len()
    }

    /// Exchange the remaining tails of two cursors and mark both swapped
    pub fn swap_remaining(&mut self, other: &mut ExecutionCursor) {
        let mine = self.pending.split_off(self.split_point());
        let theirs = other.pending.split_off(other.split_point());
        self.pending.extend(theirs);
        other.pending.extend(mine);
        self.swapped = true;
        other.swapped = true;
    }

    fn split_point(&self) -> usize {
        (self.next_index + usize::from(self.in_flight)).min(self.pending.len())
    }
}
