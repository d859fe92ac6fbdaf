//! Collision/swap coordinator ("hero mode")
//!
//! Two triggers exchange scripts between sprites that come close together:
//! - releasing a dragged sprite near another swaps their whole stored scripts
//! - during a run, finishing a block near another running sprite swaps the
//!   blocks both streams have not executed yet
//!
//! Candidates are scanned in creation order and only the first match swaps.
//! A stream swapped earlier in the same step is passed over until it
//! completes a block of its own.

use crate::core::sprite::{Position, Sprite, SpriteId};

use super::cursor::ExecutionCursor;

#[derive(Debug, Clone, Copy)]
pub struct CollisionCoordinator {
    radius: f64,
}

impl CollisionCoordinator {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Strictly closer than the collision radius
    pub fn overlapping(&self, a: &Position, b: &Position) -> bool {
        a.distance_to(b) < self.radius
    }

    /// First sprite (creation order) overlapping `moved`
    pub fn find_partner(&self, sprites: &[Sprite], moved: SpriteId) -> Option<SpriteId> {
        let origin = sprites.iter().find(|s| s.id == moved)?.position;
        sprites
            .iter()
            .find(|s| s.id != moved && self.overlapping(&origin, &s.position))
            .map(|s| s.id)
    }

    /// Run-time swap after the stream at `current` finished a block
    ///
    /// Scans the other cursors in order for a stream that is still running,
    /// has not been swapped since its last completed block and whose sprite
    /// overlaps the current one, and exchanges the remaining blocks of the
    /// first match. Returns the partner's index. When neither
    /// side has anything left to hand over there is nothing to swap.
    ///
    /// The caller must hold exclusive access to `cursors` for the whole call.
    pub fn swap_remaining(
        &self,
        cursors: &mut [ExecutionCursor],
        current: usize,
        sprites: &[Sprite],
    ) -> Option<usize> {
        let position_of = |id: SpriteId| sprites.iter().find(|s| s.id == id).map(|s| s.position);
        let origin = position_of(cursors.get(current)?.sprite_id)?;

        let partner = cursors.iter().enumerate().position(|(index, cursor)| {
            index != current
                && !cursor.is_exhausted()
                && !cursor.is_swapped()
                && position_of(cursor.sprite_id).is_some_and(|p| self.overlapping(&origin, &p))
        })?;

        let (first, second) = pair_mut(cursors, current, partner);
        if first.remaining().is_empty() && second.remaining().is_empty() {
            return None;
        }
        first.swap_remaining(second);
        Some(partner)
    }
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
