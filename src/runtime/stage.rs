//! Shared sprite state
//!
//! The stage holds every sprite in creation order. A session and all streams
//! of a run share one stage; each mutation takes the write lock once and no
//! lock is ever held across a suspension point.

use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

use crate::core::sprite::{Position, Sprite, SpriteId};

/// Thread-safe handle to the sprites of a session
#[derive(Debug, Clone, Default)]
pub struct Stage {
    sprites: Arc<RwLock<Vec<Sprite>>>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sprite (creation order is preserved)
    pub fn push(&self, sprite: Sprite) {
        self.sprites.write().push(sprite);
    }

    /// Remove a sprite by id
    pub fn remove(&self, id: SpriteId) -> Option<Sprite> {
        let mut sprites = self.sprites.write();
        let index = sprites.iter().position(|s| s.id == id)?;
        Some(sprites.remove(index))
    }

    /// Apply `f` to one sprite; `None` if the sprite no longer exists
    pub fn update<R>(&self, id: SpriteId, f: impl FnOnce(&mut Sprite) -> R) -> Option<R> {
        let mut sprites = self.sprites.write();
        sprites.iter_mut().find(|s| s.id == id).map(f)
    }

    /// Copy of one sprite
    pub fn get(&self, id: SpriteId) -> Option<Sprite> {
        self.sprites.read().iter().find(|s| s.id == id).cloned()
    }

    pub fn position(&self, id: SpriteId) -> Option<Position> {
        self.sprites.read().iter().find(|s| s.id == id).map(|s| s.position)
    }

    /// Copy of every sprite, in creation order
    pub fn snapshot(&self) -> Vec<Sprite> {
        self.sprites.read().clone()
    }

    /// Ids in creation order
    pub fn ids(&self) -> Vec<SpriteId> {
        self.sprites.read().iter().map(|s| s.id).collect()
    }

    pub fn len(&self) -> usize {
        self.sprites.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.read().is_empty()
    }

    /// Shared read access, for callers that inspect several sprites at once
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<Sprite>> {
        self.sprites.read()
    }
}
