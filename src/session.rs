//! Session - the owned aggregate a host drives
//!
//! A session holds the sprites (on a shared [`Stage`]), one stored script per
//! sprite, the active-sprite selection and the hero-mode flag. Every boundary
//! operation the host needs goes through here:
//! - sprite lifecycle: add, move, remove, select
//! - script editing: replace wholesale, or drop/remove/edit blocks on the
//!   active sprite
//! - running: play all scripts concurrently, reset all scripts
//! - hero mode: drag-release swaps
//!
//! Edits that need a selection are silent no-ops without one.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::SandboxConfig;
use crate::core::block::{BlockInstance, BlockKind};
use crate::core::catalog::BlockCatalog;
use crate::core::parameter::ParameterValue;
use crate::core::sprite::{ParseSpriteKindError, Position, Sprite, SpriteId, SpriteKind};
use crate::core::Script;
use crate::runtime::coordinator::CollisionCoordinator;
use crate::runtime::pacer::{Pacer, TokioPacer};
use crate::runtime::run::{Run, RunReport};
use crate::runtime::stage::Stage;

/// Session errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The name matches no sprite kind
    #[error(transparent)]
    UnknownKind(#[from] ParseSpriteKindError),

    /// A sprite of this kind is already on stage
    #[error("Sprite kind already in use: {0}")]
    KindInUse(SpriteKind),
}

/// In-memory sandbox session
pub struct Session {
    config: SandboxConfig,
    catalog: BlockCatalog,
    stage: Stage,
    scripts: HashMap<SpriteId, Script>,
    active: Option<SpriteId>,
    hero_mode: bool,
    pacer: Arc<dyn Pacer>,
}

impl Session {
    /// Create an empty session with the default configuration
    pub fn new() -> Self {
        Self::with_config(SandboxConfig::default())
    }

    pub fn with_config(config: SandboxConfig) -> Self {
        Self {
            config,
            catalog: BlockCatalog::standard(),
            stage: Stage::new(),
            scripts: HashMap::new(),
            active: None,
            hero_mode: false,
            pacer: Arc::new(TokioPacer),
        }
    }

    /// Replace the source of timed suspensions used by runs
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    // ── Sprites ─────────────────────────────────────────────────────────

    /// Add a sprite of `kind`; it becomes the active sprite
    ///
    /// The n-th sprite (0-based, counting those currently on stage) spawns at
    /// `spawn_origin + n * spawn_spacing` on both axes.
    pub fn add_sprite(&mut self, kind: SpriteKind) -> Result<SpriteId, SessionError> {
        let sprites = self.stage.snapshot();
        if sprites.iter().any(|s| s.kind == kind) {
            return Err(SessionError::KindInUse(kind));
        }

        let offset = self.config.spawn_origin + self.config.spawn_spacing * sprites.len() as i64;
        let sprite = Sprite::new(kind, Position::new(offset, offset));
        let id = sprite.id;
        self.stage.push(sprite);
        self.active = Some(id);

        log::debug!("Added sprite {} {} ({}) at {},{}", kind.emoji(), kind, id, offset, offset);
        Ok(id)
    }

    /// Make sure the stage is never empty: adds a cat when there is no sprite
    ///
    /// Returns the id of the sprite it added, if any.
    pub fn ensure_sprite(&mut self) -> Option<SpriteId> {
        if !self.stage.is_empty() {
            return None;
        }
        self.add_sprite(SpriteKind::Cat).ok()
    }

    /// Add a sprite by kind name, e.g. `"robot"`
    pub fn add_sprite_named(&mut self, name: &str) -> Result<SpriteId, SessionError> {
        self.add_sprite(name.parse()?)
    }

    /// Kinds not currently on stage, in menu order
    pub fn available_kinds(&self) -> Vec<SpriteKind> {
        let sprites = self.stage.snapshot();
        SpriteKind::ALL
            .into_iter()
            .filter(|kind| !sprites.iter().any(|s| s.kind == *kind))
            .collect()
    }

    /// Overwrite a sprite's position; `false` if there is no such sprite
    pub fn update_sprite_position(&self, id: SpriteId, x: i64, y: i64) -> bool {
        self.stage
            .update(id, |s| s.position = Position::new(x, y))
            .is_some()
    }

    /// Delete a sprite together with its script
    pub fn remove_sprite(&mut self, id: SpriteId) -> Option<Sprite> {
        let removed = self.stage.remove(id)?;
        self.scripts.remove(&id);
        if self.active == Some(id) {
            self.active = None;
        }
        Some(removed)
    }

    /// Make `id` the sprite that script edits apply to
    pub fn select_sprite(&mut self, id: SpriteId) -> bool {
        if self.stage.position(id).is_none() {
            return false;
        }
        self.active = Some(id);
        true
    }

    pub fn active_sprite(&self) -> Option<SpriteId> {
        self.active
    }

    /// Copy of every sprite, in creation order
    pub fn sprites(&self) -> Vec<Sprite> {
        self.stage.snapshot()
    }

    pub fn sprite(&self, id: SpriteId) -> Option<Sprite> {
        self.stage.get(id)
    }

    /// Handle to the shared sprite state, for hosts that render during a run
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    // ── Scripts ─────────────────────────────────────────────────────────

    /// Stored script of a sprite (empty when none was set)
    pub fn script(&self, id: SpriteId) -> &[BlockInstance] {
        self.scripts.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace a sprite's script wholesale; `false` if there is no such sprite
    ///
    /// Parameter lists are normalized against the catalog.
    pub fn update_sprite_blocks(&mut self, id: SpriteId, mut blocks: Script) -> bool {
        if self.stage.position(id).is_none() {
            return false;
        }
        for block in &mut blocks {
            self.catalog.normalize(block);
        }
        self.scripts.insert(id, blocks);
        true
    }

    /// Append a fresh block of `kind` to the active sprite's script
    ///
    /// Returns the new block's index, or `None` without a selection or for a
    /// kind the catalog does not offer.
    pub fn drop_block(&mut self, kind: impl Into<BlockKind>) -> Option<usize> {
        let id = self.active?;
        let block = self.catalog.instantiate(&kind.into())?;
        let script = self.scripts.entry(id).or_default();
        script.push(block);
        Some(script.len() - 1)
    }

    /// Remove the block at `index` from the active sprite's script
    pub fn remove_block(&mut self, index: usize) -> Option<BlockInstance> {
        let script = self.scripts.get_mut(&self.active?)?;
        (index < script.len()).then(|| script.remove(index))
    }

    /// Edit one parameter of a block in the active sprite's script
    pub fn set_parameter(
        &mut self,
        block_index: usize,
        param_index: usize,
        value: impl Into<ParameterValue>,
    ) -> bool {
        let Some(id) = self.active else {
            return false;
        };
        let slot = self
            .scripts
            .get_mut(&id)
            .and_then(|script| script.get_mut(block_index))
            .and_then(|block| block.params.get_mut(param_index));

        match slot {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Forget every stored script; sprite state is untouched
    ///
    /// A run that is already in flight keeps executing the scripts it
    /// snapshotted when it started.
    pub fn reset_all(&mut self) {
        self.scripts.clear();
    }

    // ── Hero mode ───────────────────────────────────────────────────────

    pub fn set_hero_mode(&mut self, enabled: bool) {
        self.hero_mode = enabled;
    }

    pub fn hero_mode(&self) -> bool {
        self.hero_mode
    }

    /// Finish dragging `id`: in hero mode, swap whole scripts with the first
    /// sprite closer than the collision radius
    ///
    /// Returns the sprite it swapped with. Outside hero mode no distances are
    /// computed at all.
    pub fn release_drag(&mut self, id: SpriteId) -> Option<SpriteId> {
        if !self.hero_mode {
            return None;
        }

        let coordinator = CollisionCoordinator::new(self.config.collision_radius);
        let partner = coordinator.find_partner(&self.stage.snapshot(), id)?;

        let moved = self.scripts.remove(&id).unwrap_or_default();
        let other = self.scripts.remove(&partner).unwrap_or_default();
        self.scripts.insert(id, other);
        self.scripts.insert(partner, moved);

        log::info!(
            "Swapped blocks between {} and {}",
            self.sprite_name(id),
            self.sprite_name(partner)
        );
        Some(partner)
    }

    // ── Running ─────────────────────────────────────────────────────────

    /// Start one stream per sprite over its stored script
    ///
    /// The session stays usable while the returned [`Run`] is in flight.
    /// Must be called from within a tokio runtime.
    pub fn start_run(&self) -> Run {
        let scripts = self
            .stage
            .ids()
            .into_iter()
            .map(|id| (id, self.script(id).to_vec()))
            .collect();

        Run::start(
            self.stage.clone(),
            scripts,
            self.hero_mode,
            self.pacer.clone(),
            self.config.clone(),
        )
    }

    /// Run every sprite's script concurrently and wait for all of them
    pub async fn play_all(&self) -> RunReport {
        self.start_run().join().await
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    fn sprite_name(&self, id: SpriteId) -> String {
        self.stage
            .get(id)
            .map_or_else(|| id.to_string(), |s| s.name)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
