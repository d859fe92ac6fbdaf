//! Sandbox configuration
//!
//! Timing and geometry constants for a session. Every field has a default, so
//! a partial JSON document (or none at all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level sandbox configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Pause after every `move` block, in milliseconds.
    pub move_pause_ms: u64,
    /// Sprites closer than this (Euclidean) collide in hero mode.
    pub collision_radius: f64,
    /// Coordinate of the first sprite on both axes.
    pub spawn_origin: i64,
    /// Offset added per existing sprite when spawning, on both axes.
    pub spawn_spacing: i64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            move_pause_ms: 500,
            collision_radius: 20.0,
            spawn_origin: 50,
            spawn_spacing: 50,
        }
    }
}

impl SandboxConfig {
    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn move_pause(&self) -> Duration {
        Duration::from_millis(self.move_pause_ms)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid configuration JSON
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
