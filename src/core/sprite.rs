//! Sprite state
//!
//! Sprites are the on-stage actors. The interpreter mutates position,
//! rotation and bubbles; hosts read them back to render.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a sprite, stable for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub Uuid);

impl SpriteId {
    /// Generate a new random sprite ID
    pub fn new() -> Self {
        SpriteId(Uuid::new_v4())
    }
}

impl Default for SpriteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed set of avatars a session can hold, each at most once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteKind {
    Cat,
    Dog,
    Robot,
}

impl SpriteKind {
    /// Every kind, in menu order
    pub const ALL: [SpriteKind; 3] = [SpriteKind::Cat, SpriteKind::Dog, SpriteKind::Robot];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpriteKind::Cat => "cat",
            SpriteKind::Dog => "dog",
            SpriteKind::Robot => "robot",
        }
    }

    /// Emoji the host draws for this avatar
    pub fn emoji(&self) -> &'static str {
        match self {
            SpriteKind::Cat => "🐱",
            SpriteKind::Dog => "🐶",
            SpriteKind::Robot => "🤖",
        }
    }
}

impl fmt::Display for SpriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no sprite kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sprite kind: {0}")]
pub struct ParseSpriteKindError(pub String);

impl FromStr for SpriteKind {
    type Err = ParseSpriteKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpriteKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSpriteKindError(s.to_string()))
    }
}

/// Stage coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }
}

/// Speech or thought bubble
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bubble {
    pub text: String,
    pub visible: bool,
}

impl Bubble {
    /// Show `text`
    pub fn show(&mut self, text: String) {
        self.text = text;
        self.visible = true;
    }

    /// Hide the bubble, keeping its last text
    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// An on-stage actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: SpriteId,
    pub kind: SpriteKind,
    pub name: String,
    pub position: Position,
    /// Heading in degrees, always within [0, 360)
    #[serde(deserialize_with = "deserialize_rotation")]
    rotation: i64,
    pub speech: Bubble,
    pub thought: Bubble,
}

impl Sprite {
    pub fn new(kind: SpriteKind, position: Position) -> Self {
        Self {
            id: SpriteId::new(),
            kind,
            name: kind.as_str().to_string(),
            position,
            rotation: 0,
            speech: Bubble::default(),
            thought: Bubble::default(),
        }
    }

    pub fn rotation(&self) -> i64 {
        self.rotation
    }

    /// Rotate clockwise by `degrees` (negative rotates the other way)
    pub fn rotate_by(&mut self, degrees: i64) {
        self.rotation = normalize_degrees(self.rotation as i128 + degrees as i128);
    }

    /// Rotate counter-clockwise by `degrees`
    pub fn rotate_left(&mut self, degrees: i64) {
        self.rotation = normalize_degrees(self.rotation as i128 - degrees as i128);
    }

    /// Set the heading directly
    pub fn set_rotation(&mut self, degrees: i64) {
        self.rotation = normalize_degrees(degrees as i128);
    }

    /// Shift along +x; heading is ignored
    pub fn move_by(&mut self, distance: i64) {
        self.position.x = self.position.x.saturating_add(distance);
    }

    /// Display line for the coordinates panel, e.g. `Cat: 50,50`
    pub fn coordinates_label(&self) -> String {
        let mut chars = self.name.chars();
        let name: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("{}: {},{}", name, self.position.x, self.position.y)
    }
}

fn normalize_degrees(degrees: i128) -> i64 {
    degrees.rem_euclid(360) as i64
}

fn deserialize_rotation<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let degrees = i64::deserialize(deserializer)?;
    Ok(normalize_degrees(degrees as i128))
}
