//! Block instances and their typed decoding
//!
//! A [`BlockInstance`] is what a host stores in a sprite's script: a kind, the
//! literal values the user typed, and (for `repeat`) nested children. Before
//! execution each instance is decoded into an [`Instruction`], which is where
//! malformed parameters are replaced by their defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::parameter::{integer_at, text_at, ParameterValue};

/// Seconds a speech or thought bubble stays up when the duration is missing
pub const DEFAULT_MESSAGE_SECONDS: i64 = 2;

/// Closed set of block kinds
///
/// Kinds arrive as strings from the host; anything unrecognized is kept
/// verbatim in [`BlockKind::Unknown`] so it can be logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    Move,
    Say,
    Think,
    TurnLeft,
    Turn,
    GoTo,
    Repeat,
    Unknown(String),
}

impl BlockKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::Move => "move",
            BlockKind::Say => "say",
            BlockKind::Think => "think",
            BlockKind::TurnLeft => "turnLeft",
            BlockKind::Turn => "turn",
            BlockKind::GoTo => "goTo",
            BlockKind::Repeat => "repeat",
            BlockKind::Unknown(name) => name,
        }
    }

    /// Whether the kind nests child blocks
    pub fn is_composite(&self) -> bool {
        matches!(self, BlockKind::Repeat)
    }
}

impl From<&str> for BlockKind {
    fn from(name: &str) -> Self {
        match name {
            "move" => BlockKind::Move,
            "say" => BlockKind::Say,
            "think" => BlockKind::Think,
            "turnLeft" => BlockKind::TurnLeft,
            "turn" => BlockKind::Turn,
            "goTo" => BlockKind::GoTo,
            "repeat" => BlockKind::Repeat,
            other => BlockKind::Unknown(other.to_string()),
        }
    }
}

impl From<String> for BlockKind {
    fn from(name: String) -> Self {
        BlockKind::from(name.as_str())
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block placed into a sprite's script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInstance {
    pub kind: BlockKind,
    /// Positional parameter values, matching the definition's specs
    #[serde(default)]
    pub params: Vec<ParameterValue>,
    /// Nested body of a composite block
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockInstance>,
}

impl BlockInstance {
    /// Create an instance with explicit parameter values
    pub fn new(kind: impl Into<BlockKind>, params: Vec<ParameterValue>) -> Self {
        Self {
            kind: kind.into(),
            params,
            children: Vec::new(),
        }
    }

    /// `move(distance)`
    pub fn move_by(distance: i64) -> Self {
        Self::new(BlockKind::Move, vec![distance.into()])
    }

    /// `say(text, seconds)`
    pub fn say(text: &str, seconds: i64) -> Self {
        Self::new(BlockKind::Say, vec![text.into(), seconds.into()])
    }

    /// `think(text, seconds)`
    pub fn think(text: &str, seconds: i64) -> Self {
        Self::new(BlockKind::Think, vec![text.into(), seconds.into()])
    }

    /// `turnLeft(angle)`
    pub fn turn_left(angle: i64) -> Self {
        Self::new(BlockKind::TurnLeft, vec![angle.into()])
    }

    /// `turn(angle)`
    pub fn turn(angle: i64) -> Self {
        Self::new(BlockKind::Turn, vec![angle.into()])
    }

    /// `goTo(x, y)`
    pub fn go_to(x: i64, y: i64) -> Self {
        Self::new(BlockKind::GoTo, vec![x.into(), y.into()])
    }

    /// `repeat(times) { body }`
    pub fn repeat(times: i64, body: Vec<BlockInstance>) -> Self {
        Self {
            kind: BlockKind::Repeat,
            params: vec![times.into()],
            children: body,
        }
    }

    /// Replace the nested body
    pub fn with_children(mut self, children: Vec<BlockInstance>) -> Self {
        self.children = children;
        self
    }

    /// Number of blocks in this subtree, including itself
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(BlockInstance::subtree_len).sum::<usize>()
    }

    /// Decode into a typed instruction, substituting defaults for bad input
    pub fn decode(&self) -> Instruction<'_> {
        let p = &self.params;
        match &self.kind {
            BlockKind::Move => Instruction::Move {
                distance: integer_at(p, 0, 0),
            },
            BlockKind::Say => Instruction::Say {
                text: text_at(p, 0, ""),
                seconds: integer_at(p, 1, DEFAULT_MESSAGE_SECONDS).max(0),
            },
            BlockKind::Think => Instruction::Think {
                text: text_at(p, 0, ""),
                seconds: integer_at(p, 1, DEFAULT_MESSAGE_SECONDS).max(0),
            },
            BlockKind::TurnLeft => Instruction::TurnLeft {
                angle: integer_at(p, 0, 0),
            },
            BlockKind::Turn => Instruction::Turn {
                angle: integer_at(p, 0, 0),
            },
            BlockKind::GoTo => Instruction::GoTo {
                x: integer_at(p, 0, 0),
                y: integer_at(p, 1, 0),
            },
            BlockKind::Repeat => Instruction::Repeat {
                times: integer_at(p, 0, 0).max(0) as u64,
                body: &self.children,
            },
            BlockKind::Unknown(name) => Instruction::Unknown { kind: name },
        }
    }
}

/// Decoded block, ready for execution
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction<'a> {
    Move { distance: i64 },
    Say { text: String, seconds: i64 },
    Think { text: String, seconds: i64 },
    TurnLeft { angle: i64 },
    Turn { angle: i64 },
    GoTo { x: i64, y: i64 },
    Repeat { times: u64, body: &'a [BlockInstance] },
    Unknown { kind: &'a str },
}
