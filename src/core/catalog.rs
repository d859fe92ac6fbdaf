//! Block Catalog - static definitions of every block kind the palette offers
//!
//! The catalog supports:
//! - Lookup of a definition by kind
//! - Listing definitions in palette order, optionally by category
//! - Instantiating a block with its default parameter values
//! - Normalizing externally supplied instances to their schema

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::block::{BlockInstance, BlockKind};
use super::parameter::ParameterSpec;

/// Palette categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockCategory {
    /// Position and heading
    Motion,
    /// Speech and thought bubbles
    Looks,
    /// Loops
    Control,
}

impl BlockCategory {
    /// Palette color used by hosts for blocks of this category
    pub fn color(&self) -> &'static str {
        match self {
            BlockCategory::Motion | BlockCategory::Control => "bg-blue-500",
            BlockCategory::Looks => "bg-yellow-500",
        }
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockCategory::Motion => write!(f, "Motion"),
            BlockCategory::Looks => write!(f, "Looks"),
            BlockCategory::Control => write!(f, "Control"),
        }
    }
}

/// Definition of one block kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub kind: BlockKind,
    /// Text shown on the palette block
    pub label: String,
    pub category: BlockCategory,
    /// Parameter schema, in positional order
    pub params: Vec<ParameterSpec>,
}

impl BlockDefinition {
    fn new(
        kind: BlockKind,
        label: &str,
        category: BlockCategory,
        params: Vec<ParameterSpec>,
    ) -> Self {
        Self {
            kind,
            label: label.to_string(),
            category,
            params,
        }
    }

    /// Fresh instance carrying every default value
    pub fn instantiate(&self) -> BlockInstance {
        BlockInstance::new(
            self.kind.clone(),
            self.params.iter().map(|spec| spec.default_value.clone()).collect(),
        )
    }
}

/// Catalog of block definitions
///
/// Definitions are immutable once built, so the catalog is cheap to clone and
/// share between a session and its hosts.
#[derive(Debug, Clone)]
pub struct BlockCatalog {
    definitions: Arc<Vec<BlockDefinition>>,
    index: Arc<HashMap<BlockKind, usize>>,
}

impl BlockCatalog {
    /// Build a catalog from definitions, keeping the first of any duplicate kind
    pub fn new(definitions: Vec<BlockDefinition>) -> Self {
        let mut index = HashMap::new();
        let mut kept = Vec::with_capacity(definitions.len());
        for definition in definitions {
            if index.contains_key(&definition.kind) {
                log::warn!("Duplicate block definition for '{}' ignored", definition.kind);
                continue;
            }
            index.insert(definition.kind.clone(), kept.len());
            kept.push(definition);
        }

        Self {
            definitions: Arc::new(kept),
            index: Arc::new(index),
        }
    }

    /// The standard "Motion & Looks" palette
    pub fn standard() -> Self {
        use BlockCategory::*;

        Self::new(vec![
            BlockDefinition::new(
                BlockKind::Move,
                "Move",
                Motion,
                vec![ParameterSpec::number("steps", 10)],
            ),
            BlockDefinition::new(
                BlockKind::TurnLeft,
                "Turn",
                Motion,
                vec![ParameterSpec::number("degrees", 15).with_placeholder("deg")],
            ),
            BlockDefinition::new(
                BlockKind::Turn,
                "Turn Right",
                Motion,
                vec![ParameterSpec::number("degrees", 15).with_placeholder("deg")],
            ),
            BlockDefinition::new(
                BlockKind::GoTo,
                "Go To",
                Motion,
                vec![ParameterSpec::number("x", 0), ParameterSpec::number("y", 0)],
            ),
            BlockDefinition::new(
                BlockKind::Repeat,
                "Repeat",
                Control,
                vec![ParameterSpec::number("times", 10)],
            ),
            BlockDefinition::new(
                BlockKind::Say,
                "Say",
                Looks,
                vec![
                    ParameterSpec::text("text", "Hello!").with_placeholder("message"),
                    ParameterSpec::number("sec", 2),
                ],
            ),
            BlockDefinition::new(
                BlockKind::Think,
                "Think",
                Looks,
                vec![
                    ParameterSpec::text("text", "Hmm...").with_placeholder("thought"),
                    ParameterSpec::number("sec", 2),
                ],
            ),
        ])
    }

    /// Definition for a kind
    pub fn get(&self, kind: &BlockKind) -> Option<&BlockDefinition> {
        self.index.get(kind).map(|&i| &self.definitions[i])
    }

    /// All definitions in palette order
    pub fn definitions(&self) -> &[BlockDefinition] {
        &self.definitions
    }

    /// Definitions in one category, palette order
    pub fn by_category(&self, category: BlockCategory) -> Vec<&BlockDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Instantiate a block with its defaults; `None` for kinds not in the catalog
    pub fn instantiate(&self, kind: &BlockKind) -> Option<BlockInstance> {
        self.get(kind).map(BlockDefinition::instantiate)
    }

    /// Bring an instance (and its children) in line with its definition
    ///
    /// Missing values are filled from the schema defaults and extra values are
    /// dropped. Known kinds that do not nest lose any children. Instances of
    /// unknown kinds are left as they are.
    pub fn normalize(&self, block: &mut BlockInstance) {
        if let Some(definition) = self.get(&block.kind) {
            let specs = &definition.params;
            block.params.truncate(specs.len());
            for spec in &specs[block.params.len()..] {
                block.params.push(spec.default_value.clone());
            }
            if !block.kind.is_composite() {
                block.children.clear();
            }
        }
        for child in &mut block.children {
            self.normalize(child);
        }
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parameter::ParameterValue;

    #[test]
    fn test_standard_palette_order() {
        let catalog = BlockCatalog::standard();
        let kinds: Vec<&str> = catalog.definitions().iter().map(|d| d.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec!["move", "turnLeft", "turn", "goTo", "repeat", "say", "think"]
        );
    }

    #[test]
    fn test_instantiate_uses_defaults() {
        let catalog = BlockCatalog::standard();
        let say = catalog.instantiate(&BlockKind::Say).unwrap();
        assert_eq!(
            say.params,
            vec![ParameterValue::from("Hello!"), ParameterValue::Integer(2)]
        );
        assert!(catalog.instantiate(&BlockKind::Unknown("fly".into())).is_none());
    }

    #[test]
    fn test_by_category() {
        let catalog = BlockCatalog::standard();
        assert_eq!(catalog.by_category(BlockCategory::Looks).len(), 2);
        assert_eq!(catalog.by_category(BlockCategory::Control).len(), 1);
        assert_eq!(BlockCategory::Looks.color(), "bg-yellow-500");
    }

    #[test]
    fn test_duplicate_definitions_keep_first() {
        let catalog = BlockCatalog::new(vec![
            BlockDefinition::new(BlockKind::Move, "Move", BlockCategory::Motion, vec![]),
            BlockDefinition::new(BlockKind::Move, "Walk", BlockCategory::Motion, vec![]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&BlockKind::Move).unwrap().label, "Move");
    }

    #[test]
    fn test_normalize_pads_and_truncates() {
        let catalog = BlockCatalog::standard();

        let mut go_to = BlockInstance::new(BlockKind::GoTo, vec![ParameterValue::Integer(5)]);
        catalog.normalize(&mut go_to);
        assert_eq!(go_to.params, vec![ParameterValue::Integer(5), ParameterValue::Integer(0)]);

        let params = vec![
            ParameterValue::Integer(1),
            ParameterValue::Integer(2),
            ParameterValue::Integer(3),
        ];
        let mut repeat = BlockInstance::new(BlockKind::Repeat, params)
            .with_children(vec![BlockInstance::new(BlockKind::Think, vec![])]);
        catalog.normalize(&mut repeat);
        assert_eq!(repeat.params.len(), 1);
        assert_eq!(repeat.children[0].params.len(), 2);
    }

    #[test]
    fn test_normalize_drops_children_of_atomic_blocks() {
        let catalog = BlockCatalog::standard();

        let mut say = BlockInstance::say("hi", 1).with_children(vec![BlockInstance::move_by(1)]);
        catalog.normalize(&mut say);
        assert!(say.children.is_empty());

        let mut unknown = BlockInstance::new(BlockKind::from("loop"), vec![])
            .with_children(vec![BlockInstance::move_by(1)]);
        catalog.normalize(&mut unknown);
        assert_eq!(unknown.children.len(), 1);
    }
}
