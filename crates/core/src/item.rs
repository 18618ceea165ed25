//! Item system - tools, placeable blocks, food, and the unarmed fallback.
//!
//! Items are created through [`create_item`], a factory over a fixed,
//! closed set of keys. Unregistered keys are [`RegistryError`]s.

use crate::effect::{Effect, Loot, StatKind};
use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attack range for every item, in grid cells.
pub const ATTACK_RANGE_CELLS: f32 = 10.0;

/// Default maximum stack size for stackable items.
pub const DEFAULT_MAX_STACK: u32 = 64;

/// Tool categories used to index block break tables.
///
/// `Hand` doubles as the unarmed fallback: when the active hotbar item
/// cannot attack, mining is resolved as if swinging bare hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    /// Bare hands (unarmed fallback).
    Hand,
    /// Pickaxe - breaks stone-family blocks quickly.
    Pickaxe,
    /// Axe - breaks wood-family blocks quickly.
    Axe,
    /// Shovel - breaks dirt quickly.
    Shovel,
    /// Sword - combat weapon, poor at mining.
    Sword,
}

impl ToolKind {
    /// Damage dealt to a mob per swing.
    pub fn attack_damage(self) -> f32 {
        match self {
            ToolKind::Sword => 4.0,
            ToolKind::Pickaxe | ToolKind::Axe | ToolKind::Shovel => 1.0,
            ToolKind::Hand => 0.5,
        }
    }

    /// Canonical lowercase key for logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            ToolKind::Hand => "hand",
            ToolKind::Pickaxe => "pickaxe",
            ToolKind::Axe => "axe",
            ToolKind::Shovel => "shovel",
            ToolKind::Sword => "sword",
        }
    }
}

/// Identifier for an item in the fixed content set.
///
/// Tools carry a material qualifier (`pickaxe`/`stone`); everything else
/// is identified by name alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    /// Base name, e.g. `"dirt"` or `"pickaxe"`.
    pub name: String,
    /// Material qualifier for tools, e.g. `"stone"`.
    pub material: Option<String>,
}

impl ItemKey {
    /// Key for a plain (non-tool) item.
    pub fn simple(name: &str) -> Self {
        Self {
            name: name.to_string(),
            material: None,
        }
    }

    /// Key for a tool of a given material.
    pub fn tool(name: &str, material: &str) -> Self {
        Self {
            name: name.to_string(),
            material: Some(material.to_string()),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.material {
            Some(material) => write!(f, "({:?}, {:?})", self.name, material),
            None => write!(f, "({:?})", self.name),
        }
    }
}

/// Identifier for a block in the fixed content set.
///
/// The trick-candle block carries a generation counter (`mayhem`, n).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockKey {
    /// Block kind name, e.g. `"stone"`.
    pub kind: String,
    /// Generation counter for self-replacing blocks.
    pub generation: Option<u8>,
}

impl BlockKey {
    /// Key for an ordinary block kind.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            generation: None,
        }
    }

    /// Key for a block kind with a generation counter.
    pub fn with_generation(kind: &str, generation: u8) -> Self {
        Self {
            kind: kind.to_string(),
            generation: Some(generation),
        }
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.generation {
            Some(generation) => write!(f, "({:?}, {})", self.kind, generation),
            None => write!(f, "({:?})", self.kind),
        }
    }
}

/// Behavior of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Crafting ingredient or other inert item (stick, bow, arrow).
    Simple,
    /// The unarmed fallback; can always attack, takes no durability damage.
    Hand,
    /// Placeable item; placing produces a block of the named kind.
    Block {
        /// Block kind placed into the world.
        block: String,
    },
    /// Edible item; using it produces a food effect.
    Food {
        /// Amount of food (or health, once food is full) recovered.
        strength: f32,
    },
    /// Tool with wear; mining with the wrong tool spends durability.
    Tool {
        /// Tool category used against break tables.
        tool: ToolKind,
        /// Remaining durability, clamped at zero.
        durability: u32,
        /// Durability when new.
        max_durability: u32,
    },
}

/// An item instance.
///
/// Two items stack together iff they share an id and are stackable; tools
/// never stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    id: String,
    kind: ItemKind,
}

impl Item {
    /// Create an item directly. Prefer [`create_item`] for registry keys.
    pub fn new(id: &str, kind: ItemKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
        }
    }

    /// Unique item identifier, e.g. `"stone_pickaxe"`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The item's behavior.
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Whether this item can be used for an attack.
    ///
    /// Tools attack while durability remains; bare hands always can.
    pub fn can_attack(&self) -> bool {
        match self.kind {
            ItemKind::Hand => true,
            ItemKind::Tool { durability, .. } => durability > 0,
            _ => false,
        }
    }

    /// Tool category used to resolve break tables.
    pub fn tool_kind(&self) -> ToolKind {
        match self.kind {
            ItemKind::Tool { tool, .. } => tool,
            _ => ToolKind::Hand,
        }
    }

    /// Register the result of an attack.
    ///
    /// An unsuccessful attack spends one point of durability; durability
    /// never goes below zero. Successful attacks and non-tools are
    /// unaffected.
    pub fn attack(&mut self, successful: bool) {
        if successful {
            return;
        }
        if let ItemKind::Tool { durability, .. } = &mut self.kind {
            *durability = durability.saturating_sub(1);
        }
    }

    /// Remaining durability, or `None` for non-tools.
    pub fn durability(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Tool { durability, .. } => Some(durability),
            _ => None,
        }
    }

    /// Maximum durability, or `None` for non-tools.
    pub fn max_durability(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Tool { max_durability, .. } => Some(max_durability),
            _ => None,
        }
    }

    /// Whether this item stacks in grids. Tools and hands never stack.
    pub fn is_stackable(&self) -> bool {
        !matches!(self.kind, ItemKind::Tool { .. } | ItemKind::Hand)
    }

    /// Maximum stack size for this item.
    pub fn max_stack_size(&self) -> u32 {
        if self.is_stackable() {
            DEFAULT_MAX_STACK
        } else {
            1
        }
    }

    /// Maximum reach when attacking or mining, in pixels per cell expanse.
    pub fn attack_range_cells(&self) -> f32 {
        ATTACK_RANGE_CELLS
    }

    /// Loot produced by placing (right-clicking with) this item.
    ///
    /// Placeable items yield a block payload; food yields a stat effect;
    /// everything else yields nothing.
    pub fn place(&self) -> Vec<Loot> {
        match &self.kind {
            ItemKind::Block { block } => vec![Loot::Block(BlockKey::new(block))],
            ItemKind::Food { strength } => {
                vec![Loot::Effect(Effect::Stat(StatKind::Food, *strength))]
            }
            _ => Vec::new(),
        }
    }
}

/// Durability of tools by material.
fn tool_durability(material: &str) -> Option<u32> {
    match material {
        "wood" => Some(60),
        "stone" => Some(132),
        "diamond" => Some(1562),
        _ => None,
    }
}

fn tool_kind_by_name(name: &str) -> Option<ToolKind> {
    match name {
        "pickaxe" => Some(ToolKind::Pickaxe),
        "axe" => Some(ToolKind::Axe),
        "shovel" => Some(ToolKind::Shovel),
        "sword" => Some(ToolKind::Sword),
        _ => None,
    }
}

/// Create an item from a registry key (the item factory).
///
/// Total over the fixed content set; any other key is a
/// [`RegistryError::UnknownItem`].
pub fn create_item(key: &ItemKey) -> Result<Item, RegistryError> {
    if let Some(material) = &key.material {
        let (Some(tool), Some(max)) = (tool_kind_by_name(&key.name), tool_durability(material))
        else {
            return Err(RegistryError::UnknownItem(key.clone()));
        };

        // Only the tool/material combinations the game ships with.
        let known = matches!(
            (key.name.as_str(), material.as_str()),
            ("pickaxe", "wood" | "stone" | "diamond")
                | ("axe", "wood" | "stone")
                | ("shovel", "wood" | "stone")
                | ("sword", "wood" | "stone")
        );
        if !known {
            return Err(RegistryError::UnknownItem(key.clone()));
        }

        let id = format!("{}_{}", material, key.name);
        return Ok(Item::new(
            &id,
            ItemKind::Tool {
                tool,
                durability: max,
                max_durability: max,
            },
        ));
    }

    let item = match key.name.as_str() {
        "hands" => Item::new("hands", ItemKind::Hand),
        "stick" | "bow" | "arrow" => Item::new(&key.name, ItemKind::Simple),
        "apple" => Item::new("apple", ItemKind::Food { strength: 2.0 }),
        "dirt" | "wood" | "stone" | "crafting_table" | "wool" | "bed" | "honey" | "furnace"
        | "diamond" | "hive" => Item::new(
            &key.name,
            ItemKind::Block {
                block: key.name.clone(),
            },
        ),
        _ => return Err(RegistryError::UnknownItem(key.clone())),
    };
    Ok(item)
}
