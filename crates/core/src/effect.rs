//! Effects and loot payloads produced by using, placing, and mining.

use crate::item::{BlockKey, ItemKey};
use serde::{Deserialize, Serialize};

/// Player stat targeted by a stat effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    /// Satiety; buffers health loss from strenuous activity.
    Food,
    /// Hit points.
    Health,
}

/// A tagged effect routed through the session's effect router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Open or select the crafter for the named craft surface
    /// (`"basic"` for the 2x2 grid, `"crafting_table"` for 3x3).
    Crafting(String),
    /// Change a player stat by the given strength.
    Stat(StatKind, f32),
}

/// One loot instruction: world state to create after an action.
///
/// Which payloads a dispatcher accepts depends on context: mining accepts
/// `Item` and `Block`; placing accepts `Block` and `Effect`. Anything
/// else is a caller error surfaced as an unknown-category error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Loot {
    /// Spawn a dropped item near the origin position.
    Item(ItemKey),
    /// Place a block at the origin cell.
    Block(BlockKey),
    /// Route an effect through the effect router.
    Effect(Effect),
}

impl Loot {
    /// Category name used in unknown-category errors.
    pub fn category(&self) -> &'static str {
        match self {
            Loot::Item(_) => "item",
            Loot::Block(_) => "block",
            Loot::Effect(_) => "effect",
        }
    }
}
