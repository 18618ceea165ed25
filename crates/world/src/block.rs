//! Blocks, break tables, and the mining resolution algorithm.
//!
//! A block's break table maps tool kinds to the effort required to break
//! it and whether that tool kind is the ideal one. Mining accumulates
//! effort one swing at a time; a block transitions to mined exactly once,
//! when accumulated effort reaches the table entry's requirement.

use sandcraft_core::{BlockKey, Effect, ItemKey, Loot, RegistryError, ToolKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Effort contributed by a single mining swing, in seconds-of-work.
pub const SWING_EFFORT: f32 = 0.25;

/// Luck threshold below which a leaf block yields an apple.
pub const LEAF_APPLE_LUCK: f64 = 0.2;

/// Generations a trick-candle block survives before staying out.
const TRICK_CANDLE_RELIGHTS: u8 = 5;

/// One break table entry: effort required and whether this tool kind is
/// the ideal ("effective") one for the block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEntry {
    /// Seconds of accumulated effort required to break the block.
    pub effort: f32,
    /// Whether this tool kind counts as the correct item for drops.
    pub effective: bool,
}

impl BreakEntry {
    const fn new(effort: f32, effective: bool) -> Self {
        Self { effort, effective }
    }
}

/// Mapping from tool kind to break entry. Tool kinds absent from the
/// table make no mining progress at all.
pub type BreakTable = BTreeMap<ToolKind, BreakEntry>;

/// The three standard hardness families blocks draw their tables from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakFamily {
    /// Soft ground: best broken with a shovel, hands work fine.
    Dirt,
    /// Woody blocks: best broken with an axe.
    Wood,
    /// Stony blocks: need a pickaxe to break quickly.
    Stone,
}

/// Build the standard break table for a hardness family.
pub fn standard_break_table(family: BreakFamily) -> BreakTable {
    let entries: &[(ToolKind, BreakEntry)] = match family {
        BreakFamily::Dirt => &[
            (ToolKind::Hand, BreakEntry::new(0.75, true)),
            (ToolKind::Shovel, BreakEntry::new(0.25, true)),
            (ToolKind::Pickaxe, BreakEntry::new(0.75, false)),
            (ToolKind::Axe, BreakEntry::new(0.75, false)),
            (ToolKind::Sword, BreakEntry::new(0.75, false)),
        ],
        BreakFamily::Wood => &[
            (ToolKind::Hand, BreakEntry::new(3.0, true)),
            (ToolKind::Axe, BreakEntry::new(0.75, true)),
            (ToolKind::Shovel, BreakEntry::new(3.0, false)),
            (ToolKind::Pickaxe, BreakEntry::new(3.0, false)),
            (ToolKind::Sword, BreakEntry::new(1.5, false)),
        ],
        BreakFamily::Stone => &[
            (ToolKind::Pickaxe, BreakEntry::new(0.4, true)),
            (ToolKind::Hand, BreakEntry::new(7.5, false)),
            (ToolKind::Shovel, BreakEntry::new(2.0, false)),
            (ToolKind::Axe, BreakEntry::new(2.0, false)),
            (ToolKind::Sword, BreakEntry::new(3.75, false)),
        ],
    };
    entries.iter().copied().collect()
}

fn leaf_break_table() -> BreakTable {
    // Leaves crumble in a touch regardless of tool.
    [
        ToolKind::Hand,
        ToolKind::Pickaxe,
        ToolKind::Axe,
        ToolKind::Shovel,
        ToolKind::Sword,
    ]
    .into_iter()
    .map(|tool| (tool, BreakEntry::new(0.2, true)))
    .collect()
}

/// What a block does when mined or used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockBehavior {
    /// Drops `count` of `drop` when broken with the correct item.
    Resource {
        /// Item dropped.
        drop: ItemKey,
        /// Copies dropped.
        count: u32,
    },
    /// Drops an apple on a lucky break, nothing otherwise.
    Leaf,
    /// Drops itself and opens the 3x3 craft surface when used.
    CraftingTable,
    /// Re-places itself when mined, up to a fixed number of relights.
    TrickCandle {
        /// How many times this candle has already come back.
        generation: u8,
    },
}

/// Result of one mining swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MineOutcome {
    /// The tool kind used is the one the break table marks as ideal.
    pub effective: bool,
    /// This swing completed the break.
    pub success: bool,
}

/// A block occupying one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    kind: String,
    behavior: BlockBehavior,
    break_table: BreakTable,
    progress: f32,
    mined: bool,
}

impl Block {
    /// Create a block directly. Prefer [`create_block`] for registry keys.
    pub fn new(kind: &str, behavior: BlockBehavior, break_table: BreakTable) -> Self {
        Self {
            kind: kind.to_string(),
            behavior,
            break_table,
            progress: 0.0,
            mined: false,
        }
    }

    /// Block kind name, e.g. `"stone"`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The block's behavior.
    pub fn behavior(&self) -> &BlockBehavior {
        &self.behavior
    }

    /// Accumulated mining effort in seconds-of-work.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether the block has been mined out.
    pub fn is_mined(&self) -> bool {
        self.mined
    }

    /// The break entry for a tool kind, if the table has one.
    pub fn break_entry(&self, tool: ToolKind) -> Option<BreakEntry> {
        self.break_table.get(&tool).copied()
    }

    /// Apply one mining swing with the given tool kind.
    ///
    /// Tool kinds absent from the break table make no progress. A mined
    /// block ignores further swings (never double-breaks).
    pub fn mine(&mut self, tool: ToolKind) -> MineOutcome {
        if self.mined {
            return MineOutcome {
                effective: false,
                success: false,
            };
        }
        let Some(entry) = self.break_entry(tool) else {
            return MineOutcome {
                effective: false,
                success: false,
            };
        };

        self.progress += SWING_EFFORT;
        let success = self.progress >= entry.effort;
        if success {
            self.mined = true;
        }
        MineOutcome {
            effective: entry.effective,
            success,
        }
    }

    /// Loot produced when the block breaks.
    ///
    /// `luck` is a uniform [0, 1) sample; `correct_item_used` is the
    /// effectiveness flag from the completing swing.
    pub fn drops(&self, luck: f64, correct_item_used: bool) -> Vec<Loot> {
        match &self.behavior {
            BlockBehavior::Resource { drop, count } => {
                if correct_item_used {
                    vec![Loot::Item(drop.clone()); *count as usize]
                } else {
                    Vec::new()
                }
            }
            BlockBehavior::Leaf => {
                if luck < LEAF_APPLE_LUCK {
                    vec![Loot::Item(ItemKey::simple("apple"))]
                } else {
                    Vec::new()
                }
            }
            BlockBehavior::CraftingTable => {
                if correct_item_used {
                    vec![Loot::Item(ItemKey::simple(&self.kind))]
                } else {
                    Vec::new()
                }
            }
            BlockBehavior::TrickCandle { generation } => {
                if *generation < TRICK_CANDLE_RELIGHTS {
                    vec![Loot::Block(BlockKey::with_generation(
                        &self.kind,
                        generation + 1,
                    ))]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Whether right-clicking the block does something.
    pub fn can_use(&self) -> bool {
        matches!(self.behavior, BlockBehavior::CraftingTable)
    }

    /// The effect produced by using the block, if any.
    pub fn use_action(&self) -> Option<Effect> {
        match self.behavior {
            BlockBehavior::CraftingTable => {
                Some(Effect::Crafting(self.kind.clone()))
            }
            _ => None,
        }
    }
}

fn self_dropping(kind: &str, count: u32, family: BreakFamily) -> Block {
    Block::new(
        kind,
        BlockBehavior::Resource {
            drop: ItemKey::simple(kind),
            count,
        },
        standard_break_table(family),
    )
}

/// Create a block from a registry key (the block factory).
///
/// Total over the fixed content set; any other key is a
/// [`RegistryError::UnknownBlock`].
pub fn create_block(key: &BlockKey) -> Result<Block, RegistryError> {
    if key.kind == "mayhem" {
        let generation = key.generation.unwrap_or(0);
        return Ok(Block::new(
            "mayhem",
            BlockBehavior::TrickCandle { generation },
            standard_break_table(BreakFamily::Wood),
        ));
    }
    if key.generation.is_some() {
        return Err(RegistryError::UnknownBlock(key.clone()));
    }

    let block = match key.kind.as_str() {
        "leaf" => Block::new("leaf", BlockBehavior::Leaf, leaf_break_table()),
        "dirt" => self_dropping("dirt", 1, BreakFamily::Dirt),
        "wood" => self_dropping("wood", 1, BreakFamily::Wood),
        "wool" | "bed" | "hive" => self_dropping(&key.kind, 1, BreakFamily::Wood),
        "honey" => self_dropping("honey", 5, BreakFamily::Wood),
        "stone" | "diamond" | "furnace" => self_dropping(&key.kind, 1, BreakFamily::Stone),
        "crafting_table" => Block::new(
            "crafting_table",
            BlockBehavior::CraftingTable,
            standard_break_table(BreakFamily::Wood),
        ),
        _ => return Err(RegistryError::UnknownBlock(key.clone())),
    };
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone() -> Block {
        create_block(&BlockKey::new("stone")).unwrap()
    }

    #[test]
    fn progress_accumulates_until_the_effort_is_met() {
        let mut block = stone();

        // Stone needs 0.4s with a pickaxe: two swings.
        let first = block.mine(ToolKind::Pickaxe);
        assert!(first.effective);
        assert!(!first.success);
        assert_eq!(block.progress(), SWING_EFFORT);

        let second = block.mine(ToolKind::Pickaxe);
        assert!(second.success);
        assert!(block.is_mined());
    }

    #[test]
    fn mined_blocks_ignore_further_swings() {
        let mut block = stone();
        block.mine(ToolKind::Pickaxe);
        block.mine(ToolKind::Pickaxe);
        assert!(block.is_mined());

        let progress = block.progress();
        let again = block.mine(ToolKind::Pickaxe);
        assert!(!again.success);
        assert_eq!(block.progress(), progress);
    }

    #[test]
    fn absent_tool_kinds_make_no_progress() {
        let mut block = Block::new(
            "hardened_stone",
            BlockBehavior::Resource {
                drop: ItemKey::simple("stone"),
                count: 1,
            },
            // A table with no hand entry at all.
            [(ToolKind::Pickaxe, BreakEntry::new(0.4, true))]
                .into_iter()
                .collect(),
        );

        for _ in 0..1000 {
            let outcome = block.mine(ToolKind::Hand);
            assert!(!outcome.success);
            assert!(!outcome.effective);
        }
        assert_eq!(block.progress(), 0.0);
        assert!(!block.is_mined());
    }

    #[test]
    fn wrong_tools_complete_slowly_but_are_not_effective() {
        let mut block = stone();
        let mut last = MineOutcome {
            effective: true,
            success: false,
        };
        let mut swings = 0;
        while !last.success {
            last = block.mine(ToolKind::Hand);
            swings += 1;
            assert!(!last.effective);
        }
        // 7.5s at 0.25s per swing.
        assert_eq!(swings, 30);
    }

    #[test]
    fn resource_drops_require_the_correct_item() {
        let block = stone();
        assert_eq!(
            block.drops(0.0, true),
            vec![Loot::Item(ItemKey::simple("stone"))]
        );
        assert!(block.drops(0.0, false).is_empty());
    }

    #[test]
    fn honey_drops_five() {
        let block = create_block(&BlockKey::new("honey")).unwrap();
        assert_eq!(block.drops(0.5, true).len(), 5);
    }

    #[test]
    fn leaf_drops_follow_luck() {
        let block = create_block(&BlockKey::new("leaf")).unwrap();
        assert_eq!(
            block.drops(0.0, true),
            vec![Loot::Item(ItemKey::simple("apple"))]
        );
        assert!(block.drops(0.5, true).is_empty());
        // Luck applies whether or not the item was correct.
        assert_eq!(block.drops(0.1, false).len(), 1);
    }

    #[test]
    fn trick_candle_relights_a_bounded_number_of_times() {
        let block = create_block(&BlockKey::with_generation("mayhem", 0)).unwrap();
        assert_eq!(
            block.drops(0.9, false),
            vec![Loot::Block(BlockKey::with_generation("mayhem", 1))]
        );

        let last = create_block(&BlockKey::with_generation("mayhem", 5)).unwrap();
        assert!(last.drops(0.0, true).is_empty());
    }

    #[test]
    fn crafting_table_is_usable() {
        let block = create_block(&BlockKey::new("crafting_table")).unwrap();
        assert!(block.can_use());
        assert_eq!(
            block.use_action(),
            Some(Effect::Crafting("crafting_table".to_string()))
        );
        assert!(!stone().can_use());
    }

    #[test]
    fn unknown_kinds_are_lookup_errors() {
        assert!(matches!(
            create_block(&BlockKey::new("obsidian")),
            Err(RegistryError::UnknownBlock(_))
        ));
        // Generations only make sense for the trick candle.
        assert!(matches!(
            create_block(&BlockKey::with_generation("stone", 1)),
            Err(RegistryError::UnknownBlock(_))
        ));
    }
}
