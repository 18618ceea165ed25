//! World simulation: blocks, mobs, dropped items, the player, and the
//! tick-driven game session that ties them to the physics space.

mod block;
mod dropped_item;
mod mob;
mod player;
mod session;
mod world;
mod worldgen;

pub use block::{
    create_block, standard_break_table, Block, BlockBehavior, BreakEntry, BreakFamily,
    BreakTable, MineOutcome, LEAF_APPLE_LUCK, SWING_EFFORT,
};
pub use dropped_item::{DroppedItem, DROPPED_ITEM_SIZE, ITEM_DESPAWN_TICKS};
pub use mob::{Mob, MobSpecies};
pub use player::{Player, MAX_FOOD, MAX_HEALTH};
pub use session::{
    ActionError, Confirm, Session, JUMP_IMPULSE, MINE_FOOD_COST, MINE_HEALTH_COST, MOVE_IMPULSE,
};
pub use world::{
    BoundaryWall, CollisionHandler, GameData, Thing, ThingView, VisualKind, WallSide, World,
    CELL_EXPANSE, GRAVITY, GRID_HEIGHT, GRID_WIDTH, PLAYER_SIZE,
};
pub use worldgen::load_fixed_world;
