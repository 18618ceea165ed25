//! The game session: the world plus the player's containers, and every
//! UI-facing intent (movement, clicks, hotbar selection, crafting).
//!
//! Player actions run synchronously outside the tick boundary against the
//! same world state the tick mutates; nothing here suspends or retries.

use crate::block::create_block;
use crate::dropped_item::DroppedItem;
use crate::player::Player;
use crate::world::{GameData, Thing, World, CELL_EXPANSE, GRID_HEIGHT, GRID_WIDTH};
use crate::worldgen::load_fixed_world;
use glam::Vec2;
use rand::Rng;
use sandcraft_core::crafting::{crafter_for_surface, GridCrafter, SURFACE_BASIC};
use sandcraft_core::{
    create_item, Effect, Item, ItemGrid, ItemKey, Loot, RegistryError, SelectableGrid, Stack,
    StatKind, ToolKind,
};
use sandcraft_physics::{positions_in_range, BodyId, Category};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Food spent per completed mine while any food remains.
pub const MINE_FOOD_COST: f32 = 0.5;

/// Health spent per completed mine once food is exhausted.
pub const MINE_HEALTH_COST: f32 = 2.5;

/// Velocity added per movement intent, pixels per second.
pub const MOVE_IMPULSE: f32 = 80.0;

/// Upward velocity added by a jump intent, pixels per second.
pub const JUMP_IMPULSE: f32 = 150.0;

/// Where the player spawns, in pixels.
const PLAYER_SPAWN: Vec2 = Vec2::new(250.0, 150.0);

/// Explicit yes/no answer gating destructive actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    /// Go ahead.
    Yes,
    /// Leave everything as it is.
    No,
}

/// Errors surfaced by player actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// An identifier outside the fixed content set was referenced.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A drop payload reached a dispatcher that does not handle it.
    #[error("unknown drop category {0:?}")]
    UnknownDropCategory(&'static str),
    /// Only single-payload placement is supported.
    #[error("cannot handle dropping more than one payload")]
    MultipleDrops,
    /// Placing into a cell that already holds a block.
    #[error("placing into an occupied cell is not implemented")]
    CellOccupied,
}

/// A running game: world, containers, crafting state, and targeting.
pub struct Session {
    world: World,
    hotbar: SelectableGrid,
    inventory: ItemGrid,
    hands: Item,
    crafter: Option<GridCrafter>,
    target: Vec2,
    target_in_range: bool,
}

impl Session {
    /// Start a session on the fixed world layout with stocked containers.
    pub fn new(seed: u64) -> Result<Self, RegistryError> {
        let mut world = World::new((GRID_WIDTH, GRID_HEIGHT), CELL_EXPANSE, seed);
        load_fixed_world(&mut world)?;
        let mut session = Self::with_world(world)?;
        session.stock_containers()?;
        Ok(session)
    }

    /// Start a session on an empty world with empty containers.
    pub fn bare(seed: u64) -> Result<Self, RegistryError> {
        Self::with_world(World::new((GRID_WIDTH, GRID_HEIGHT), CELL_EXPANSE, seed))
    }

    fn with_world(mut world: World) -> Result<Self, RegistryError> {
        install_pickup_handler(&mut world);
        world.add_player(Player::new(), PLAYER_SPAWN.x, PLAYER_SPAWN.y);

        let mut hotbar = SelectableGrid::new(1, 10);
        hotbar.select((0, 0));

        Ok(Self {
            world,
            hotbar,
            inventory: ItemGrid::new(3, 10),
            hands: create_item(&ItemKey::simple("hands"))?,
            crafter: None,
            target: Vec2::ZERO,
            target_in_range: false,
        })
    }

    fn stock_containers(&mut self) -> Result<(), RegistryError> {
        let hotbar_stacks = [
            (ItemKey::simple("dirt"), 20),
            (ItemKey::simple("apple"), 20),
            (ItemKey::tool("pickaxe", "stone"), 1),
            (ItemKey::simple("diamond"), 20),
            (ItemKey::simple("wool"), 20),
            (ItemKey::simple("furnace"), 1),
            (ItemKey::simple("honey"), 1),
            (ItemKey::simple("hive"), 1),
            (ItemKey::simple("bow"), 1),
            (ItemKey::simple("arrow"), 20),
        ];
        for (col, (key, quantity)) in hotbar_stacks.iter().enumerate() {
            let item = create_item(key)?;
            let _ = self
                .hotbar
                .grid_mut()
                .set((0, col), Some(Stack::new(item, *quantity)));
        }

        for (pos, name, quantity) in [((1, 5), "dirt", 10), ((0, 2), "wood", 10)] {
            let item = create_item(&ItemKey::simple(name))?;
            let _ = self.inventory.set(pos, Some(Stack::new(item, quantity)));
        }
        Ok(())
    }

    /// The world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The hotbar.
    pub fn hotbar(&self) -> &SelectableGrid {
        &self.hotbar
    }

    /// Mutable access to the hotbar.
    pub fn hotbar_mut(&mut self) -> &mut SelectableGrid {
        &mut self.hotbar
    }

    /// The backpack inventory.
    pub fn inventory(&self) -> &ItemGrid {
        &self.inventory
    }

    /// Mutable access to the backpack inventory.
    pub fn inventory_mut(&mut self) -> &mut ItemGrid {
        &mut self.inventory
    }

    /// The currently open crafter, if any.
    pub fn crafter(&self) -> Option<&GridCrafter> {
        self.crafter.as_ref()
    }

    /// Mutable access to the open crafter's working grid.
    pub fn crafter_mut(&mut self) -> Option<&mut GridCrafter> {
        self.crafter.as_mut()
    }

    /// The player's stats.
    pub fn player(&self) -> Option<&Player> {
        self.world.player()
    }

    /// Whether the player has died.
    pub fn player_dead(&self) -> bool {
        self.world.player().is_some_and(Player::is_dead)
    }

    /// Advance the simulation by one tick of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let Self {
            world,
            hotbar,
            inventory,
            ..
        } = self;
        let mut data = GameData { hotbar, inventory };
        world.step(dt, &mut data);
    }

    /// Apply a discrete movement intent along (dx, dy) in {-1, 0, 1}.
    pub fn move_player(&mut self, dx: f32, dy: f32) {
        self.update_target_range();
        if let Some(id) = self.world.player_id() {
            if let Some(velocity) = self.world.velocity_of(id) {
                self.world
                    .set_velocity(id, velocity + Vec2::new(dx * MOVE_IMPULSE, dy * MOVE_IMPULSE));
            }
        }
    }

    /// Apply a jump intent: vertical kick with horizontal damping.
    pub fn jump(&mut self) {
        self.update_target_range();
        if let Some(id) = self.world.player_id() {
            if let Some(velocity) = self.world.velocity_of(id) {
                self.world
                    .set_velocity(id, Vec2::new(velocity.x / 1.5, velocity.y - JUMP_IMPULSE));
            }
        }
    }

    /// Select a hotbar slot (0-9).
    pub fn select_hotbar_slot(&mut self, index: usize) {
        self.hotbar.select((0, index));
    }

    /// Toggle selection of a hotbar slot (item-activation intent).
    pub fn toggle_hotbar_slot(&mut self, index: usize) {
        debug!(index, "activating hotbar slot");
        self.hotbar.toggle_selection((0, index));
    }

    /// Track the cursor (mouse-move intent).
    pub fn set_target(&mut self, x: f32, y: f32) {
        self.target = Vec2::new(x, y);
        self.update_target_range();
    }

    /// Forget the cursor (mouse-leave intent).
    pub fn clear_target(&mut self) {
        self.target_in_range = false;
    }

    /// Whether the current target is within the active item's reach.
    pub fn target_in_range(&self) -> bool {
        self.target_in_range
    }

    /// The current target position.
    pub fn target(&self) -> Vec2 {
        self.target
    }

    fn update_target_range(&mut self) {
        let range_cells = match self.hotbar.selected_stack() {
            Some(stack) => stack.item().attack_range_cells(),
            None => self.hands.attack_range_cells(),
        };
        let range = range_cells * self.world.cell_expanse();
        self.target_in_range = match self.world.player_position() {
            Some(player) => positions_in_range(player, self.target, range),
            None => false,
        };
    }

    /// The tool kind the next attack resolves with: the active hotbar
    /// item when it can attack, bare hands otherwise.
    fn effective_tool(&self) -> ToolKind {
        match self.hotbar.selected_stack() {
            Some(stack) if stack.item().can_attack() => stack.item().tool_kind(),
            _ => self.hands.tool_kind(),
        }
    }

    /// Spend durability on whichever item resolved the attack.
    fn apply_attack_wear(&mut self, successful: bool) {
        if let Some(stack) = self.hotbar.selected_stack_mut() {
            if stack.item().can_attack() {
                stack.item_mut().attack(successful);
                return;
            }
        }
        self.hands.attack(successful);
    }

    /// Left-click intent: mine the block under the cursor, or failing
    /// that attack the mob there. Out-of-range clicks do nothing.
    pub fn left_click(&mut self, x: f32, y: f32) -> Result<(), ActionError> {
        self.set_target(x, y);
        if !self.target_in_range {
            return Ok(());
        }
        let target = self.target;

        let block_id = self.world.block_at(target).map(|(id, _)| id);
        if let Some(id) = block_id {
            return self.mine_block(id);
        }

        let mob_id = match self.world.thing_at(target) {
            Some((id, Thing::Mob(_))) => Some(id),
            _ => None,
        };
        if let Some(id) = mob_id {
            return self.attack_mob(id);
        }
        Ok(())
    }

    /// Resolve one mining swing against a block.
    fn mine_block(&mut self, id: BodyId) -> Result<(), ActionError> {
        let luck = self.world.roll_luck();
        let tool = self.effective_tool();

        let outcome = match self.world.thing_mut(id) {
            Some(Thing::Block(block)) => block.mine(tool),
            _ => return Ok(()),
        };
        self.apply_attack_wear(outcome.success);
        if !outcome.success {
            return Ok(());
        }

        if let Some(player) = self.world.player_mut() {
            player.pay_exertion(MINE_FOOD_COST, MINE_HEALTH_COST);
        }

        let Some(origin) = self.world.position_of(id) else {
            return Ok(());
        };
        let cell = self.world.xy_to_grid(origin);
        let Some(Thing::Block(block)) = self.world.remove_thing(id) else {
            return Ok(());
        };

        let drops = block.drops(luck, outcome.effective);
        debug!(
            kind = block.kind(),
            effective = outcome.effective,
            drops = drops.len(),
            "block mined"
        );
        self.dispatch_drops(&drops, origin, cell)
    }

    fn attack_mob(&mut self, id: BodyId) -> Result<(), ActionError> {
        let tool = self.effective_tool();
        let died = match self.world.thing_mut(id) {
            Some(Thing::Mob(mob)) => mob.damage(tool.attack_damage()),
            _ => return Ok(()),
        };
        self.apply_attack_wear(died);
        if !died {
            return Ok(());
        }

        let origin = self.world.position_of(id).unwrap_or(self.target);
        let cell = self.world.xy_to_grid(origin);
        let Some(Thing::Mob(mob)) = self.world.remove_thing(id) else {
            return Ok(());
        };
        info!(species = mob.species().as_str(), "mob defeated");
        self.dispatch_drops(&mob.species().drops(), origin, cell)
    }

    /// Turn an ordered list of loot instructions into world mutations.
    ///
    /// Items spawn near `origin` on a 3-wide offset tiling with a small
    /// random jitter so simultaneous drops don't overlap; blocks are
    /// placed at the mined block's former `cell`. Effect payloads are a
    /// caller error here and propagate unhandled.
    fn dispatch_drops(
        &mut self,
        drops: &[Loot],
        origin: Vec2,
        cell: (i32, i32),
    ) -> Result<(), ActionError> {
        let half_cell = self.world.cell_expanse() / 2.0;
        for (index, loot) in drops.iter().enumerate() {
            match loot {
                Loot::Item(key) => {
                    let item = create_item(key)?;
                    let jitter_x = self.world.rng_mut().gen_range(0..=2) as f32;
                    let jitter_y = self.world.rng_mut().gen_range(0..=2) as f32;
                    let x =
                        origin.x - half_cell + 5.0 + (index % 3) as f32 * 11.0 + jitter_x;
                    let y =
                        origin.y - half_cell + 5.0 + ((index / 3) % 3) as f32 * 11.0 + jitter_y;
                    self.world.add_item(DroppedItem::new(item), x, y);
                }
                Loot::Block(key) => {
                    let block = create_block(key)?;
                    if let Err(block) = self.world.add_block_to_grid(block, cell) {
                        warn!(kind = block.kind(), ?cell, "dropped block had nowhere to go");
                    }
                }
                Loot::Effect(_) => {
                    return Err(ActionError::UnknownDropCategory(loot.category()));
                }
            }
        }
        Ok(())
    }

    /// Right-click intent: use the thing under the cursor if it does
    /// something, otherwise place (or consume) the active hotbar item.
    ///
    /// Anything under the cursor wins over placement, so an occupied cell
    /// normally just absorbs the click; [`ActionError::CellOccupied`]
    /// covers the remaining case where hit-testing missed but the target
    /// cell is taken.
    pub fn right_click(&mut self, x: f32, y: f32) -> Result<(), ActionError> {
        let target = Vec2::new(x, y);

        let under_cursor = self
            .world
            .thing_at(target)
            .map(|(_, thing)| thing.use_action());
        if let Some(effect) = under_cursor {
            return match effect {
                Some(effect) => self.run_effect(effect),
                None => Ok(()),
            };
        }

        let Some(selected) = self.hotbar.selected() else {
            return Ok(());
        };
        let Some(stack) = self.hotbar.grid().get(selected) else {
            return Ok(());
        };
        let mut drops = stack.item().place();
        if drops.is_empty() {
            return Ok(());
        }
        if drops.len() > 1 {
            return Err(ActionError::MultipleDrops);
        }
        let loot = drops.remove(0);

        let emptied = match self.hotbar.grid_mut().get_mut(selected) {
            Some(stack) => {
                stack.subtract(1);
                stack.is_empty()
            }
            None => false,
        };
        if emptied {
            self.hotbar.grid_mut().take(selected);
        }

        match loot {
            Loot::Block(key) => {
                let block = create_block(&key)?;
                if self.world.add_block(block, x, y).is_err() {
                    return Err(ActionError::CellOccupied);
                }
                Ok(())
            }
            Loot::Effect(effect) => self.run_effect(effect),
            Loot::Item(_) => Err(ActionError::UnknownDropCategory("item")),
        }
    }

    /// Open the basic 2x2 craft surface (inventory crafting intent).
    pub fn open_basic_crafting(&mut self) -> Result<(), ActionError> {
        self.run_effect(Effect::Crafting(SURFACE_BASIC.to_string()))
    }

    /// Route a tagged effect to its handler.
    ///
    /// Stat effects dispatch on their declared kind: food raises food
    /// (overflowing into health only once food is full), health raises
    /// health. Crafting effects select the crafter for their surface;
    /// unregistered surfaces propagate as lookup errors. Effect routing
    /// never re-enters drop processing.
    pub fn run_effect(&mut self, effect: Effect) -> Result<(), ActionError> {
        match effect {
            Effect::Crafting(surface) => {
                info!(%surface, "opening craft surface");
                self.crafter = Some(crafter_for_surface(&surface)?);
                Ok(())
            }
            Effect::Stat(kind, strength) => {
                let Some(player) = self.world.player_mut() else {
                    return Ok(());
                };
                match kind {
                    StatKind::Food => {
                        if player.food() < player.max_food() {
                            player.change_food(strength);
                        } else {
                            player.change_health(strength);
                        }
                    }
                    StatKind::Health => player.change_health(strength),
                }
                Ok(())
            }
        }
    }

    /// Start over on a fresh copy of the fixed layout.
    ///
    /// Destructive: requires an explicit [`Confirm::Yes`]; anything else
    /// leaves the session untouched. Returns whether a new game started.
    pub fn new_game(&mut self, answer: Confirm) -> Result<bool, RegistryError> {
        if answer != Confirm::Yes {
            return Ok(false);
        }
        info!("starting a new game");

        self.world.clear_things();
        load_fixed_world(&mut self.world)?;
        self.world
            .add_player(Player::new(), PLAYER_SPAWN.x, PLAYER_SPAWN.y);

        self.hotbar.grid_mut().clear();
        self.hotbar.select((0, 0));
        self.inventory.clear();
        self.stock_containers()?;
        self.crafter = None;
        self.target_in_range = false;
        Ok(true)
    }
}

/// Install the player/item pickup callback.
///
/// On contact the dropped item goes to the hotbar, falling back to the
/// inventory; the collision is reported invalid (no physical response) so
/// pickup never blocks the player. Only when both containers are full
/// does the handler report a valid collision, leaving the item to rest
/// visibly in the world.
fn install_pickup_handler(world: &mut World) {
    world.add_collision_handler(Category::Player, Category::Item, |world, data, contact| {
        let Some(Thing::Item(dropped)) = world.thing(contact.b) else {
            return true;
        };
        let item = dropped.item();

        let to_hotbar = data.hotbar.can_accept(item);
        let to_inventory = !to_hotbar && data.inventory.can_accept(item);
        if !to_hotbar && !to_inventory {
            info!(
                item = item.id(),
                "found an item, but hotbar and inventory are full"
            );
            return true;
        }

        let Some(origin) = world.position_of(contact.b) else {
            return true;
        };
        let Some(Thing::Item(dropped)) = world.remove_thing(contact.b) else {
            return true;
        };
        let item = dropped.into_item();
        let label = item.id().to_string();
        let result = if to_hotbar {
            data.hotbar.add_item(item)
        } else {
            data.inventory.add_item(item)
        };
        match result {
            Ok(()) => {
                debug!(
                    item = %label,
                    destination = if to_hotbar { "hotbar" } else { "inventory" },
                    "picked up item"
                );
                false
            }
            Err(item) => {
                world.add_item(DroppedItem::new(item), origin.x, origin.y);
                true
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandcraft_core::BlockKey;

    const MAX_FOOD_START: f32 = crate::player::MAX_FOOD;

    fn session() -> Session {
        Session::bare(5).unwrap()
    }

    fn give_hotbar(session: &mut Session, slot: usize, key: &ItemKey, quantity: u32) {
        let item = create_item(key).unwrap();
        let _ = session
            .hotbar_mut()
            .grid_mut()
            .set((0, slot), Some(Stack::new(item, quantity)));
    }

    /// Put the player on a floor with a target block beside it, and
    /// return the target block's center.
    fn stage_block(session: &mut Session, kind: &str) -> Vec2 {
        let block = create_block(&BlockKey::new(kind)).unwrap();
        session.world_mut().add_block_to_grid(block, (8, 9)).unwrap();
        let center = session.world().grid_to_xy_centre((8, 9));
        session
            .world_mut()
            .add_player(Player::new(), center.x, center.y - 64.0);
        center
    }

    #[test]
    fn mining_spends_food_on_completion_only() {
        let mut session = session();
        let target = stage_block(&mut session, "dirt");
        give_hotbar(&mut session, 2, &ItemKey::tool("shovel", "stone"), 1);
        session.select_hotbar_slot(2);

        // Dirt with a shovel: one swing (0.25s at 0.25s per swing).
        session.left_click(target.x, target.y).unwrap();
        let player = session.player().unwrap();
        assert_eq!(player.food(), MAX_FOOD_START - MINE_FOOD_COST);
        assert!(session.world().block_at(target).is_none());
    }

    #[test]
    fn unsuccessful_swings_cost_durability_not_food() {
        let mut session = session();
        let target = stage_block(&mut session, "stone");
        give_hotbar(&mut session, 0, &ItemKey::tool("pickaxe", "stone"), 1);
        session.select_hotbar_slot(0);

        // First swing of two: not successful yet.
        session.left_click(target.x, target.y).unwrap();
        let stack = session.hotbar().selected_stack().unwrap();
        assert_eq!(stack.item().durability(), Some(131));
        let player = session.player().unwrap();
        assert_eq!(player.food(), MAX_FOOD_START);

        // Second swing completes: durability untouched, food spent.
        session.left_click(target.x, target.y).unwrap();
        let stack = session.hotbar().selected_stack().unwrap();
        assert_eq!(stack.item().durability(), Some(131));
        assert_eq!(session.player().unwrap().food(), MAX_FOOD_START - MINE_FOOD_COST);
    }

    #[test]
    fn movement_intents_adjust_velocity() {
        let mut session = session();
        let id = session.world().player_id().unwrap();

        session.move_player(1.0, 0.0);
        assert_eq!(session.world().velocity_of(id).unwrap().x, MOVE_IMPULSE);

        session.move_player(-1.0, 0.0);
        assert_eq!(session.world().velocity_of(id).unwrap().x, 0.0);

        session.move_player(1.0, 0.0);
        session.jump();
        let velocity = session.world().velocity_of(id).unwrap();
        assert_eq!(velocity.x, MOVE_IMPULSE / 1.5);
        assert_eq!(velocity.y, -JUMP_IMPULSE);
    }

    #[test]
    fn hotbar_activation_toggles() {
        let mut session = session();
        session.toggle_hotbar_slot(4);
        assert_eq!(session.hotbar().selected(), Some((0, 4)));
        session.toggle_hotbar_slot(4);
        assert_eq!(session.hotbar().selected(), None);
    }

    #[test]
    fn out_of_range_clicks_do_nothing() {
        let mut session = session();
        let block = create_block(&BlockKey::new("dirt")).unwrap();
        session.world_mut().add_block_to_grid(block, (31, 15)).unwrap();
        let far = session.world().grid_to_xy_centre((31, 15));
        session.world_mut().add_player(Player::new(), 20.0, 20.0);

        session.left_click(far.x, far.y).unwrap();
        assert!(!session.target_in_range());
        assert!(session.world().block_at(far).is_some());
    }

    #[test]
    fn dispatch_rejects_effect_payloads() {
        let mut session = session();
        let loot = [Loot::Effect(Effect::Stat(StatKind::Food, 2.0))];
        let err = session
            .dispatch_drops(&loot, Vec2::new(100.0, 100.0), (3, 3))
            .unwrap_err();
        assert!(matches!(err, ActionError::UnknownDropCategory("effect")));
    }

    #[test]
    fn dispatch_spawns_items_within_the_jitter_window() {
        let mut session = session();
        let origin = session.world().grid_to_xy_centre((8, 9));
        let loot = [Loot::Item(ItemKey::simple("stone"))];
        session.dispatch_drops(&loot, origin, (8, 9)).unwrap();

        let items: Vec<_> = session
            .world()
            .things()
            .filter(|view| view.category == Category::Item)
            .collect();
        assert_eq!(items.len(), 1);

        let position = items[0].aabb.center();
        let base = origin - Vec2::splat(CELL_EXPANSE / 2.0 - 5.0);
        assert!(position.x >= base.x && position.x <= base.x + 2.0);
        assert!(position.y >= base.y && position.y <= base.y + 2.0);
    }

    #[test]
    fn dispatch_places_blocks_at_the_source_cell() {
        let mut session = session();
        let origin = session.world().grid_to_xy_centre((4, 4));
        let loot = [Loot::Block(BlockKey::new("wool"))];
        session.dispatch_drops(&loot, origin, (4, 4)).unwrap();

        assert_eq!(session.world().block_at_cell((4, 4)).unwrap().1.kind(), "wool");
    }

    #[test]
    fn right_click_places_the_active_block_item() {
        let mut session = session();
        session.world_mut().add_player(Player::new(), 100.0, 100.0);
        give_hotbar(&mut session, 0, &ItemKey::simple("dirt"), 2);
        session.select_hotbar_slot(0);

        let target = session.world().grid_to_xy_centre((20, 3));
        session.right_click(target.x, target.y).unwrap();

        assert_eq!(session.world().block_at(target).unwrap().1.kind(), "dirt");
        assert_eq!(session.hotbar().selected_stack().unwrap().quantity(), 1);
    }

    #[test]
    fn right_clicking_an_occupied_cell_absorbs_the_click() {
        let mut session = session();
        let target = session.world().grid_to_xy_centre((6, 6));
        let block = create_block(&BlockKey::new("stone")).unwrap();
        session.world_mut().add_block_to_grid(block, (6, 6)).unwrap();
        give_hotbar(&mut session, 0, &ItemKey::simple("dirt"), 5);
        session.select_hotbar_slot(0);

        // The stone under the cursor is the click target; it is not
        // usable, so nothing happens and nothing is spent.
        session.right_click(target.x, target.y).unwrap();
        assert_eq!(session.world().block_at(target).unwrap().1.kind(), "stone");
        assert_eq!(session.hotbar().selected_stack().unwrap().quantity(), 5);
    }

    #[test]
    fn eating_consumes_the_item_and_feeds_the_player() {
        let mut session = session();
        session.world_mut().add_player(Player::new(), 100.0, 100.0);
        if let Some(player) = session.world_mut().player_mut() {
            player.change_food(-10.0);
        }
        give_hotbar(&mut session, 1, &ItemKey::simple("apple"), 1);
        session.select_hotbar_slot(1);

        // Right-click empty space: the apple's effect payload routes.
        session.right_click(700.0, 100.0).unwrap();

        assert_eq!(session.player().unwrap().food(), MAX_FOOD_START - 10.0 + 2.0);
        assert!(session.hotbar().selected_stack().is_none());
    }

    #[test]
    fn food_effects_overflow_into_health_only_at_full_food() {
        let mut session = session();
        if let Some(player) = session.world_mut().player_mut() {
            player.change_health(-5.0);
        }

        // Food is already full: the food effect heals instead.
        session
            .run_effect(Effect::Stat(StatKind::Food, 2.0))
            .unwrap();
        let player = session.player().unwrap();
        assert_eq!(player.food(), player.max_food());
        assert_eq!(player.health(), player.max_health() - 3.0);
    }

    #[test]
    fn health_effects_dispatch_on_their_declared_kind() {
        let mut session = session();
        if let Some(player) = session.world_mut().player_mut() {
            player.change_food(-5.0);
            player.change_health(-5.0);
        }

        // Food below max must not hijack a declared health effect.
        session
            .run_effect(Effect::Stat(StatKind::Health, 4.0))
            .unwrap();
        let player = session.player().unwrap();
        assert_eq!(player.health(), player.max_health() - 1.0);
        assert_eq!(player.food(), player.max_food() - 5.0);
    }

    #[test]
    fn crafting_effects_select_a_crafter() {
        let mut session = session();
        assert!(session.crafter().is_none());

        session.open_basic_crafting().unwrap();
        let crafter = session.crafter().unwrap();
        assert_eq!(crafter.input().size(), (2, 2));

        session
            .run_effect(Effect::Crafting("crafting_table".to_string()))
            .unwrap();
        assert_eq!(session.crafter().unwrap().input().size(), (3, 3));
    }

    #[test]
    fn unknown_effects_propagate() {
        let mut session = session();
        let err = session
            .run_effect(Effect::Crafting("smithing_table".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::Registry(RegistryError::UnknownSurface(_))
        ));
    }

    #[test]
    fn using_a_crafting_table_opens_the_table_surface() {
        let mut session = session();
        let block = create_block(&BlockKey::new("crafting_table")).unwrap();
        session.world_mut().add_block_to_grid(block, (10, 10)).unwrap();
        let target = session.world().grid_to_xy_centre((10, 10));

        session.right_click(target.x, target.y).unwrap();
        assert_eq!(session.crafter().unwrap().input().size(), (3, 3));
    }

    #[test]
    fn new_game_requires_confirmation() {
        let mut session = Session::new(3).unwrap();
        if let Some(player) = session.world_mut().player_mut() {
            player.change_health(-10.0);
        }

        assert!(!session.new_game(Confirm::No).unwrap());
        let hurt = session.player().unwrap();
        assert_eq!(hurt.health(), hurt.max_health() - 10.0);

        assert!(session.new_game(Confirm::Yes).unwrap());
        let player = session.player().unwrap();
        assert_eq!(player.health(), player.max_health());
        assert!(session.hotbar().selected_stack().is_some());
    }
}
