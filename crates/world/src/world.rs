//! The world: a block grid, free-floating entities, and the physics
//! space that carries them all.
//!
//! `World::step` is the tick entry point: every live entity advances its
//! per-type behavior first, then the physics substep integrates motion,
//! and finally begin-contact callbacks run for newly-touching pairs. All
//! of it happens synchronously before `step` returns.

use crate::block::Block;
use crate::dropped_item::{DroppedItem, DROPPED_ITEM_SIZE};
use crate::mob::{Mob, MobSpecies};
use crate::player::Player;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sandcraft_core::{Effect, ItemGrid, SelectableGrid};
use sandcraft_physics::{Body, BodyId, Category, Contact, Space};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Edge length of one grid cell, in pixels.
pub const CELL_EXPANSE: f32 = 32.0;

/// Default grid width in cells.
pub const GRID_WIDTH: u32 = 32;

/// Default grid height in cells.
pub const GRID_HEIGHT: u32 = 16;

/// Gravity acceleration in pixels per second squared (+y is down).
pub const GRAVITY: Vec2 = Vec2::new(0.0, 300.0);

/// Player body extents in pixels.
pub const PLAYER_SIZE: Vec2 = Vec2::new(20.0, 30.0);

const WALL_THICKNESS: f32 = 10.0;

/// Which edge of the world a boundary wall seals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    /// Above the playfield.
    Top,
    /// Below the playfield.
    Bottom,
    /// Left of the playfield.
    Left,
    /// Right of the playfield.
    Right,
}

/// A static wall enclosing the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryWall {
    /// Edge this wall seals.
    pub side: WallSide,
}

/// Tag a renderer matches on to pick a draw routine.
///
/// Every physical thing exposes exactly one of these; there is no
/// runtime-type lookup anywhere in the draw path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    /// An ordinary block (color keyed by block kind).
    Block,
    /// The trick-candle block, drawn with its flicker effect.
    MayhemBlock,
    /// An item lying in the world.
    DroppedItem,
    /// The player.
    Player,
    /// A bird.
    Bird,
    /// A sheep.
    Sheep,
    /// A bee.
    Bee,
    /// Anything without a dedicated routine (boundary walls).
    Undefined,
}

/// Any physical thing living in the world.
#[derive(Debug)]
pub enum Thing {
    /// The player.
    Player(Player),
    /// A mob.
    Mob(Mob),
    /// A dropped item.
    Item(DroppedItem),
    /// A block occupying a grid cell.
    Block(Block),
    /// A boundary wall.
    Wall(BoundaryWall),
}

impl Thing {
    /// The draw tag for this thing.
    pub fn visual(&self) -> VisualKind {
        match self {
            Thing::Player(_) => VisualKind::Player,
            Thing::Mob(mob) => match mob.species() {
                MobSpecies::Bird => VisualKind::Bird,
                MobSpecies::Sheep => VisualKind::Sheep,
                MobSpecies::Bee => VisualKind::Bee,
            },
            Thing::Item(_) => VisualKind::DroppedItem,
            Thing::Block(block) => {
                if block.kind() == "mayhem" {
                    VisualKind::MayhemBlock
                } else {
                    VisualKind::Block
                }
            }
            Thing::Wall(_) => VisualKind::Undefined,
        }
    }

    /// The effect produced by using (right-clicking) this thing, if any.
    pub fn use_action(&self) -> Option<Effect> {
        match self {
            Thing::Block(block) => block.use_action(),
            _ => None,
        }
    }
}

/// Renderer-facing view of one physical thing.
pub struct ThingView<'a> {
    /// Body handle.
    pub id: BodyId,
    /// Collision category.
    pub category: Category,
    /// Current bounding box.
    pub aabb: sandcraft_physics::Aabb,
    /// Draw tag.
    pub visual: VisualKind,
    /// The thing itself.
    pub thing: &'a Thing,
}

/// Mutable game-layer state handed to collision callbacks during a step.
pub struct GameData<'a> {
    /// The player's hotbar.
    pub hotbar: &'a mut SelectableGrid,
    /// The player's backpack inventory.
    pub inventory: &'a mut ItemGrid,
}

/// A begin-contact callback for one category pair.
///
/// Receives the contact with bodies ordered to match registration order.
/// Returns whether the collision is physically valid: `false` makes the
/// two bodies pass through each other this step.
pub type CollisionHandler = Box<dyn FnMut(&mut World, &mut GameData<'_>, Contact) -> bool>;

/// The game world.
pub struct World {
    space: Space,
    things: BTreeMap<BodyId, Thing>,
    grid: HashMap<(i32, i32), BodyId>,
    grid_size: (u32, u32),
    cell_expanse: f32,
    handlers: HashMap<(Category, Category), CollisionHandler>,
    rng: StdRng,
    player_id: Option<BodyId>,
    tick: u64,
}

impl World {
    /// Create an empty world of `grid_size` cells, each `cell_expanse`
    /// pixels across, enclosed by boundary walls. `seed` fixes the
    /// world's random stream (mob wandering, luck rolls, drop jitter).
    pub fn new(grid_size: (u32, u32), cell_expanse: f32, seed: u64) -> Self {
        let mut world = Self {
            space: Space::new(GRAVITY),
            things: BTreeMap::new(),
            grid: HashMap::new(),
            grid_size,
            cell_expanse,
            handlers: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
            player_id: None,
            tick: 0,
        };
        world.add_boundary_walls();
        world
    }

    fn add_boundary_walls(&mut self) {
        let size = self.pixel_size();
        let t = WALL_THICKNESS;
        let walls = [
            (WallSide::Top, Vec2::new(size.x / 2.0, -t / 2.0), Vec2::new(size.x + 2.0 * t, t)),
            (WallSide::Bottom, Vec2::new(size.x / 2.0, size.y + t / 2.0), Vec2::new(size.x + 2.0 * t, t)),
            (WallSide::Left, Vec2::new(-t / 2.0, size.y / 2.0), Vec2::new(t, size.y + 2.0 * t)),
            (WallSide::Right, Vec2::new(size.x + t / 2.0, size.y / 2.0), Vec2::new(t, size.y + 2.0 * t)),
        ];
        for (side, position, extents) in walls {
            let id = self.space.add_body(Body::fixed(Category::Wall, position, extents));
            self.things.insert(id, Thing::Wall(BoundaryWall { side }));
        }
    }

    /// Playfield size in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.grid_size.0 as f32 * self.cell_expanse,
            self.grid_size.1 as f32 * self.cell_expanse,
        )
    }

    /// Grid dimensions in cells.
    pub fn grid_size(&self) -> (u32, u32) {
        self.grid_size
    }

    /// Edge length of one cell, in pixels.
    pub fn cell_expanse(&self) -> f32 {
        self.cell_expanse
    }

    /// Ticks advanced since creation.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Convert a pixel position to its (column, row) cell.
    pub fn xy_to_grid(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x / self.cell_expanse).floor() as i32,
            (position.y / self.cell_expanse).floor() as i32,
        )
    }

    /// The pixel center of a (column, row) cell.
    pub fn grid_to_xy_centre(&self, cell: (i32, i32)) -> Vec2 {
        Vec2::new(
            (cell.0 as f32 + 0.5) * self.cell_expanse,
            (cell.1 as f32 + 0.5) * self.cell_expanse,
        )
    }

    /// Add the player at a pixel position, replacing any previous player.
    pub fn add_player(&mut self, player: Player, x: f32, y: f32) -> BodyId {
        if let Some(old) = self.player_id.take() {
            self.remove_thing(old);
        }
        let id = self
            .space
            .add_body(Body::dynamic(Category::Player, Vec2::new(x, y), PLAYER_SIZE));
        self.things.insert(id, Thing::Player(player));
        self.player_id = Some(id);
        id
    }

    /// Add a mob at a pixel position.
    pub fn add_mob(&mut self, mob: Mob, x: f32, y: f32) -> BodyId {
        let size = mob.species().size();
        let id = self
            .space
            .add_body(Body::dynamic(Category::Mob, Vec2::new(x, y), size));
        self.things.insert(id, Thing::Mob(mob));
        id
    }

    /// Add a dropped item at a pixel position.
    pub fn add_item(&mut self, item: DroppedItem, x: f32, y: f32) -> BodyId {
        let id = self.space.add_body(Body::dynamic(
            Category::Item,
            Vec2::new(x, y),
            Vec2::splat(DROPPED_ITEM_SIZE),
        ));
        self.things.insert(id, Thing::Item(item));
        id
    }

    /// Add a block at the cell containing a pixel position.
    ///
    /// Returns the block unchanged as an `Err` when the cell is occupied.
    pub fn add_block(&mut self, block: Block, x: f32, y: f32) -> Result<BodyId, Block> {
        let cell = self.xy_to_grid(Vec2::new(x, y));
        self.add_block_to_grid(block, cell)
    }

    /// Add a block at a (column, row) cell.
    ///
    /// A cell holds at most one block; occupied cells return the block
    /// back as an `Err`.
    pub fn add_block_to_grid(&mut self, block: Block, cell: (i32, i32)) -> Result<BodyId, Block> {
        if self.grid.contains_key(&cell) {
            return Err(block);
        }
        let center = self.grid_to_xy_centre(cell);
        let id = self.space.add_body(Body::fixed(
            Category::Block,
            center,
            Vec2::splat(self.cell_expanse),
        ));
        self.things.insert(id, Thing::Block(block));
        self.grid.insert(cell, id);
        Ok(id)
    }

    /// The player's stats, if a player is present.
    pub fn player(&self) -> Option<&Player> {
        match self.player_id.and_then(|id| self.things.get(&id)) {
            Some(Thing::Player(player)) => Some(player),
            _ => None,
        }
    }

    /// Mutable access to the player's stats.
    pub fn player_mut(&mut self) -> Option<&mut Player> {
        match self.player_id.and_then(|id| self.things.get_mut(&id)) {
            Some(Thing::Player(player)) => Some(player),
            _ => None,
        }
    }

    /// The player's body handle.
    pub fn player_id(&self) -> Option<BodyId> {
        self.player_id
    }

    /// The player's pixel position.
    pub fn player_position(&self) -> Option<Vec2> {
        self.player_id.and_then(|id| self.position_of(id))
    }

    /// Shared access to a thing.
    pub fn thing(&self, id: BodyId) -> Option<&Thing> {
        self.things.get(&id)
    }

    /// Mutable access to a thing.
    pub fn thing_mut(&mut self, id: BodyId) -> Option<&mut Thing> {
        self.things.get_mut(&id)
    }

    /// A thing's pixel position (its body center).
    pub fn position_of(&self, id: BodyId) -> Option<Vec2> {
        self.space.body(id).map(|body| body.position)
    }

    /// A thing's current velocity.
    pub fn velocity_of(&self, id: BodyId) -> Option<Vec2> {
        self.space.body(id).map(|body| body.velocity)
    }

    /// Set a thing's velocity.
    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        self.space.set_velocity(id, velocity);
    }

    /// The block at the cell containing a pixel position.
    pub fn block_at(&self, position: Vec2) -> Option<(BodyId, &Block)> {
        self.block_at_cell(self.xy_to_grid(position))
    }

    /// The block at a (column, row) cell.
    pub fn block_at_cell(&self, cell: (i32, i32)) -> Option<(BodyId, &Block)> {
        let id = *self.grid.get(&cell)?;
        match self.things.get(&id) {
            Some(Thing::Block(block)) => Some((id, block)),
            _ => None,
        }
    }

    /// The thing under a pixel position, for hit-testing.
    ///
    /// Mobs and items win over the block occupying the cell; boundary
    /// walls and the player are never returned.
    pub fn thing_at(&self, position: Vec2) -> Option<(BodyId, &Thing)> {
        let dynamic = self.space.body_at_point_where(position, |body| {
            matches!(body.category, Category::Mob | Category::Item)
        });
        if let Some(id) = dynamic {
            if let Some(thing) = self.things.get(&id) {
                return Some((id, thing));
            }
        }
        self.block_at(position)
            .and_then(|(id, _)| self.things.get(&id).map(|thing| (id, thing)))
    }

    /// Remove a thing (and its body) from the world, returning it.
    pub fn remove_thing(&mut self, id: BodyId) -> Option<Thing> {
        let body = self.space.remove_body(id);
        let thing = self.things.remove(&id);
        if let (Some(body), Some(Thing::Block(_))) = (&body, &thing) {
            let cell = self.xy_to_grid(body.position);
            self.grid.remove(&cell);
        }
        if self.player_id == Some(id) {
            self.player_id = None;
        }
        thing
    }

    /// Remove every thing, including walls, then rebuild the walls.
    ///
    /// Collision handlers survive a reset.
    pub fn clear_things(&mut self) {
        self.space.clear();
        self.things.clear();
        self.grid.clear();
        self.player_id = None;
        self.add_boundary_walls();
    }

    /// Enumerate all physical things for drawing.
    pub fn things(&self) -> impl Iterator<Item = ThingView<'_>> {
        self.things.iter().filter_map(|(&id, thing)| {
            let body = self.space.body(id)?;
            Some(ThingView {
                id,
                category: body.category,
                aabb: body.aabb(),
                visual: thing.visual(),
                thing,
            })
        })
    }

    /// Number of things in the world (walls included).
    pub fn thing_count(&self) -> usize {
        self.things.len()
    }

    /// Register a begin-contact handler for a category pair.
    ///
    /// The handler fires once per newly-touching pair each step and is
    /// passed the contact with bodies in `(a, b)` registration order. Its
    /// return value decides whether the collision is physically valid.
    pub fn add_collision_handler(
        &mut self,
        a: Category,
        b: Category,
        handler: impl FnMut(&mut World, &mut GameData<'_>, Contact) -> bool + 'static,
    ) {
        self.handlers.insert((a, b), Box::new(handler));
    }

    /// Draw a uniform [0, 1) luck sample from the world's stream.
    pub(crate) fn roll_luck(&mut self) -> f64 {
        use rand::Rng;
        self.rng.gen::<f64>()
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Advance the world by one tick of `dt` seconds.
    ///
    /// Order within the tick: every entity's per-type behavior (mob
    /// wander impulses, item aging), then physics integration, then
    /// begin-contact callbacks. Everything completes before this returns.
    pub fn step(&mut self, dt: f32, data: &mut GameData<'_>) {
        self.tick += 1;

        // Entity behaviors before any physics.
        let mut expired = Vec::new();
        {
            let Self {
                things, rng, space, ..
            } = self;
            for (&id, thing) in things.iter_mut() {
                match thing {
                    Thing::Mob(mob) => {
                        if let Some(impulse) = mob.step_impulse(rng) {
                            if let Some(body) = space.body_mut(id) {
                                body.velocity += impulse;
                            }
                        }
                    }
                    Thing::Item(item) => {
                        if item.tick() {
                            expired.push(id);
                        }
                    }
                    _ => {}
                }
            }
        }
        for id in expired {
            tracing::debug!(%id, "dropped item expired");
            self.remove_thing(id);
        }

        // Physics substep.
        self.space.integrate(dt);
        let contacts = self.space.detect_contacts();

        // Begin-contact callbacks; handlers decide physical validity.
        let mut handlers = std::mem::take(&mut self.handlers);
        for contact in contacts {
            let (cat_a, cat_b) = contact.categories;
            let (key, ordered) = if handlers.contains_key(&(cat_a, cat_b)) {
                ((cat_a, cat_b), contact)
            } else if handlers.contains_key(&(cat_b, cat_a)) {
                (
                    (cat_b, cat_a),
                    Contact {
                        a: contact.b,
                        b: contact.a,
                        categories: (cat_b, cat_a),
                    },
                )
            } else {
                // No handler: the collision is valid by default.
                self.space.separate(contact.a, contact.b);
                continue;
            };

            let valid = match handlers.get_mut(&key) {
                Some(handler) => handler(self, data, ordered),
                None => true,
            };
            if valid {
                self.space.separate(ordered.a, ordered.b);
            }
        }
        // Keep any handlers registered from inside a callback.
        for (key, handler) in handlers {
            self.handlers.entry(key).or_insert(handler);
        }
    }
}
