//! Mobs and their periodic impulse-driven wandering.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use sandcraft_core::{ItemKey, Loot};
use serde::{Deserialize, Serialize};

/// Species shipped with the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobSpecies {
    /// A small flyer that flits about constantly.
    Bird,
    /// A docile grazer that ambles every so often.
    Sheep,
    /// An aggressive swarmer with a fast impulse cadence.
    Bee,
}

impl MobSpecies {
    /// Canonical lowercase key for logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            MobSpecies::Bird => "bird",
            MobSpecies::Sheep => "sheep",
            MobSpecies::Bee => "bee",
        }
    }

    /// Steps between self-propulsion impulses.
    pub fn step_interval(self) -> u32 {
        match self {
            MobSpecies::Sheep => 100,
            MobSpecies::Bird | MobSpecies::Bee => 20,
        }
    }

    /// Upward bias subtracted from each impulse to fight gravity.
    pub fn lift(self) -> f32 {
        match self {
            MobSpecies::Bird => 300.0,
            MobSpecies::Sheep => 100.0,
            MobSpecies::Bee => 200.0,
        }
    }

    /// Horizontal stretch applied to the impulse's x component.
    pub fn x_stretch(self) -> f32 {
        match self {
            MobSpecies::Bird => 1.0,
            MobSpecies::Sheep => 2.0,
            MobSpecies::Bee => 1.5,
        }
    }

    /// Impulse magnitude at full health.
    pub fn tempo(self) -> f32 {
        match self {
            MobSpecies::Bird => 150.0,
            MobSpecies::Sheep => 40.0,
            MobSpecies::Bee => 80.0,
        }
    }

    /// Body extents in pixels.
    pub fn size(self) -> Vec2 {
        match self {
            MobSpecies::Bird => Vec2::new(12.0, 12.0),
            MobSpecies::Sheep => Vec2::new(60.0, 30.0),
            MobSpecies::Bee => Vec2::new(5.0, 5.0),
        }
    }

    /// Starting and maximum health.
    pub fn max_health(self) -> f32 {
        match self {
            MobSpecies::Bird | MobSpecies::Sheep => 20.0,
            MobSpecies::Bee => 5.0,
        }
    }

    /// Loot dispatched at the mob's position when it dies.
    pub fn drops(self) -> Vec<Loot> {
        match self {
            MobSpecies::Sheep => vec![Loot::Item(ItemKey::simple("wool"))],
            MobSpecies::Bird | MobSpecies::Bee => Vec::new(),
        }
    }
}

/// A mob instance. Position and velocity live on its physics body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mob {
    species: MobSpecies,
    health: f32,
    max_health: f32,
    tempo: f32,
    steps: u32,
    dead: bool,
}

impl Mob {
    /// Create a mob of the given species at full health.
    pub fn new(species: MobSpecies) -> Self {
        Self {
            species,
            health: species.max_health(),
            max_health: species.max_health(),
            tempo: species.tempo(),
            steps: 0,
            dead: false,
        }
    }

    /// The mob's species.
    pub fn species(&self) -> MobSpecies {
        self.species
    }

    /// Current health.
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Health ceiling.
    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Fraction of health remaining in [0, 1].
    pub fn health_fraction(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Take damage. Returns true when this kills the mob.
    pub fn damage(&mut self, amount: f32) -> bool {
        self.health -= amount;
        if self.health <= 0.0 && !self.dead {
            self.dead = true;
            return true;
        }
        false
    }

    /// Whether the mob is marked for removal.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Advance the mob's step counter and, every
    /// [`MobSpecies::step_interval`] steps, draw a wander impulse.
    ///
    /// The impulse is a polar draw: magnitude `tempo * health fraction`,
    /// uniformly random angle in [0, 2pi), horizontally stretched per
    /// species, minus the species lift so the mob stays airborne against
    /// gravity. Returned as a velocity delta for the mob's body.
    pub fn step_impulse(&mut self, rng: &mut StdRng) -> Option<Vec2> {
        let due = self.steps % self.species.step_interval() == 0;
        self.steps = self.steps.wrapping_add(1);
        if !due || self.dead {
            return None;
        }

        let magnitude = self.tempo * self.health_fraction();
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let dx = angle.cos() * magnitude * self.species.x_stretch();
        let dy = angle.sin() * magnitude;
        Some(Vec2::new(dx, dy - self.species.lift()))
    }
}
