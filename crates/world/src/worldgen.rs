//! Fixed world layout, loaded from the world's seeded random stream.
//!
//! Ground fill follows a fixed silhouette: a flat plain on the left and a
//! rising slope on the right, with a weighted dirt/stone mix, a tree, one
//! trick-candle block, and the three starting mobs.

use crate::block::create_block;
use crate::mob::{Mob, MobSpecies};
use crate::world::World;
use rand::Rng;
use sandcraft_core::{BlockKey, RegistryError};

/// Relative weights for ground fill: (weight, block kind).
const GROUND_WEIGHTS: [(u32, &str); 2] = [(100, "dirt"), (30, "stone")];

/// Populate `world` with the fixed starting layout.
pub fn load_fixed_world(world: &mut World) -> Result<(), RegistryError> {
    let (width, height) = world.grid_size();

    let mut ground = Vec::new();
    for x in 0..width as i32 {
        for y in 0..height as i32 {
            if x < 22 {
                if y <= 8 {
                    continue;
                }
            } else if x + y < 30 {
                continue;
            }
            ground.push((x, y));
        }
    }

    let total_weight: u32 = GROUND_WEIGHTS.iter().map(|(weight, _)| weight).sum();
    for cell in ground {
        let mut roll = world.rng_mut().gen_range(0..total_weight);
        let mut kind = GROUND_WEIGHTS[0].1;
        for (weight, candidate) in GROUND_WEIGHTS {
            if roll < weight {
                kind = candidate;
                break;
            }
            roll -= weight;
        }
        let block = create_block(&BlockKey::new(kind))?;
        let _ = world.add_block_to_grid(block, cell);
    }

    // One tree: a trunk with a 3x3 canopy.
    for trunk in [(3, 8), (3, 7), (3, 6), (3, 5)] {
        let _ = world.add_block_to_grid(create_block(&BlockKey::new("wood"))?, trunk);
    }
    for x in 2..=4 {
        for y in 2..=4 {
            let _ = world.add_block_to_grid(create_block(&BlockKey::new("leaf"))?, (x, y));
        }
    }

    let _ = world.add_block_to_grid(create_block(&BlockKey::with_generation("mayhem", 0))?, (14, 8));

    world.add_mob(Mob::new(MobSpecies::Bird), 400.0, 100.0);
    world.add_mob(Mob::new(MobSpecies::Sheep), 400.0, 100.0);
    world.add_mob(Mob::new(MobSpecies::Bee), 400.0, 100.0);

    Ok(())
}
