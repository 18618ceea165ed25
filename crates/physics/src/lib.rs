#![warn(missing_docs)]
//! 2D physics primitives: AABB bodies, gravity integration, and
//! begin-contact detection.
//!
//! Coordinates are screen-style pixels: +y points down, so gravity is a
//! positive-y acceleration.

mod body;
mod space;

pub use body::{Aabb, Body, BodyId, Category, Motion};
pub use space::{Contact, Space, AIR_RESISTANCE};

use glam::Vec2;

/// Whether two positions lie within `max_distance` of each other.
///
/// Used for reach checks (player to mining target).
pub fn positions_in_range(a: Vec2, b: Vec2, max_distance: f32) -> bool {
    a.distance_squared(b) <= max_distance * max_distance
}
