//! Bodies and their axis-aligned bounding boxes.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (left, top).
    pub min: Vec2,
    /// Maximum corner (right, bottom).
    pub max: Vec2,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y);
        Self { min, max }
    }

    /// AABB from a center point and half extents.
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self::new(center - half, center + half)
    }

    /// Tests intersection with another AABB.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Tests whether a point lies inside (inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Overlap depth per axis with another AABB, or `None` when disjoint.
    pub fn overlap(&self, other: &Self) -> Option<Vec2> {
        let x = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let y = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        (x > 0.0 && y > 0.0).then_some(Vec2::new(x, y))
    }

    /// Center point.
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Collision category of a body, used to route contact callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// The player's body.
    Player,
    /// A block occupying a grid cell.
    Block,
    /// A mob.
    Mob,
    /// A dropped item lying in the world.
    Item,
    /// A boundary wall enclosing the world.
    Wall,
}

/// Whether a body moves under integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    /// Never moves; other bodies collide against it.
    Static,
    /// Integrated under gravity and velocity each step.
    Dynamic,
}

/// Handle to a body owned by a [`crate::Space`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// A physical body: a category, an AABB shape, and linear motion state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Collision category.
    pub category: Category,
    /// Static or dynamic.
    pub motion: Motion,
    /// Center position in pixels.
    pub position: Vec2,
    /// Half extents of the AABB shape.
    pub half: Vec2,
    /// Linear velocity in pixels per second.
    pub velocity: Vec2,
    /// Multiplier on global gravity (0 disables gravity for this body).
    pub gravity_scale: f32,
}

impl Body {
    /// A dynamic body of the given category, centered at `position` with
    /// full extents `size`.
    pub fn dynamic(category: Category, position: Vec2, size: Vec2) -> Self {
        Self {
            category,
            motion: Motion::Dynamic,
            position,
            half: size * 0.5,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
        }
    }

    /// A static body of the given category.
    pub fn fixed(category: Category, position: Vec2, size: Vec2) -> Self {
        Self {
            category,
            motion: Motion::Static,
            position,
            half: size * 0.5,
            velocity: Vec2::ZERO,
            gravity_scale: 0.0,
        }
    }

    /// Current bounding box.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.half)
    }

    /// Whether the body is dynamic.
    pub fn is_dynamic(&self) -> bool {
        self.motion == Motion::Dynamic
    }
}
