//! The physics space: body storage, integration, and contact detection.

use crate::body::{Aabb, Body, BodyId, Category, Motion};
use glam::Vec2;
use std::collections::{BTreeMap, HashSet};

/// Per-step velocity damping applied to dynamic bodies.
pub const AIR_RESISTANCE: f32 = 0.98;

/// A newly-touching pair of dynamic bodies reported by
/// [`Space::detect_contacts`]. `a` always has the lower body id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// First body of the pair.
    pub a: BodyId,
    /// Second body of the pair.
    pub b: BodyId,
    /// Categories of `a` and `b`, in the same order.
    pub categories: (Category, Category),
}

/// Owns all physical bodies and advances them under gravity.
///
/// A full step is: [`Space::integrate`], then [`Space::detect_contacts`],
/// then [`Space::separate`] for every contact the caller judged
/// physically valid. The split lets collision callbacks veto the physical
/// response of individual pairs (an invalid pair passes through).
pub struct Space {
    gravity: Vec2,
    bodies: BTreeMap<u64, Body>,
    next_id: u64,
    touching: HashSet<(u64, u64)>,
}

impl Space {
    /// Create an empty space with the given gravity acceleration
    /// (pixels per second squared; +y is down).
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: BTreeMap::new(),
            next_id: 1,
            touching: HashSet::new(),
        }
    }

    /// Add a body, returning its handle.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        self.bodies.insert(id, body);
        BodyId(id)
    }

    /// Remove a body, returning it if present. Any touching pairs
    /// involving the body are forgotten.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        self.touching.retain(|&(a, b)| a != id.0 && b != id.0);
        self.bodies.remove(&id.0)
    }

    /// Remove every body and forget all touching pairs.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.touching.clear();
    }

    /// Shared access to a body.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id.0)
    }

    /// Mutable access to a body.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(&id.0)
    }

    /// Iterate all bodies in id order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().map(|(&id, body)| (BodyId(id), body))
    }

    /// Number of bodies in the space.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the space holds no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Set a body's velocity. Unknown ids are ignored.
    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id.0) {
            body.velocity = velocity;
        }
    }

    /// The first body (in id order) whose AABB contains `point`.
    pub fn body_at_point(&self, point: Vec2) -> Option<BodyId> {
        self.body_at_point_where(point, |_| true)
    }

    /// The first body (in id order) containing `point` and satisfying the
    /// predicate.
    pub fn body_at_point_where(
        &self,
        point: Vec2,
        predicate: impl Fn(&Body) -> bool,
    ) -> Option<BodyId> {
        self.bodies
            .iter()
            .find(|(_, body)| body.aabb().contains(point) && predicate(body))
            .map(|(&id, _)| BodyId(id))
    }

    /// Integrate all dynamic bodies over `dt` seconds: apply gravity and
    /// damping, advance positions, then resolve penetration against
    /// static bodies by minimal-axis separation (zeroing the velocity
    /// component along the resolved axis, so bodies rest on floors).
    pub fn integrate(&mut self, dt: f32) {
        let statics: Vec<Aabb> = self
            .bodies
            .values()
            .filter(|body| !body.is_dynamic())
            .map(Body::aabb)
            .collect();

        for body in self.bodies.values_mut() {
            if !body.is_dynamic() {
                continue;
            }

            body.velocity += self.gravity * body.gravity_scale * dt;
            body.velocity *= AIR_RESISTANCE;
            body.position += body.velocity * dt;

            for fixed in &statics {
                let Some(overlap) = body.aabb().overlap(fixed) else {
                    continue;
                };
                if overlap.x < overlap.y {
                    let sign = if body.position.x < fixed.center().x { -1.0 } else { 1.0 };
                    body.position.x += sign * overlap.x;
                    body.velocity.x = 0.0;
                } else {
                    let sign = if body.position.y < fixed.center().y { -1.0 } else { 1.0 };
                    body.position.y += sign * overlap.y;
                    body.velocity.y = 0.0;
                }
            }
        }
    }

    /// Detect newly-touching dynamic body pairs.
    ///
    /// A pair is reported exactly once per touch: it re-arms only after
    /// the two AABBs separate. Static bodies never appear in contacts
    /// (they are handled during integration).
    pub fn detect_contacts(&mut self) -> Vec<Contact> {
        let dynamics: Vec<(u64, Aabb, Category)> = self
            .bodies
            .iter()
            .filter(|(_, body)| body.is_dynamic())
            .map(|(&id, body)| (id, body.aabb(), body.category))
            .collect();

        let mut now_touching = HashSet::new();
        let mut begins = Vec::new();

        for (i, &(id_a, aabb_a, cat_a)) in dynamics.iter().enumerate() {
            for &(id_b, aabb_b, cat_b) in &dynamics[i + 1..] {
                if !aabb_a.intersects(&aabb_b) {
                    continue;
                }
                let key = (id_a, id_b);
                now_touching.insert(key);
                if !self.touching.contains(&key) {
                    begins.push(Contact {
                        a: BodyId(id_a),
                        b: BodyId(id_b),
                        categories: (cat_a, cat_b),
                    });
                }
            }
        }

        self.touching = now_touching;
        begins
    }

    /// Physically separate a valid colliding pair along the minimal axis.
    ///
    /// Dynamic-dynamic pairs split the correction evenly; if one body is
    /// static only the dynamic one moves. Velocities along the resolved
    /// axis are zeroed on the moved bodies.
    pub fn separate(&mut self, a: BodyId, b: BodyId) {
        let (overlap, a_pos, b_pos, a_dyn, b_dyn) =
            match (self.bodies.get(&a.0), self.bodies.get(&b.0)) {
                (Some(body_a), Some(body_b)) => {
                    match body_a.aabb().overlap(&body_b.aabb()) {
                        Some(overlap) => (
                            overlap,
                            body_a.position,
                            body_b.position,
                            body_a.is_dynamic(),
                            body_b.is_dynamic(),
                        ),
                        None => return,
                    }
                }
                _ => return,
            };

        let along_x = overlap.x < overlap.y;
        let sign = if along_x {
            if a_pos.x < b_pos.x { -1.0 } else { 1.0 }
        } else if a_pos.y < b_pos.y {
            -1.0
        } else {
            1.0
        };
        let amount = if along_x { overlap.x } else { overlap.y };

        let (push_a, push_b) = match (a_dyn, b_dyn) {
            (true, true) => (amount * 0.5, amount * 0.5),
            (true, false) => (amount, 0.0),
            (false, true) => (0.0, amount),
            (false, false) => return,
        };

        if push_a > 0.0 {
            if let Some(body) = self.bodies.get_mut(&a.0) {
                if along_x {
                    body.position.x += sign * push_a;
                    body.velocity.x = 0.0;
                } else {
                    body.position.y += sign * push_a;
                    body.velocity.y = 0.0;
                }
            }
        }
        if push_b > 0.0 {
            if let Some(body) = self.bodies.get_mut(&b.0) {
                if along_x {
                    body.position.x -= sign * push_b;
                    body.velocity.x = 0.0;
                } else {
                    body.position.y -= sign * push_b;
                    body.velocity.y = 0.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;
    const GRAVITY: Vec2 = Vec2::new(0.0, 300.0);

    fn space() -> Space {
        Space::new(GRAVITY)
    }

    #[test]
    fn dynamic_bodies_fall_under_gravity() {
        let mut space = space();
        let id = space.add_body(Body::dynamic(
            Category::Item,
            Vec2::new(100.0, 100.0),
            Vec2::splat(10.0),
        ));

        for _ in 0..30 {
            space.integrate(DT);
        }

        let body = space.body(id).unwrap();
        assert!(body.position.y > 100.0, "body should have fallen");
        assert!(body.velocity.y > 0.0);
        assert_eq!(body.position.x, 100.0);
    }

    #[test]
    fn gravity_scale_zero_floats() {
        let mut space = space();
        let id = space.add_body(Body {
            gravity_scale: 0.0,
            ..Body::dynamic(Category::Mob, Vec2::new(50.0, 50.0), Vec2::splat(8.0))
        });

        for _ in 0..30 {
            space.integrate(DT);
        }

        assert_eq!(space.body(id).unwrap().position.y, 50.0);
    }

    #[test]
    fn bodies_land_on_static_floor() {
        let mut space = space();
        // Floor top edge at y = 100.
        space.add_body(Body::fixed(
            Category::Block,
            Vec2::new(100.0, 116.0),
            Vec2::new(200.0, 32.0),
        ));
        let id = space.add_body(Body::dynamic(
            Category::Player,
            Vec2::new(100.0, 50.0),
            Vec2::new(20.0, 30.0),
        ));

        for _ in 0..300 {
            space.integrate(DT);
        }

        let body = space.body(id).unwrap();
        // Resting with its bottom edge on the floor top.
        assert!((body.position.y - 85.0).abs() < 1.0, "y = {}", body.position.y);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn contact_begins_fire_once_per_touch() {
        let mut space = space();
        let a = space.add_body(Body {
            gravity_scale: 0.0,
            ..Body::dynamic(Category::Player, Vec2::new(0.0, 0.0), Vec2::splat(10.0))
        });
        let b = space.add_body(Body {
            gravity_scale: 0.0,
            ..Body::dynamic(Category::Item, Vec2::new(5.0, 0.0), Vec2::splat(10.0))
        });

        let contacts = space.detect_contacts();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].a, a);
        assert_eq!(contacts[0].b, b);
        assert_eq!(contacts[0].categories, (Category::Player, Category::Item));

        // Still overlapping: no new begin event.
        assert!(space.detect_contacts().is_empty());

        // Separate, then touch again: the pair re-arms.
        space.body_mut(b).unwrap().position.x = 100.0;
        assert!(space.detect_contacts().is_empty());
        space.body_mut(b).unwrap().position.x = 5.0;
        assert_eq!(space.detect_contacts().len(), 1);
    }

    #[test]
    fn separate_pushes_dynamic_pair_apart() {
        let mut space = space();
        let a = space.add_body(Body {
            gravity_scale: 0.0,
            ..Body::dynamic(Category::Player, Vec2::new(0.0, 0.0), Vec2::splat(10.0))
        });
        let b = space.add_body(Body {
            gravity_scale: 0.0,
            ..Body::dynamic(Category::Item, Vec2::new(8.0, 0.0), Vec2::splat(10.0))
        });

        space.separate(a, b);

        let aabb_a = space.body(a).unwrap().aabb();
        let aabb_b = space.body(b).unwrap().aabb();
        assert!(aabb_a.overlap(&aabb_b).is_none());
    }

    #[test]
    fn removing_a_body_forgets_its_touches() {
        let mut space = space();
        let a = space.add_body(Body {
            gravity_scale: 0.0,
            ..Body::dynamic(Category::Player, Vec2::new(0.0, 0.0), Vec2::splat(10.0))
        });
        let b = space.add_body(Body {
            gravity_scale: 0.0,
            ..Body::dynamic(Category::Item, Vec2::new(5.0, 0.0), Vec2::splat(10.0))
        });

        assert_eq!(space.detect_contacts().len(), 1);
        space.remove_body(b);

        // A new item at the same spot is a fresh pair.
        let c = space.add_body(Body {
            gravity_scale: 0.0,
            ..Body::dynamic(Category::Item, Vec2::new(5.0, 0.0), Vec2::splat(10.0))
        });
        let contacts = space.detect_contacts();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].b, c);
        assert_eq!(space.body(a).unwrap().category, Category::Player);
    }

    #[test]
    fn point_queries_respect_predicates() {
        let mut space = space();
        space.add_body(Body::fixed(
            Category::Block,
            Vec2::new(16.0, 16.0),
            Vec2::splat(32.0),
        ));
        let item = space.add_body(Body::dynamic(
            Category::Item,
            Vec2::new(16.0, 16.0),
            Vec2::splat(10.0),
        ));

        let found = space
            .body_at_point_where(Vec2::new(16.0, 16.0), |body| body.category == Category::Item);
        assert_eq!(found, Some(item));
        assert!(space.body_at_point(Vec2::new(200.0, 200.0)).is_none());
    }
}
