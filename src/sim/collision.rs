//! Collision detection and response against islands and the world edge
//!
//! Entities are circles. Islands are solid circles that push entities radially
//! outward by the penetration depth. Each island is resolved on its own in
//! list order; there is no joint solve, so an entity wedged between two
//! islands may still overlap one of them after the pass.

use glam::Vec2;

use super::island::Island;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the island rim (if hit)
    pub point: Vec2,
    /// Surface normal at the contact, pointing away from the island
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a circle of `radius` at `pos` against `island`
pub fn circle_island_collision(pos: Vec2, radius: f32, island: &Island) -> CollisionResult {
    let offset = pos - island.center;
    let dist = offset.length();
    let min_dist = radius + island.radius;

    if dist >= min_dist {
        return CollisionResult::miss();
    }

    // Dead center has no direction; push along +x
    let normal = offset.try_normalize().unwrap_or(Vec2::X);
    CollisionResult {
        hit: true,
        point: island.center + normal * island.radius,
        normal,
        penetration: min_dist - dist,
    }
}

/// Push `pos` out of every island it overlaps, one island at a time.
/// Returns the number of islands that were hit.
pub fn resolve_island_collisions(pos: &mut Vec2, radius: f32, islands: &[Island]) -> usize {
    let mut hits = 0;
    for island in islands {
        let result = circle_island_collision(*pos, radius, island);
        if result.hit {
            *pos += result.normal * result.penetration;
            hits += 1;
        }
    }
    hits
}

/// Keep a circle fully inside the `width` x `height` world
pub fn clamp_to_bounds(pos: Vec2, radius: f32, width: f32, height: f32) -> Vec2 {
    let min = Vec2::splat(radius);
    // A world narrower than the circle pins it against the low edge
    let max = Vec2::new(width - radius, height - radius).max(min);
    pos.clamp(min, max)
}
