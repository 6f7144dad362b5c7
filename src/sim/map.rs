//! Procedural archipelago generation
//!
//! Islands are placed by rejection sampling: a large island anchors the map
//! center, then random candidates are kept only if they clear every existing
//! island by `island_spacing` and stay `island_edge_margin` away from the
//! world edge. The attempt budget is bounded, so a cramped config yields fewer
//! islands rather than an error.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::island::Island;
use super::rng::GameRng;
use crate::config::GameConfig;

/// Candidate draws allowed per requested island
const ATTEMPTS_PER_ISLAND: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    pub width: f32,
    pub height: f32,
    pub islands: Vec<Island>,
}

impl Map {
    /// Generate a fresh archipelago for `config`
    pub fn generate(config: &GameConfig, rng: &mut GameRng) -> Self {
        let mut map = Self {
            width: config.map_width,
            height: config.map_height,
            islands: Vec::new(),
        };
        let requested = config.num_islands as usize;
        if requested == 0 {
            return map;
        }

        let margin = config.island_edge_margin;
        let spacing = config.island_spacing;

        let anchor = Island::new(
            map.width / 2.0,
            map.height / 2.0,
            config.island_max_radius,
        );
        if map.within_margin(&anchor, margin) {
            map.islands.push(anchor);
        }

        let max_attempts = config.num_islands * ATTEMPTS_PER_ISLAND;
        let mut attempts = 0;
        while map.islands.len() < requested && attempts < max_attempts {
            attempts += 1;

            let radius = rng.range(config.island_min_radius, config.island_max_radius);
            let (x_lo, x_hi) = (margin + radius, map.width - margin - radius);
            let (y_lo, y_hi) = (margin + radius, map.height - margin - radius);
            if x_lo > x_hi || y_lo > y_hi {
                continue;
            }
            let candidate = Island::new(rng.range(x_lo, x_hi), rng.range(y_lo, y_hi), radius);

            let crowded = map
                .islands
                .iter()
                .any(|island| island.clearance(&candidate) < spacing);
            if !crowded {
                map.islands.push(candidate);
            }
        }

        if map.islands.len() < requested {
            log::warn!(
                "Generated {} of {} islands after {} attempts",
                map.islands.len(),
                requested,
                attempts
            );
        } else {
            log::info!("Generated {} islands", map.islands.len());
        }
        map
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    fn within_margin(&self, island: &Island, margin: f32) -> bool {
        island.center.x - island.radius >= margin
            && island.center.x + island.radius <= self.width - margin
            && island.center.y - island.radius >= margin
            && island.center.y + island.radius <= self.height - margin
    }

    pub fn nearest_island(&self, p: Vec2) -> Option<&Island> {
        self.islands.iter().min_by(|a, b| {
            a.center
                .distance(p)
                .partial_cmp(&b.center.distance(p))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    pub fn is_on_island(&self, p: Vec2) -> bool {
        self.islands.iter().any(|island| island.contains_point(p))
    }

    /// A point inside a random island's interior, or anywhere in bounds when
    /// the map has no islands
    pub fn random_island_point(&self, rng: &mut GameRng, interior: f32) -> Vec2 {
        match rng.choose(&self.islands) {
            Some(island) => rng.point_around(island.center, island.radius * interior),
            None => Vec2::new(rng.range(0.0, self.width), rng.range(0.0, self.height)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_placement(map: &Map, config: &GameConfig) {
        for (i, a) in map.islands.iter().enumerate() {
            assert!(map.within_margin(a, config.island_edge_margin), "island {i} breaks edge margin");
            for b in &map.islands[i + 1..] {
                assert!(a.clearance(b) >= config.island_spacing - 1e-3);
            }
        }
    }

    #[test]
    fn test_default_generation() {
        let config = GameConfig::default();
        let mut rng = GameRng::new(12345);
        let map = Map::generate(&config, &mut rng);

        assert!(!map.islands.is_empty());
        assert!(map.islands.len() <= config.num_islands as usize);
        // Anchor island sits at the map center
        assert_eq!(map.islands[0].center, map.center());
        assert_placement(&map, &config);
    }

    #[test]
    fn test_cramped_map_degrades() {
        let config = GameConfig {
            map_width: 700.0,
            map_height: 700.0,
            num_islands: 20,
            ..GameConfig::default()
        };
        let mut rng = GameRng::new(1);
        let map = Map::generate(&config, &mut rng);
        assert!(map.islands.len() < 20);
        assert_placement(&map, &config);
    }

    #[test]
    fn test_map_too_small_for_anything() {
        let config = GameConfig {
            map_width: 200.0,
            map_height: 200.0,
            ..GameConfig::default()
        };
        let mut rng = GameRng::new(1);
        let map = Map::generate(&config, &mut rng);
        assert!(map.islands.is_empty());
        // Spawning still works without islands
        let p = map.random_island_point(&mut rng, 0.7);
        assert!(p.x >= 0.0 && p.x <= 200.0 && p.y >= 0.0 && p.y <= 200.0);
    }

    #[test]
    fn test_queries() {
        let map = Map {
            width: 1000.0,
            height: 1000.0,
            islands: vec![Island::new(200.0, 200.0, 50.0), Island::new(800.0, 800.0, 100.0)],
        };
        assert!(map.is_on_island(Vec2::new(210.0, 200.0)));
        assert!(!map.is_on_island(Vec2::new(500.0, 500.0)));
        let nearest = map.nearest_island(Vec2::new(700.0, 700.0)).expect("islands exist");
        assert_eq!(nearest.radius, 100.0);
    }

    proptest! {
        #[test]
        fn placement_constraints_hold(seed in any::<u64>(), count in 0u32..16) {
            let config = GameConfig { num_islands: count, ..GameConfig::default() };
            let mut rng = GameRng::new(seed);
            let map = Map::generate(&config, &mut rng);
            prop_assert!(map.islands.len() <= count as usize);
            for (i, a) in map.islands.iter().enumerate() {
                prop_assert!(map.within_margin(a, config.island_edge_margin));
                for b in &map.islands[i + 1..] {
                    prop_assert!(a.clearance(b) >= config.island_spacing - 1e-3);
                }
            }
        }
    }
}
