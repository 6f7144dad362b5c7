//! Pirate Royale - a battle-royale arena on a procedurally generated archipelago
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, bot AI, safe zone)
//! - `game`: Orchestrator driving the simulation on a fixed step
//! - `config`: Data-driven world and entity tuning
//! - `identity`: Local user identity and per-game stats
//! - `platform`: Browser/native adapters (input, camera, storage, time)

pub mod config;
pub mod game;
pub mod identity;
pub mod platform;
pub mod sim;

pub use config::{EntityTuning, GameConfig};
pub use game::{Game, Phase};
pub use identity::{GameStats, Identity, UserProfile};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Fixed simulation timestep (60 Hz, the cadence the damping is tuned for)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will account for (tab switches, stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Velocity retained per reference frame
    pub const VELOCITY_DAMPING: f32 = 0.9;
    /// Frame rate the damping factor was tuned at
    pub const DAMPING_REFERENCE_HZ: f32 = 60.0;

    /// Half-angle of the melee cone (60°)
    pub const ATTACK_CONE: f32 = PI / 3.0;
    /// How long `is_attacking` stays up after a swing (seconds)
    pub const ATTACK_FLASH_DURATION: f32 = 0.1;

    /// Seconds before a shrink that the zone warning fires
    pub const ZONE_WARNING_LEAD: f32 = 5.0;
    /// Seconds the zone warning stays visible
    pub const ZONE_WARNING_DISPLAY: f32 = 3.0;
    /// Status thresholds (seconds until shrink)
    pub const ZONE_DANGER_SECS: f32 = 5.0;
    pub const ZONE_CAUTION_SECS: f32 = 10.0;

    /// Bot AI cadence and thresholds
    pub const AI_DECISION_INTERVAL: f32 = 0.5;
    pub const AI_ATTACK_DISTANCE: f32 = 100.0;
    pub const AI_ATTACK_AGGRESSION: f32 = 0.6;
    pub const AI_WANDER_ARRIVAL: f32 = 50.0;
    pub const AI_MELEE_BUFFER: f32 = 50.0;
    pub const AI_FLEE_DASH_CHANCE: f32 = 0.1;
    /// Below this distance a bot stops steering toward its goal
    pub const AI_STEER_DEADZONE: f32 = 10.0;
    /// Personality ranges, sampled once per bot
    pub const AI_AGGRESSION_RANGE: (f32, f32) = (0.5, 1.0);
    pub const AI_CAUTION_RANGE: (f32, f32) = (0.3, 0.8);
    pub const AI_AWARENESS_RANGE: (f32, f32) = (200.0, 400.0);

    /// Fraction of an island's radius used for spawn points and waypoints
    pub const ISLAND_INTERIOR: f32 = 0.7;

    /// Loot dropped on death
    pub const COIN_SIZE: f32 = 8.0;
    pub const COIN_VALUE: u32 = 10;
    pub const COIN_DROP_MIN: u32 = 3;
    pub const COIN_DROP_MAX: u32 = 5;
    pub const COIN_SCATTER_MIN: f32 = 30.0;
    pub const COIN_SCATTER_MAX: f32 = 50.0;

    /// Seconds a dead bot lingers before leaving the roster
    pub const BOT_CORPSE_TIME: f32 = 2.0;

    /// Kill feed limits
    pub const KILL_FEED_MAX: usize = 5;
    pub const KILL_FEED_TTL: f32 = 3.0;
    /// Leaderboard size
    pub const LEADERBOARD_SIZE: usize = 5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Angle of the ray from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Strict circle overlap (touching circles do not overlap)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

#[inline]
pub fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance(center) < radius
}

/// Format seconds as `M:SS`
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn test_angle_between() {
        assert!((angle_between(Vec2::ZERO, Vec2::new(1.0, 0.0))).abs() < 1e-6);
        assert!((angle_between(Vec2::ZERO, Vec2::new(0.0, 5.0)) - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.9), "1:05");
        assert_eq!(format_time(600.0), "10:00");
    }

    proptest! {
        #[test]
        fn normalize_angle_lands_in_half_open_range(a in -100.0f32..100.0) {
            let n = normalize_angle(a);
            prop_assert!(n >= -PI && n < PI);
            // Same direction as the input
            prop_assert!((n.cos() - a.cos()).abs() < 1e-3);
            prop_assert!((n.sin() - a.sin()).abs() < 1e-3);
        }
    }
}
