//! Entity model: kinematics, vitality, combat and dash state
//!
//! Player and bots share this one type; the only difference is the
//! [`Controller`] attached to each instance. Entities never see each other
//! directly, so hit resolution against the roster lives in `combat`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{clamp_to_bounds, resolve_island_collisions};
use super::control::Controller;
use super::map::Map;
use crate::config::EntityTuning;
use crate::consts::{DAMPING_REFERENCE_HZ, VELOCITY_DAMPING};

/// Stable identifier, never reused within a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Emitted when an entity's health reaches zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Death {
    pub victim: EntityId,
    /// `None` for environmental deaths (zone damage)
    pub killer: Option<EntityId>,
    pub pos: Vec2,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,

    // Kinematics
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing (radians)
    pub angle: f32,
    pub speed: f32,
    /// Collision radius
    pub size: f32,

    // Vitality
    pub health: f32,
    pub max_health: f32,
    pub is_alive: bool,

    // Combat
    pub attack_cooldown: f32,
    pub attack_cooldown_duration: f32,
    pub attack_damage: f32,
    pub weapon_range: f32,
    /// Visual swing flag, cleared by a deferred timer
    pub is_attacking: bool,

    // Dash
    pub can_dash: bool,
    pub dash_cooldown: f32,
    pub dash_cooldown_duration: f32,
    pub is_dashing: bool,
    pub dash_timer: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,

    pub kills: u32,
    /// Seconds since death (drives corpse removal)
    pub death_timer: f32,

    pub controller: Controller,
}

impl Entity {
    pub fn new(id: EntityId, name: &str, pos: Vec2, size: f32, tuning: &EntityTuning) -> Self {
        Self {
            id,
            name: name.to_string(),
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            speed: tuning.speed,
            size,
            health: tuning.max_health,
            max_health: tuning.max_health,
            is_alive: true,
            attack_cooldown: 0.0,
            attack_cooldown_duration: tuning.attack_cooldown,
            attack_damage: tuning.attack_damage,
            weapon_range: tuning.weapon_range,
            is_attacking: false,
            can_dash: true,
            dash_cooldown: 0.0,
            dash_cooldown_duration: tuning.dash_cooldown,
            is_dashing: false,
            dash_timer: 0.0,
            dash_speed: tuning.dash_speed,
            dash_duration: tuning.dash_duration,
            kills: 0,
            death_timer: 0.0,
            controller: Controller::Player,
        }
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = controller;
        self
    }

    pub fn is_player(&self) -> bool {
        matches!(self.controller, Controller::Player)
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    /// Steer at full speed along `dir`. Ignored while dashing; a zero
    /// direction leaves velocity to friction.
    pub fn move_dir(&mut self, dir: Vec2) {
        if self.is_dashing {
            return;
        }
        let dir = dir.normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        self.vel = dir * self.speed;
    }

    /// Burst along `dir`. Returns whether the dash started.
    pub fn dash(&mut self, dir: Vec2) -> bool {
        if !self.can_dash || self.is_dashing {
            return false;
        }
        self.is_dashing = true;
        self.dash_timer = self.dash_duration;
        self.dash_cooldown = self.dash_cooldown_duration;
        self.can_dash = false;
        self.vel = dir.normalize_or_zero() * self.dash_speed;
        true
    }

    /// Start a swing toward `target`: arms the cooldown, raises the swing
    /// flag and turns to face the target. Returns false on cooldown or while
    /// dashing. Hit resolution against other entities is `combat::attack`.
    pub fn begin_attack(&mut self, target: Vec2) -> bool {
        if self.attack_cooldown > 0.0 || self.is_dashing {
            return false;
        }
        self.is_attacking = true;
        self.attack_cooldown = self.attack_cooldown_duration;
        self.angle = crate::angle_between(self.pos, target);
        true
    }

    pub fn take_damage(&mut self, amount: f32, attacker: Option<EntityId>) -> Option<Death> {
        if !self.is_alive {
            return None;
        }
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        if self.health <= 0.0 {
            return Some(self.die(attacker));
        }
        None
    }

    fn die(&mut self, killer: Option<EntityId>) -> Death {
        self.health = 0.0;
        self.is_alive = false;
        self.vel = Vec2::ZERO;
        self.is_dashing = false;
        Death {
            victim: self.id,
            killer,
            pos: self.pos,
        }
    }

    /// Per-tick physics: timers, integration, friction, bounds and islands
    pub fn update(&mut self, dt: f32, map: &Map) {
        if !self.is_alive {
            return;
        }

        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);

        if self.dash_cooldown > 0.0 {
            self.dash_cooldown -= dt;
            if self.dash_cooldown <= 0.0 {
                self.dash_cooldown = 0.0;
                self.can_dash = true;
            }
        }

        if self.is_dashing {
            self.dash_timer -= dt;
            if self.dash_timer <= 0.0 {
                self.dash_timer = 0.0;
                self.is_dashing = false;
            }
        }

        self.pos += self.vel * dt;

        // Dash velocity holds for the whole burst
        if !self.is_dashing {
            self.vel *= VELOCITY_DAMPING.powf(dt * DAMPING_REFERENCE_HZ);
        }

        self.pos = clamp_to_bounds(self.pos, self.size, map.width, map.height);
        resolve_island_collisions(&mut self.pos, self.size, &map.islands);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::island::Island;
    use proptest::prelude::*;

    fn open_map() -> Map {
        Map {
            width: 3000.0,
            height: 3000.0,
            islands: Vec::new(),
        }
    }

    fn dummy(pos: Vec2) -> Entity {
        Entity::new(EntityId(1), "Dummy", pos, 25.0, &EntityTuning::default())
    }

    #[test]
    fn test_move_sets_velocity() {
        let mut e = dummy(Vec2::new(500.0, 500.0));
        e.move_dir(Vec2::new(3.0, 4.0));
        assert!((e.vel - Vec2::new(90.0, 120.0)).length() < 1e-3);
    }

    #[test]
    fn test_zero_move_leaves_friction_to_stop() {
        let mut e = dummy(Vec2::new(500.0, 500.0));
        e.move_dir(Vec2::X);
        e.move_dir(Vec2::ZERO);
        assert_eq!(e.vel, Vec2::new(150.0, 0.0));
        e.update(1.0 / 60.0, &open_map());
        assert!((e.vel.x - 135.0).abs() < 1e-2);
    }

    #[test]
    fn test_damping_is_frame_rate_independent() {
        let map = open_map();
        let mut a = dummy(Vec2::new(500.0, 500.0));
        let mut b = dummy(Vec2::new(500.0, 500.0));
        a.move_dir(Vec2::X);
        b.move_dir(Vec2::X);
        a.update(1.0 / 30.0, &map);
        b.update(1.0 / 60.0, &map);
        b.update(1.0 / 60.0, &map);
        assert!((a.vel.x - b.vel.x).abs() < 1e-2);
    }

    #[test]
    fn test_dash_blocks_movement_and_cooldown() {
        let map = open_map();
        let mut e = dummy(Vec2::new(500.0, 500.0));
        assert!(e.dash(Vec2::X));
        assert!(e.is_dashing && !e.can_dash);
        assert_eq!(e.vel, Vec2::new(500.0, 0.0));

        e.move_dir(Vec2::Y);
        assert_eq!(e.vel, Vec2::new(500.0, 0.0));
        assert!(!e.dash(Vec2::Y));

        // 0.2s dash at 0.125s steps: still dashing after one step
        e.update(0.125, &map);
        assert!(e.is_dashing);
        assert_eq!(e.vel, Vec2::new(500.0, 0.0));
        e.update(0.125, &map);
        assert!(!e.is_dashing);
        assert!(!e.can_dash);
    }

    #[test]
    fn test_dash_cooldown_rearms_exactly() {
        let map = open_map();
        let mut e = dummy(Vec2::new(500.0, 500.0));
        e.dash(Vec2::X);
        // 3s cooldown = 24 steps of 0.125
        for _ in 0..23 {
            e.update(0.125, &map);
            assert!(!e.can_dash);
        }
        e.update(0.125, &map);
        assert!(e.can_dash);
        assert_eq!(e.dash_cooldown, 0.0);
    }

    #[test]
    fn test_attack_cooldown() {
        let map = open_map();
        let mut e = dummy(Vec2::new(500.0, 500.0));
        assert!(e.begin_attack(Vec2::new(600.0, 500.0)));
        assert!(e.is_attacking);
        assert_eq!(e.angle, 0.0);
        // 0.5s cooldown = 4 steps of 0.125
        for _ in 0..3 {
            e.update(0.125, &map);
            assert!(!e.begin_attack(Vec2::ZERO));
        }
        e.update(0.125, &map);
        assert!(e.begin_attack(Vec2::ZERO));
    }

    #[test]
    fn test_no_attack_while_dashing() {
        let mut e = dummy(Vec2::new(500.0, 500.0));
        e.dash(Vec2::X);
        assert!(!e.begin_attack(Vec2::ZERO));
        assert!(!e.is_attacking);
    }

    #[test]
    fn test_take_damage_and_death() {
        let mut e = dummy(Vec2::new(10.0, 20.0));
        assert!(e.take_damage(30.0, Some(EntityId(9))).is_none());
        assert_eq!(e.health, 70.0);

        let death = e.take_damage(500.0, Some(EntityId(9))).expect("lethal");
        assert_eq!(death.killer, Some(EntityId(9)));
        assert_eq!(death.victim, EntityId(1));
        assert_eq!(e.health, 0.0);
        assert!(!e.is_alive);
        assert_eq!(e.vel, Vec2::ZERO);

        // Terminal: no second death, no resurrection
        assert!(e.take_damage(10.0, None).is_none());
        assert!(!e.is_alive);
    }

    #[test]
    fn test_bounds_clamp() {
        let mut e = dummy(Vec2::new(30.0, 30.0));
        e.vel = Vec2::new(-600.0, -600.0);
        e.update(0.1, &open_map());
        assert_eq!(e.pos, Vec2::new(25.0, 25.0));
    }

    #[test]
    fn test_island_pushes_entity_out() {
        let map = Map {
            width: 3000.0,
            height: 3000.0,
            islands: vec![Island::new(1000.0, 1000.0, 100.0)],
        };
        let mut e = dummy(Vec2::new(1110.0, 1000.0));
        e.update(0.0, &map);
        assert!((e.pos.x - 1125.0).abs() < 1e-3);
    }

    #[test]
    fn test_dead_entities_do_not_move() {
        let mut e = dummy(Vec2::new(500.0, 500.0));
        e.take_damage(1000.0, None);
        e.vel = Vec2::new(100.0, 0.0);
        e.update(1.0, &open_map());
        assert_eq!(e.pos, Vec2::new(500.0, 500.0));
    }

    proptest! {
        #[test]
        fn health_stays_in_bounds(hits in prop::collection::vec(-50.0f32..80.0, 1..40)) {
            let mut e = dummy(Vec2::new(500.0, 500.0));
            let mut was_dead = false;
            for amount in hits {
                e.take_damage(amount, None);
                prop_assert!(e.health >= 0.0 && e.health <= e.max_health);
                prop_assert_eq!(e.is_alive, e.health > 0.0);
                if was_dead {
                    prop_assert!(!e.is_alive);
                }
                was_dead = !e.is_alive;
            }
        }
    }
}
