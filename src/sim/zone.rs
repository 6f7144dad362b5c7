//! Shrinking safe zone
//!
//! The zone is a circle fixed on the map center. Every `shrink_interval`
//! seconds of simulated time it loses `shrink_amount` of radius, never going
//! below `min_radius`. Anything alive outside it bleeds health continuously.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Death, Entity};
use crate::config::GameConfig;
use crate::consts::{ZONE_CAUTION_SECS, ZONE_DANGER_SECS, ZONE_WARNING_LEAD};

/// Presentation hint for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    Safe,
    Warning,
    Danger,
}

/// Things the zone reports from `update`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneEvent {
    /// Fired once per cycle, `ZONE_WARNING_LEAD` seconds before the shrink
    Warning,
    Shrunk { radius: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeZone {
    pub center: Vec2,
    pub radius: f32,
    pub shrink_interval: f32,
    pub shrink_amount: f32,
    pub min_radius: f32,
    pub damage_per_second: f32,
    time_since_shrink: f32,
    warning_fired: bool,
}

impl SafeZone {
    pub fn new(
        center: Vec2,
        start_radius: f32,
        shrink_interval: f32,
        shrink_amount: f32,
        min_radius: f32,
    ) -> Self {
        Self {
            center,
            radius: start_radius.max(min_radius),
            shrink_interval,
            shrink_amount,
            min_radius,
            damage_per_second: 5.0,
            time_since_shrink: 0.0,
            warning_fired: false,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let mut zone = Self::new(
            Vec2::new(config.map_width / 2.0, config.map_height / 2.0),
            config.zone_start_radius,
            config.zone_shrink_interval,
            config.zone_shrink_amount,
            config.zone_min_radius,
        );
        zone.damage_per_second = config.zone_damage_per_second;
        zone
    }

    /// Advance the shrink clock by `dt` seconds of simulation time
    pub fn update(&mut self, dt: f32) -> Vec<ZoneEvent> {
        let mut events = Vec::new();
        self.time_since_shrink += dt;

        if self.time_since_shrink >= self.shrink_interval {
            self.time_since_shrink = 0.0;
            self.warning_fired = false;
            if self.shrink() {
                events.push(ZoneEvent::Shrunk {
                    radius: self.radius,
                });
            }
        }

        if !self.warning_fired
            && self.time_since_shrink >= self.shrink_interval - ZONE_WARNING_LEAD
        {
            self.warning_fired = true;
            log::info!("Zone shrinks in {}s", ZONE_WARNING_LEAD);
            events.push(ZoneEvent::Warning);
        }

        events
    }

    /// Returns false once the radius is already at its floor
    fn shrink(&mut self) -> bool {
        if self.radius <= self.min_radius {
            return false;
        }
        self.radius = (self.radius - self.shrink_amount).max(self.min_radius);
        log::info!("Zone shrinking, new radius: {:.0}", self.radius);
        true
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.center.distance(p) < self.radius
    }

    /// Bleed `entity` if it is alive and outside the zone.
    ///
    /// Zone damage has no attacker, so a resulting death carries no kill credit.
    pub fn check_entity(&self, entity: &mut Entity, dt: f32) -> Option<Death> {
        if !entity.is_alive || self.contains(entity.pos) {
            return None;
        }
        entity.take_damage(self.damage_per_second * dt, None)
    }

    /// Whole seconds until the next shrink (rounded up)
    pub fn time_until_shrink(&self) -> f32 {
        (self.shrink_interval - self.time_since_shrink).ceil()
    }

    pub fn status(&self) -> ZoneStatus {
        let left = self.time_until_shrink();
        if left <= ZONE_DANGER_SECS {
            ZoneStatus::Danger
        } else if left <= ZONE_CAUTION_SECS {
            ZoneStatus::Warning
        } else {
            ZoneStatus::Safe
        }
    }
}
