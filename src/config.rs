//! Game configuration
//!
//! World size, roster, zone schedule and per-entity tuning. Defaults match the
//! shipped balance; a JSON override may be stored in LocalStorage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("zone min radius {min} exceeds start radius {start}")]
    ZoneRadii { min: f32, start: f32 },
    #[error("island radius range {min}..{max} is empty")]
    IslandRadii { min: f32, max: f32 },
}

/// Stats every entity is created with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityTuning {
    pub speed: f32,
    /// Collision radius for bots
    pub size: f32,
    /// Collision radius for the player
    pub player_size: f32,
    pub max_health: f32,
    pub attack_cooldown: f32,
    pub attack_damage: f32,
    pub weapon_range: f32,
    pub dash_cooldown: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
}

impl Default for EntityTuning {
    fn default() -> Self {
        Self {
            speed: 150.0,
            size: 25.0,
            player_size: 28.0,
            max_health: 100.0,
            attack_cooldown: 0.5,
            attack_damage: 20.0,
            weapon_range: 40.0,
            dash_cooldown: 3.0,
            dash_speed: 500.0,
            dash_duration: 0.2,
        }
    }
}

/// Whole-match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === World ===
    pub map_width: f32,
    pub map_height: f32,
    pub num_islands: u32,
    pub island_min_radius: f32,
    pub island_max_radius: f32,
    /// Clearance between an island's rim and the world edge
    pub island_edge_margin: f32,
    /// Clearance between two island rims
    pub island_spacing: f32,

    // === Roster ===
    pub num_bots: u32,

    // === Safe zone ===
    pub zone_start_radius: f32,
    pub zone_shrink_interval: f32,
    pub zone_shrink_amount: f32,
    pub zone_min_radius: f32,
    pub zone_damage_per_second: f32,

    pub entity: EntityTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: 3000.0,
            map_height: 3000.0,
            num_islands: 8,
            island_min_radius: 100.0,
            island_max_radius: 250.0,
            island_edge_margin: 300.0,
            island_spacing: 100.0,

            num_bots: 15,

            zone_start_radius: 1200.0,
            zone_shrink_interval: 30.0,
            zone_shrink_amount: 150.0,
            zone_min_radius: 300.0,
            zone_damage_per_second: 5.0,

            entity: EntityTuning::default(),
        }
    }
}

impl GameConfig {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pirate_config";

    /// Parse and validate a JSON override (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("map_width", self.map_width),
            ("map_height", self.map_height),
            ("zone_shrink_interval", self.zone_shrink_interval),
            ("zone_start_radius", self.zone_start_radius),
            ("entity.size", self.entity.size),
            ("entity.player_size", self.entity.player_size),
            ("entity.max_health", self.entity.max_health),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.zone_min_radius > self.zone_start_radius {
            return Err(ConfigError::ZoneRadii {
                min: self.zone_min_radius,
                start: self.zone_start_radius,
            });
        }
        if self.island_min_radius > self.island_max_radius {
            return Err(ConfigError::IslandRadii {
                min: self.island_min_radius,
                max: self.island_max_radius,
            });
        }
        Ok(())
    }

    /// Load a config override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config override from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {e}"),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{"num_bots": 3, "entity": {"speed": 200.0}}"#)
            .expect("valid override");
        assert_eq!(config.num_bots, 3);
        assert_eq!(config.entity.speed, 200.0);
        assert_eq!(config.entity.size, 25.0);
        assert_eq!(config.map_width, 3000.0);
    }

    #[test]
    fn test_rejects_inverted_zone_radii() {
        let err = GameConfig::from_json(r#"{"zone_start_radius": 100.0, "zone_min_radius": 300.0}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZoneRadii { .. }));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = GameConfig::from_json(r#"{"zone_shrink_interval": 0.0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive { field: "zone_shrink_interval", .. }
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
