//! Game configuration
//!
//! Arena size, timings and obstacle dimensions. Loaded from JSON; any
//! field left out takes its default.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("arena {width}x{height} is too small for a box of initial width {initial_width}")]
    ArenaTooSmall {
        width: f32,
        height: f32,
        initial_width: f32,
    },
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Timing (seconds) ===
    /// Time between obstacle spawns
    pub spawn_interval: f32,
    /// Time an obstacle group stays in the scene
    pub obstacle_lifetime: f32,
    /// Time a group takes to grow from nothing to full size
    pub obstacle_approach_time: f32,

    // === Player ===
    /// Box size change per unit of pointer travel
    pub drag_gain: f32,

    // === Obstacles ===
    pub wall_width: f32,
    pub wall_height: f32,
    /// Width of the scoring band around the wall
    pub gap_size: f32,

    // === UI ===
    pub restart_button_width: f32,
    pub restart_button_height: f32,
    pub restart_button_center: Vec2,

    // === Persistence ===
    pub high_score_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: 750.0,
            arena_height: 1334.0,

            spawn_interval: SPAWN_INTERVAL,
            obstacle_lifetime: OBSTACLE_LIFETIME,
            obstacle_approach_time: OBSTACLE_APPROACH_TIME,

            drag_gain: DRAG_GAIN,

            wall_width: 300.0,
            wall_height: 500.0,
            gap_size: 40.0,

            restart_button_width: 300.0,
            restart_button_height: 200.0,
            restart_button_center: Vec2::ZERO,

            high_score_key: HIGH_SCORE_KEY.to_string(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a config file, falling back to defaults on any error
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Using default config: {err}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("spawn_interval", self.spawn_interval),
            ("obstacle_lifetime", self.obstacle_lifetime),
            ("obstacle_approach_time", self.obstacle_approach_time),
            ("drag_gain", self.drag_gain),
            ("wall_width", self.wall_width),
            ("wall_height", self.wall_height),
            ("gap_size", self.gap_size),
            ("restart_button_width", self.restart_button_width),
            ("restart_button_height", self.restart_button_height),
        ];
        for (field, value) in positive {
            // NaN fails this too
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        // The clamp range [min, arena - min] must not be empty on either axis
        let min = self.min_box_extent();
        if self.arena_width < 2.0 * min || self.arena_height < 2.0 * min {
            return Err(ConfigError::ArenaTooSmall {
                width: self.arena_width,
                height: self.arena_height,
                initial_width: self.initial_width(),
            });
        }
        Ok(())
    }

    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Starting side length of the (square) player box
    pub fn initial_width(&self) -> f32 {
        (self.arena_width + self.arena_height) * INITIAL_WIDTH_FACTOR
    }

    /// Smallest allowed box width or height
    pub fn min_box_extent(&self) -> f32 {
        self.initial_width() / 4.0
    }

    /// Largest allowed box size per axis
    pub fn max_box_size(&self) -> Vec2 {
        self.arena_size() - Vec2::splat(self.min_box_extent())
    }

    pub fn wall_size(&self) -> Vec2 {
        Vec2::new(self.wall_width, self.wall_height)
    }

    pub fn restart_button_size(&self) -> Vec2 {
        Vec2::new(self.restart_button_width, self.restart_button_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert!((config.initial_width() - 416.8).abs() < 0.01);
        assert!((config.min_box_extent() - 104.2).abs() < 0.01);
        assert_eq!(config.high_score_key, "boxtron_highscore");
        // Walls reach full size while the group is still live
        assert!(config.obstacle_approach_time < config.obstacle_lifetime);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "spawn_interval": 2.5 }"#).unwrap();
        assert_eq!(config.spawn_interval, 2.5);
        assert_eq!(config.obstacle_lifetime, OBSTACLE_LIFETIME);
        assert_eq!(config.arena_width, 750.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = GameConfig::from_json(r#"{ "drag_gain": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { field: "drag_gain", .. }));

        let err = GameConfig::from_json(r#"{ "obstacle_approach_time": -1 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive {
                field: "obstacle_approach_time",
                ..
            }
        ));

        let err =
            GameConfig::from_json(r#"{ "arena_width": 50, "arena_height": 2000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ArenaTooSmall { .. }));

        assert!(matches!(
            GameConfig::from_json("{").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
