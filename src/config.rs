//! Road, vehicle and obstacle constants
//!
//! Defaults match the shipped game. A JSON file can override any subset of
//! fields at startup; there is no runtime reconfiguration.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ROAD_MARGIN;

/// Static game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Viewport ===
    pub width: f32,
    pub height: f32,

    // === Road ===
    pub road_width: f32,
    pub marker_width: f32,
    pub marker_height: f32,

    // === Cars ===
    pub car_width: f32,
    pub car_height: f32,
    pub max_speed: f32,
    /// Speed gained per tick while steering
    pub acceleration: f32,
    /// Speed lost per tick while coasting
    pub deceleration: f32,
    /// Lateral pixels per unit of speed per tick
    pub turn_speed: f32,

    // === Obstacles (width, height) ===
    pub tree_size: Vec2,
    pub flag_size: Vec2,
    pub barrier_size: Vec2,
    pub person_size: Vec2,

    // === World setup ===
    pub tree_count: usize,
    pub flag_count: usize,
    pub barrier_count: usize,
    /// Person slots, each filled with `person_chance`
    pub person_slots: usize,
    pub person_chance: f64,

    // === Pacing ===
    pub fps: u32,
    /// Floor for the opponent spawn interval (seconds)
    pub opponent_min_interval: f64,
    /// Starting opponent spawn interval (seconds)
    pub opponent_max_interval: f64,
    /// Session time before the engine loop starts (seconds)
    pub engine_start_delay: f64,

    // === Scoring ===
    pub barrier_bonus: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,

            road_width: 350.0,
            marker_width: 10.0,
            marker_height: 50.0,

            car_width: 40.0,
            car_height: 100.0,
            max_speed: 15.0,
            acceleration: 0.20,
            deceleration: 0.05,
            turn_speed: 0.3,

            tree_size: Vec2::new(80.0, 80.0),
            flag_size: Vec2::new(40.0, 80.0),
            barrier_size: Vec2::new(80.0, 50.0),
            person_size: Vec2::new(30.0, 90.0),

            tree_count: 8,
            flag_count: 6,
            barrier_count: 4,
            person_slots: 4,
            person_chance: 0.5,

            fps: 60,
            opponent_min_interval: 1.0,
            opponent_max_interval: 2.0,
            engine_start_delay: 5.0,

            barrier_bonus: 100,
        }
    }
}

impl Config {
    /// Left edge of the road (centered in the viewport, whole pixels)
    pub fn road_x(&self) -> f32 {
        ((self.width - self.road_width) / 2.0).floor()
    }

    /// Right edge of the road
    pub fn road_right(&self) -> f32 {
        self.road_x() + self.road_width
    }

    /// Car sprite size
    pub fn car_size(&self) -> Vec2 {
        Vec2::new(self.car_width, self.car_height)
    }

    /// Legal x band for the player car's left edge
    pub fn player_x_bounds(&self) -> (f32, f32) {
        (
            self.road_x() + ROAD_MARGIN,
            self.road_right() - self.car_width - ROAD_MARGIN,
        )
    }

    /// Player starting position (bottom center)
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(
            (self.width / 2.0).floor() - (self.car_width / 2.0).floor(),
            self.height - 150.0,
        )
    }

    /// Target frame rate, never zero
    pub fn frame_rate(&self) -> u32 {
        self.fps.max(1)
    }

    /// Seconds per tick at the target frame rate
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.frame_rate() as f64
    }

    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load overrides from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read config {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_road_layout() {
        let config = Config::default();
        assert_eq!(config.road_x(), 225.0);
        assert_eq!(config.road_right(), 575.0);
        assert_eq!(config.player_x_bounds(), (245.0, 515.0));
        assert_eq!(config.player_start(), Vec2::new(380.0, 450.0));
    }

    #[test]
    fn test_partial_json_override() {
        let config = Config::from_json(r#"{ "max_speed": 20.0, "tree_count": 3 }"#).unwrap();
        assert_eq!(config.max_speed, 20.0);
        assert_eq!(config.tree_count, 3);
        // Untouched fields keep defaults
        assert_eq!(config.road_width, 350.0);
        assert_eq!(config.barrier_size, Vec2::new(80.0, 50.0));
    }

    #[test]
    fn test_zero_fps_is_clamped() {
        let config = Config::from_json(r#"{ "fps": 0 }"#).unwrap();
        assert_eq!(config.frame_rate(), 1);
        assert_eq!(config.tick_seconds(), 1.0);
        assert_eq!(Config::default().frame_rate(), 60);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Config::from_json("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load(Path::new("/nonexistent/roadside-racer.json"));
        assert_eq!(config, Config::default());
    }
}
