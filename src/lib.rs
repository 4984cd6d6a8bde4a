//! Roadside Racer - A top-down scrolling road game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, placement, collisions, game state)
//! - `config`: Road/vehicle/obstacle constants with JSON overrides
//! - `audio`: Audio sink trait and headless mixer
//! - `assets`: Sprite loading with procedural placeholders
//! - `renderer`: Draw list capture and software canvas
//! - `input`: Per-tick input snapshot sources
//! - `game`: Session driver (restart/quit/mute)
//! - `window`: Keyboard-driven play in a native window (`window` feature)

pub mod assets;
pub mod audio;
pub mod config;
pub mod game;
pub mod input;
pub mod renderer;
pub mod sim;
#[cfg(feature = "window")]
pub mod window;

pub use config::Config;
pub use game::{Flow, Session};

/// Fixed gameplay constants that are not part of the tunable config
pub mod consts {
    /// Gap kept between in-road objects/player and the road edge
    pub const ROAD_MARGIN: f32 = 20.0;
    /// Gap kept between a freshly spawned opponent and the road edge
    pub const OPPONENT_MARGIN: f32 = 50.0;

    /// Heading the player car leans toward while steering (degrees)
    pub const TURN_ANGLE: f32 = 15.0;
    /// Fraction of the remaining heading delta closed each tick
    pub const HEADING_SMOOTHING: f32 = 0.2;

    /// Environment scrolls at this fraction of player speed
    pub const SCROLL_FACTOR: f32 = 0.5;

    /// Placement attempts before giving up on an overlap-free spot
    pub const PLACEMENT_ATTEMPTS: u32 = 50;
    /// Max extra distance above the viewport for respawned objects
    pub const RESPAWN_JITTER: i32 = 100;

    /// Score points per unit of opponent speed bonus / spawn interval reduction
    pub const SCORE_DIFFICULTY_DIVISOR: f64 = 300.0;
    /// Base opponent speed range (pixels per tick)
    pub const OPPONENT_BASE_SPEED: std::ops::Range<f32> = 2.0..5.0;

    /// Displayed speed is player speed times this
    pub const SPEED_DISPLAY_SCALE: f32 = 10.0;
}
