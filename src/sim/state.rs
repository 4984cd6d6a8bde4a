//! Game session state
//!
//! One `GameState` per run. Restarting builds a new one from scratch; there
//! is no partial reset.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Car, EnvironmentObject};
use super::placement::setup_environment;
use crate::config::Config;
use crate::consts::{
    OPPONENT_BASE_SPEED, OPPONENT_MARGIN, SCORE_DIFFICULTY_DIVISOR, SPEED_DISPLAY_SCALE,
};

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG (placement, spawns)
    pub rng: Pcg32,
    /// Score (grows only by barrier bonuses)
    pub score: u64,
    /// Set when the player crashes; only a restart clears it
    pub game_over: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Clock reading when the run started (seconds)
    pub start_time: f64,
    /// Clock reading of the most recent opponent spawn (seconds)
    pub last_spawn_time: f64,
    /// Current gap between opponent spawns (seconds)
    pub spawn_interval: f64,
    /// Engine loop has been started for this run
    pub engine_started: bool,
    pub player: Car,
    /// Active opponents in spawn order
    pub opponents: Vec<Car>,
    /// Scenery in placement order (fixed count for the whole run)
    pub environment: Vec<EnvironmentObject>,
}

impl GameState {
    /// Create a new run with the given seed, starting at clock reading `now`
    pub fn new(seed: u64, config: &Config, now: f64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let environment = setup_environment(config, &mut rng);

        log::info!(
            "New run (seed {}) with {} scenery objects",
            seed,
            environment.len()
        );

        Self {
            seed,
            rng,
            score: 0,
            game_over: false,
            time_ticks: 0,
            start_time: now,
            last_spawn_time: now,
            spawn_interval: config.opponent_max_interval,
            engine_started: false,
            player: Car::player(config),
            opponents: Vec::new(),
            environment,
        }
    }

    /// Seconds since the run started
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.start_time
    }

    /// Speed as shown on the HUD
    pub fn speed_display(&self) -> u32 {
        (self.player.speed * SPEED_DISPLAY_SCALE) as u32
    }

    /// Difficulty bonus earned from score
    fn difficulty(&self) -> f64 {
        self.score as f64 / SCORE_DIFFICULTY_DIVISOR
    }

    /// True once the spawn interval has passed since the last spawn
    pub fn spawn_due(&self, now: f64) -> bool {
        now - self.last_spawn_time > self.spawn_interval
    }

    /// Add one opponent at the top of the road and re-arm the spawn timer.
    ///
    /// Opponents get faster and arrive more often as the score grows.
    pub fn spawn_opponent(&mut self, config: &Config, now: f64) {
        let lo = (config.road_x() + OPPONENT_MARGIN) as i32;
        let hi = ((config.road_right() - config.car_width - OPPONENT_MARGIN) as i32).max(lo);
        let x = self.rng.random_range(lo..=hi) as f32;
        let speed = self.rng.random_range(OPPONENT_BASE_SPEED) + self.difficulty() as f32;

        self.opponents
            .push(Car::opponent(Vec2::new(x, -config.car_height), speed, config));
        self.last_spawn_time = now;
        self.spawn_interval = config
            .opponent_min_interval
            .max(config.opponent_max_interval - self.difficulty());

        log::debug!(
            "Spawned opponent at x={} speed={:.2} (next in {:.2}s)",
            x,
            speed,
            self.spawn_interval
        );
    }

    /// Seed for the run that follows this one
    pub fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }
}
