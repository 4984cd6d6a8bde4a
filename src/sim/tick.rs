//! Per-frame simulation step
//!
//! Advances a run by one tick. `now` is a monotonic clock reading in seconds
//! supplied by the driver; spawn pacing and the engine start are measured
//! against it, everything else is per tick.

use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::entity::Steering;
use super::placement::respawn;
use super::state::GameState;
use crate::audio::{AudioSink, SoundCue, stop_cue};
use crate::config::Config;
use crate::consts::SCROLL_FACTOR;

/// One-shot commands (handled by the session driver, not the simulation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Start a fresh run (only after game over)
    Restart,
    /// Stop the game loop
    Quit,
    /// Mute/unmute audio (only while playing)
    ToggleMute,
}

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held steering direction
    pub steering: Steering,
    /// Command pressed this tick, if any
    pub command: Option<Command>,
}

impl TickInput {
    pub fn steer(steering: Steering) -> Self {
        Self {
            steering,
            command: None,
        }
    }

    pub fn command(command: Command) -> Self {
        Self {
            steering: Steering::None,
            command: Some(command),
        }
    }
}

/// Advance the run by one tick
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    now: f64,
    config: &Config,
    audio: &mut dyn AudioSink,
) {
    // Nothing moves after a crash
    if state.game_over {
        return;
    }

    state.time_ticks += 1;

    state.player.update_player(input.steering, config);

    // Engine drone kicks in once the run is underway
    if !state.engine_started && state.elapsed(now) >= config.engine_start_delay {
        match audio.play_looping(SoundCue::Engine) {
            Ok(()) => state.engine_started = true,
            Err(e) => log::warn!("Failed to play engine sound: {}", e),
        }
    }

    if state.spawn_due(now) {
        state.spawn_opponent(config, now);
    }

    let height = config.height;
    state.opponents.retain_mut(|car| !car.advance(height));

    scroll_environment(state, config);

    if resolve_collisions(state, config, audio).is_some_and(|hit| hit.is_fatal()) {
        stop_cue(audio, SoundCue::Engine);
        log::info!(
            "Game over after {} ticks - final score {}",
            state.time_ticks,
            state.score
        );
    }
}

/// Scroll scenery with the player's speed, recycling anything that falls off
/// the bottom of the viewport
fn scroll_environment(state: &mut GameState, config: &Config) {
    let scroll = state.player.speed * SCROLL_FACTOR;
    for i in 0..state.environment.len() {
        state.environment[i].pos.y += scroll;
        if state.environment[i].pos.y > config.height {
            respawn(&mut state.environment, i, config, &mut state.rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::sim::entity::{Car, EnvironmentObject, ObjectKind};
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_engine_starts_once_after_delay() {
        let config = Config::default();
        let mut state = GameState::new(1, &config, 0.0);
        state.environment.clear();
        let mut audio = AudioManager::new();
        let input = TickInput::default();

        tick(&mut state, &input, 4.9, &config, &mut audio);
        assert!(!state.engine_started);
        assert!(!audio.is_looping(SoundCue::Engine));

        tick(&mut state, &input, 5.0, &config, &mut audio);
        assert!(state.engine_started);
        assert!(audio.is_looping(SoundCue::Engine));

        tick(&mut state, &input, 5.1, &config, &mut audio);
        assert_eq!(audio.play_count(SoundCue::Engine), 1);
    }

    #[test]
    fn test_engine_failure_is_retried_not_fatal() {
        let config = Config::default();
        let mut state = GameState::new(1, &config, 0.0);
        state.environment.clear();
        let mut audio = AudioManager::disabled();

        tick(&mut state, &TickInput::default(), 6.0, &config, &mut audio);
        assert!(!state.engine_started);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_spawn_pacing() {
        let config = Config::default();
        let mut state = GameState::new(2, &config, 0.0);
        state.environment.clear();
        let mut audio = AudioManager::new();
        let input = TickInput::default();

        // Not due yet
        tick(&mut state, &input, 1.0, &config, &mut audio);
        assert!(state.opponents.is_empty());

        // Exactly at the interval is not "exceeded"
        tick(&mut state, &input, 2.0, &config, &mut audio);
        assert!(state.opponents.is_empty());

        tick(&mut state, &input, 2.01, &config, &mut audio);
        assert_eq!(state.opponents.len(), 1);
        assert_eq!(state.last_spawn_time, 2.01);

        // Timer was reset
        tick(&mut state, &input, 2.5, &config, &mut audio);
        assert_eq!(state.opponents.len(), 1);
    }

    #[test]
    fn test_opponents_leave_viewport() {
        let config = Config::default();
        let mut state = GameState::new(2, &config, 0.0);
        state.environment.clear();
        let mut audio = AudioManager::new();
        // Far from the player lane vertically, about to exit
        state
            .opponents
            .push(Car::opponent(Vec2::new(250.0, 598.0), 3.0, &config));

        tick(&mut state, &TickInput::default(), 0.5, &config, &mut audio);
        assert!(state.opponents.is_empty());
    }

    #[test]
    fn test_scenery_scrolls_with_player_speed() {
        let config = Config::default();
        let mut state = GameState::new(3, &config, 0.0);
        let mut audio = AudioManager::new();
        state.environment = vec![EnvironmentObject::new(
            ObjectKind::Tree,
            Vec2::new(100.0, 0.0),
            &config,
        )];
        state.player.speed = 4.0;

        // Coasting: speed drops after control is applied, then scenery scrolls
        tick(&mut state, &TickInput::default(), 0.1, &config, &mut audio);
        let expected = (4.0 - config.deceleration) * SCROLL_FACTOR;
        assert!((state.environment[0].pos.y - expected).abs() < 1e-5);
    }

    #[test]
    fn test_recycle_keeps_count() {
        let config = Config::default();
        let mut state = GameState::new(4, &config, 0.0);
        let mut audio = AudioManager::new();
        let count = state.environment.len();
        for obj in &mut state.environment {
            obj.pos.y = config.height - 0.5;
        }
        state.player.speed = 5.0;
        // Keep scenery well away from the player so nothing collides
        state.player.pos.y = 10_000.0;

        tick(&mut state, &TickInput::default(), 0.1, &config, &mut audio);
        assert_eq!(state.environment.len(), count);
        for obj in &state.environment {
            assert!(obj.pos.y < 0.0, "{:?} not recycled", obj.kind);
        }
    }

    #[test]
    fn test_barrier_bonus_through_tick() {
        let config = Config::default();
        let mut state = GameState::new(5, &config, 0.0);
        let mut audio = AudioManager::new();
        state.environment = vec![EnvironmentObject::new(
            ObjectKind::Barrier,
            state.player.pos,
            &config,
        )];

        tick(&mut state, &TickInput::default(), 0.1, &config, &mut audio);
        assert_eq!(state.score, 100);
        assert!(state.environment[0].pos.y <= -config.height);
    }

    #[test]
    fn test_barrier_keeps_engine_running() {
        let config = Config::default();
        let mut state = GameState::new(5, &config, 0.0);
        let mut audio = AudioManager::new();
        state.environment.clear();
        tick(&mut state, &TickInput::default(), 5.0, &config, &mut audio);
        assert!(audio.is_looping(SoundCue::Engine));

        state.environment = vec![EnvironmentObject::new(
            ObjectKind::Barrier,
            state.player.pos,
            &config,
        )];
        tick(&mut state, &TickInput::default(), 5.1, &config, &mut audio);
        assert_eq!(state.score, 100);
        assert!(audio.is_looping(SoundCue::Engine));
    }

    #[test]
    fn test_game_over_is_sticky() {
        let config = Config::default();
        let mut state = GameState::new(6, &config, 0.0);
        let mut audio = AudioManager::new();
        state.environment = vec![EnvironmentObject::new(
            ObjectKind::Person,
            state.player.pos,
            &config,
        )];

        tick(&mut state, &TickInput::default(), 6.0, &config, &mut audio);
        assert!(state.game_over);
        // Engine was started this tick and stopped by the crash
        assert!(!audio.is_looping(SoundCue::Engine));

        let frozen = state.player.clone();
        let opponents = state.opponents.clone();
        let ticks = state.time_ticks;
        for i in 0..30 {
            let input = TickInput::steer(Steering::Left);
            tick(&mut state, &input, 7.0 + i as f64, &config, &mut audio);
            assert!(state.game_over);
        }
        assert_eq!(state.player, frozen);
        assert_eq!(state.opponents, opponents);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_crash_priority_over_barrier() {
        let config = Config::default();
        let mut state = GameState::new(7, &config, 0.0);
        let mut audio = AudioManager::new();
        state.environment = vec![EnvironmentObject::new(
            ObjectKind::Barrier,
            state.player.pos,
            &config,
        )];
        // Stationary so it is still on top of the player after advancing
        state
            .opponents
            .push(Car::opponent(state.player.pos, 0.0, &config));

        tick(&mut state, &TickInput::default(), 0.1, &config, &mut audio);
        assert!(state.game_over);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_determinism() {
        let config = Config::default();
        let mut a = GameState::new(99999, &config, 0.0);
        let mut b = GameState::new(99999, &config, 0.0);
        let mut audio_a = AudioManager::new();
        let mut audio_b = AudioManager::new();

        let inputs = [Steering::Left, Steering::Right, Steering::None, Steering::Right];
        for i in 0..600 {
            let input = TickInput::steer(inputs[(i / 37) % inputs.len()]);
            let now = i as f64 * DT;
            tick(&mut a, &input, now, &config, &mut audio_a);
            tick(&mut b, &input, now, &config, &mut audio_b);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.game_over, b.game_over);
        assert_eq!(a.player, b.player);
        assert_eq!(a.opponents, b.opponents);
        assert_eq!(a.environment, b.environment);
    }

    fn steering_strategy() -> impl Strategy<Value = Steering> {
        prop_oneof![
            Just(Steering::None),
            Just(Steering::Left),
            Just(Steering::Right)
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn run_invariants_hold(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(steering_strategy(), 1..600),
        ) {
            let config = Config::default();
            let (min_x, max_x) = config.player_x_bounds();
            let mut state = GameState::new(seed, &config, 0.0);
            let mut audio = AudioManager::new();
            let count = state.environment.len();
            let mut score = 0;

            for (i, steering) in inputs.into_iter().enumerate() {
                let was_over = state.game_over;
                tick(&mut state, &TickInput::steer(steering), i as f64 * DT, &config, &mut audio);

                prop_assert!(state.player.pos.x >= min_x && state.player.pos.x <= max_x);
                prop_assert!(state.player.speed >= 0.0 && state.player.speed <= config.max_speed);
                prop_assert_eq!(state.environment.len(), count);
                prop_assert!(state.environment.iter().all(|o| o.pos.y <= config.height));
                prop_assert!(state.score >= score && (state.score - score) % 100 == 0);
                prop_assert!(!was_over || state.game_over);
                score = state.score;
            }
        }
    }
}
