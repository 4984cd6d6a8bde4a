//! Input sources
//!
//! The simulation consumes one `TickInput` per tick. `KeyState` turns a
//! keyboard snapshot into one; `Autopilot` plays the game for demo and
//! headless runs.

use crate::config::Config;
use crate::sim::{GameState, ObjectKind, Rect};

pub use crate::sim::entity::Steering;
pub use crate::sim::tick::{Command, TickInput};

/// How far up the road the autopilot looks for trouble (pixels)
const LOOKAHEAD: f32 = 260.0;
/// Extra lateral room wanted around a threat (pixels)
const CLEARANCE: f32 = 15.0;
/// Close enough to the target x to stop steering (pixels)
const DEADZONE: f32 = 6.0;

/// Keyboard snapshot for one tick
///
/// `left`/`right` are held keys; the rest are edge-triggered presses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub restart: bool,
    pub quit: bool,
    pub mute: bool,
}

impl KeyState {
    /// Left wins when both arrows are held. At most one command per tick,
    /// quit first.
    pub fn to_input(self) -> TickInput {
        let steering = if self.left {
            Steering::Left
        } else if self.right {
            Steering::Right
        } else {
            Steering::None
        };
        let command = if self.quit {
            Some(Command::Quit)
        } else if self.restart {
            Some(Command::Restart)
        } else if self.mute {
            Some(Command::ToggleMute)
        } else {
            None
        };
        TickInput { steering, command }
    }
}

/// Demo driver: dodges cars and people, hunts barriers, weaves otherwise.
///
/// After a crash it restarts while it has restarts left, then quits.
#[derive(Debug, Clone)]
pub struct Autopilot {
    restarts_left: u32,
}

impl Autopilot {
    pub fn new(restarts: u32) -> Self {
        Self {
            restarts_left: restarts,
        }
    }

    pub fn restarts_left(&self) -> u32 {
        self.restarts_left
    }

    pub fn next_input(&mut self, state: &GameState, config: &Config) -> TickInput {
        if state.game_over {
            if self.restarts_left > 0 {
                self.restarts_left -= 1;
                return TickInput::command(Command::Restart);
            }
            return TickInput::command(Command::Quit);
        }

        let player = state.player.bounds();
        let center = player.x + player.width / 2.0;
        let (min_x, max_x) = config.player_x_bounds();

        // Nearest car or person in our lane band
        let threat = state
            .opponents
            .iter()
            .map(|car| car.bounds())
            .chain(
                state
                    .environment
                    .iter()
                    .filter(|obj| obj.kind == ObjectKind::Person)
                    .map(|obj| obj.bounds()),
            )
            .filter(|r| is_ahead(r, &player) && in_lane(r, &player))
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()));

        let target = if let Some(threat) = threat {
            // Pass on whichever side has more road
            let threat_center = threat.x + threat.width / 2.0;
            let room_left = threat.x - config.road_x();
            let room_right = config.road_right() - threat.right();
            if room_left > room_right || (room_left == room_right && threat_center >= center) {
                threat.x - CLEARANCE - player.width / 2.0
            } else {
                threat.right() + CLEARANCE + player.width / 2.0
            }
        } else if let Some(barrier) = state
            .environment
            .iter()
            .filter(|obj| obj.kind == ObjectKind::Barrier)
            .map(|obj| obj.bounds())
            .filter(|r| is_ahead(r, &player))
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()))
        {
            barrier.x + barrier.width / 2.0
        } else {
            // Weave around the middle of the road so speed builds up
            let t = state.time_ticks as f32 * 0.02;
            let offset = t.sin() * 0.6 + (t * 0.7).sin() * 0.4;
            config.road_x() + config.road_width / 2.0 + offset * config.road_width * 0.3
        };

        let target = target.clamp(min_x + player.width / 2.0, max_x + player.width / 2.0);
        let dx = target - center;

        let steering = if dx.abs() < DEADZONE {
            Steering::None
        } else if dx < 0.0 {
            Steering::Left
        } else {
            Steering::Right
        };
        TickInput::steer(steering)
    }
}

/// Above the player and within lookahead range
fn is_ahead(r: &Rect, player: &Rect) -> bool {
    r.bottom() <= player.bottom() && player.y - r.bottom() < LOOKAHEAD
}

/// Horizontally overlapping the player's band (plus clearance)
fn in_lane(r: &Rect, player: &Rect) -> bool {
    r.x < player.right() + CLEARANCE && r.right() > player.x - CLEARANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Car, EnvironmentObject};
    use glam::Vec2;

    fn bare_state(config: &Config) -> GameState {
        let mut state = GameState::new(21, config, 0.0);
        state.environment.clear();
        state
    }

    #[test]
    fn test_keys_to_steering() {
        assert_eq!(KeyState::default().to_input(), TickInput::default());

        let right = KeyState {
            right: true,
            ..Default::default()
        };
        assert_eq!(right.to_input().steering, Steering::Right);

        let both = KeyState {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(both.to_input().steering, Steering::Left);
    }

    #[test]
    fn test_keys_to_command() {
        let mute = KeyState {
            mute: true,
            left: true,
            ..Default::default()
        };
        assert_eq!(mute.to_input().command, Some(Command::ToggleMute));
        assert_eq!(mute.to_input().steering, Steering::Left);

        let all = KeyState {
            restart: true,
            quit: true,
            mute: true,
            ..Default::default()
        };
        assert_eq!(all.to_input().command, Some(Command::Quit));

        let restart = KeyState {
            restart: true,
            mute: true,
            ..Default::default()
        };
        assert_eq!(restart.to_input().command, Some(Command::Restart));
    }

    #[test]
    fn test_dodges_oncoming_car() {
        let config = Config::default();
        let mut state = bare_state(&config);
        let mut pilot = Autopilot::new(0);

        // Car directly ahead and slightly to the right: road is wider on the left
        state
            .opponents
            .push(Car::opponent(Vec2::new(390.0, 300.0), 3.0, &config));
        let input = pilot.next_input(&state, &config);
        assert_eq!(input.steering, Steering::Left);

        // Car slightly to the left: go right
        state.opponents[0].pos.x = 370.0;
        let input = pilot.next_input(&state, &config);
        assert_eq!(input.steering, Steering::Right);
    }

    #[test]
    fn test_ignores_cars_behind_or_far_away() {
        let config = Config::default();
        let mut state = bare_state(&config);
        let mut pilot = Autopilot::new(0);
        state.time_ticks = 0;

        let weave = pilot.next_input(&state, &config);
        state
            .opponents
            .push(Car::opponent(Vec2::new(380.0, -400.0), 3.0, &config));
        assert_eq!(pilot.next_input(&state, &config), weave);
    }

    #[test]
    fn test_heads_for_barrier() {
        let config = Config::default();
        let mut state = bare_state(&config);
        let mut pilot = Autopilot::new(0);
        state.environment.push(EnvironmentObject::new(
            ObjectKind::Barrier,
            Vec2::new(460.0, 300.0),
            &config,
        ));
        let input = pilot.next_input(&state, &config);
        assert_eq!(input.steering, Steering::Right);
    }

    #[test]
    fn test_person_is_a_threat() {
        let config = Config::default();
        let mut state = bare_state(&config);
        let mut pilot = Autopilot::new(0);
        state.environment.push(EnvironmentObject::new(
            ObjectKind::Person,
            Vec2::new(400.0, 320.0),
            &config,
        ));
        let input = pilot.next_input(&state, &config);
        assert_eq!(input.steering, Steering::Left);
    }

    #[test]
    fn test_restarts_then_quits() {
        let config = Config::default();
        let mut state = bare_state(&config);
        state.game_over = true;
        let mut pilot = Autopilot::new(2);

        assert_eq!(pilot.next_input(&state, &config).command, Some(Command::Restart));
        assert_eq!(pilot.next_input(&state, &config).command, Some(Command::Restart));
        assert_eq!(pilot.restarts_left(), 0);
        assert_eq!(pilot.next_input(&state, &config).command, Some(Command::Quit));
    }
}
