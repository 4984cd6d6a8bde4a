//! Collision detection and scoring
//!
//! At most one collision is resolved per tick. Opponents are checked first,
//! then scenery in placement order; the first hit wins. Trees and flags are
//! decorative and never collide.

use super::entity::{Car, EnvironmentObject, ObjectKind};
use super::state::GameState;
use crate::audio::{AudioSink, SoundCue, play_cue};
use crate::config::Config;

/// What the player ran into this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Hit an oncoming car (ends the run)
    OpponentCrash { index: usize },
    /// Struck a bonus barrier
    BarrierHit { index: usize },
    /// Hit a person (ends the run)
    PersonHit { index: usize },
}

impl CollisionOutcome {
    /// Whether this outcome ends the run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CollisionOutcome::BarrierHit { .. })
    }
}

/// Find the first collision for the player, without changing anything
pub fn detect_collision(
    player: &Car,
    opponents: &[Car],
    environment: &[EnvironmentObject],
) -> Option<CollisionOutcome> {
    let player_rect = player.bounds();

    if let Some(index) = opponents
        .iter()
        .position(|car| player_rect.overlaps(&car.bounds()))
    {
        return Some(CollisionOutcome::OpponentCrash { index });
    }

    environment
        .iter()
        .enumerate()
        .find_map(|(index, obj)| match obj.kind {
            ObjectKind::Barrier if player_rect.overlaps(&obj.bounds()) => {
                Some(CollisionOutcome::BarrierHit { index })
            }
            ObjectKind::Person if player_rect.overlaps(&obj.bounds()) => {
                Some(CollisionOutcome::PersonHit { index })
            }
            _ => None,
        })
}

/// Detect and apply this tick's collision.
///
/// - Opponent: crash sound, game over
/// - Barrier: bonus score, score sound, barrier thrown far above the viewport
/// - Person: crash sound, game over
pub fn resolve_collisions(
    state: &mut GameState,
    config: &Config,
    audio: &mut dyn AudioSink,
) -> Option<CollisionOutcome> {
    let outcome = detect_collision(&state.player, &state.opponents, &state.environment)?;

    match outcome {
        CollisionOutcome::OpponentCrash { index } => {
            log::info!("Crashed into opponent {} - game over", index);
            play_cue(audio, SoundCue::Crash);
            state.game_over = true;
        }
        CollisionOutcome::BarrierHit { index } => {
            state.score += config.barrier_bonus;
            play_cue(audio, SoundCue::Score);
            let barrier = &mut state.environment[index];
            // Out of play until it scrolls back down and gets recycled
            barrier.pos.y = -config.height - barrier.size.y;
            log::debug!("Barrier hit - score {}", state.score);
        }
        CollisionOutcome::PersonHit { index } => {
            log::info!("Hit person {} - game over", index);
            play_cue(audio, SoundCue::Crash);
            state.game_over = true;
        }
    }

    Some(outcome)
}
