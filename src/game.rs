//! Session driver
//!
//! Owns the config, the current run and the audio sink. Handles the
//! one-shot commands the simulation doesn't see:
//! - Restart: only after game over, starts a fresh run with a new seed
//! - Quit: any time
//! - ToggleMute: only while playing

use crate::audio::{AudioSink, SoundCue, stop_cue};
use crate::config::Config;
use crate::sim::{Command, GameState, TickInput, tick};

/// Whether the game loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<A: AudioSink> {
    config: Config,
    state: GameState,
    audio: A,
    /// Runs started so far, including the first
    runs: u32,
}

impl<A: AudioSink> Session<A> {
    pub fn new(config: Config, seed: u64, audio: A, now: f64) -> Self {
        let state = GameState::new(seed, &config, now);
        Self {
            config,
            state,
            audio,
            runs: 1,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Apply this tick's command, then advance the run
    pub fn step(&mut self, input: &TickInput, now: f64) -> Flow {
        match input.command {
            Some(Command::Quit) => {
                log::info!(
                    "Quit after {} run(s) - last score {}",
                    self.runs,
                    self.state.score
                );
                stop_cue(&mut self.audio, SoundCue::Engine);
                return Flow::Quit;
            }
            Some(Command::Restart) if self.state.game_over => self.restart(now),
            Some(Command::Restart) => log::debug!("Restart ignored while playing"),
            Some(Command::ToggleMute) if !self.state.game_over => self.toggle_mute(),
            Some(Command::ToggleMute) | None => {}
        }

        tick(&mut self.state, input, now, &self.config, &mut self.audio);
        Flow::Continue
    }

    /// Throw the current run away and start a new one
    fn restart(&mut self, now: f64) {
        let seed = self.state.next_seed();
        stop_cue(&mut self.audio, SoundCue::Engine);
        self.state = GameState::new(seed, &self.config, now);
        self.runs += 1;
        log::info!("Restarted (run {})", self.runs);
    }

    fn toggle_mute(&mut self) {
        let muted = !self.audio.is_muted();
        if let Err(e) = self.audio.set_muted(muted) {
            log::warn!("Failed to toggle mute: {}", e);
        }
    }
}
