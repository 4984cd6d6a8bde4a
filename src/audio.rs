//! Audio collaborator
//!
//! The simulation only talks to an `AudioSink`. Every call may fail; callers
//! in the simulation log the failure and carry on, audio is never allowed to
//! stall a tick.

use std::collections::HashMap;
use std::fmt;

/// Sound tracks the game triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Engine drone, looped once the run is underway
    Engine,
    /// Hit a person or an opponent
    Crash,
    /// Struck a bonus barrier
    Score,
}

impl SoundCue {
    pub const ALL: [SoundCue; 3] = [SoundCue::Engine, SoundCue::Crash, SoundCue::Score];

    /// Mix volume for this track (0.0 - 1.0)
    pub fn default_volume(&self) -> f32 {
        match self {
            SoundCue::Engine => 0.3,
            SoundCue::Crash => 0.7,
            SoundCue::Score => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Engine => "engine",
            SoundCue::Crash => "crash",
            SoundCue::Score => "score",
        }
    }
}

/// Audio backend failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No output device / mixer
    Unavailable,
    /// The backend rejected the request
    Backend(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable => write!(f, "audio output unavailable"),
            AudioError::Backend(msg) => write!(f, "audio backend error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

/// Playback interface the simulation drives
pub trait AudioSink {
    /// Start `cue` looping until stopped
    fn play_looping(&mut self, cue: SoundCue) -> Result<(), AudioError>;
    /// Play `cue` once
    fn play_once(&mut self, cue: SoundCue) -> Result<(), AudioError>;
    /// Stop `cue` if it is playing
    fn stop(&mut self, cue: SoundCue) -> Result<(), AudioError>;
    /// Mute/unmute all output
    fn set_muted(&mut self, muted: bool) -> Result<(), AudioError>;
    fn is_muted(&self) -> bool;
}

/// Play a one-shot cue, logging (and otherwise ignoring) failures
pub fn play_cue(audio: &mut dyn AudioSink, cue: SoundCue) {
    if let Err(e) = audio.play_once(cue) {
        log::warn!("Failed to play {} sound: {}", cue.as_str(), e);
    }
}

/// Stop a cue, logging (and otherwise ignoring) failures
pub fn stop_cue(audio: &mut dyn AudioSink, cue: SoundCue) {
    if let Err(e) = audio.stop(cue) {
        log::warn!("Failed to stop {} sound: {}", cue.as_str(), e);
    }
}

/// Headless mixer: tracks what would be audible and logs cues.
///
/// Used by the native driver (no sound device) and by tests.
#[derive(Debug)]
pub struct AudioManager {
    enabled: bool,
    master_volume: f32,
    muted: bool,
    looping: Vec<SoundCue>,
    play_counts: HashMap<SoundCue, u32>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            enabled: true,
            master_volume: 0.8,
            muted: false,
            looping: Vec::new(),
            play_counts: HashMap::new(),
        }
    }

    /// A mixer whose every call fails, as if no device were present
    pub fn disabled() -> Self {
        log::warn!("Audio output unavailable - audio disabled");
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Effective volume of a track
    pub fn effective_volume(&self, cue: SoundCue) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * cue.default_volume()
        }
    }

    pub fn is_looping(&self, cue: SoundCue) -> bool {
        self.looping.contains(&cue)
    }

    /// How many times a cue has been started (looped or one-shot)
    pub fn play_count(&self, cue: SoundCue) -> u32 {
        self.play_counts.get(&cue).copied().unwrap_or(0)
    }

    fn check(&self) -> Result<(), AudioError> {
        if self.enabled {
            Ok(())
        } else {
            Err(AudioError::Unavailable)
        }
    }

    fn record(&mut self, cue: SoundCue) {
        *self.play_counts.entry(cue).or_insert(0) += 1;
        log::debug!(
            "Sound {} at volume {:.2}",
            cue.as_str(),
            self.effective_volume(cue)
        );
    }
}

impl AudioSink for AudioManager {
    fn play_looping(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.check()?;
        if !self.looping.contains(&cue) {
            self.looping.push(cue);
            self.record(cue);
        }
        Ok(())
    }

    fn play_once(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.check()?;
        self.record(cue);
        Ok(())
    }

    fn stop(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.check()?;
        self.looping.retain(|c| *c != cue);
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), AudioError> {
        self.check()?;
        self.muted = muted;
        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        Ok(())
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}
