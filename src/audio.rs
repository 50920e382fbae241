//! Audio collaborator contract
//!
//! The simulation only names sounds; playback is fire-and-forget through an
//! `AudioSink` supplied by the host.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player shot
    Fire,
    /// Enemy, block or boss destroyed
    Kill,
    /// Item buff picked up
    Boost,
    /// Boss encounter begins
    Laugh,
    /// Run lost
    Lose,
}

impl SoundEffect {
    /// Per-effect gain on top of the sfx volume
    pub fn gain(&self) -> f32 {
        match self {
            SoundEffect::Fire | SoundEffect::Kill | SoundEffect::Boost | SoundEffect::Laugh => 0.6,
            SoundEffect::Lose => 1.0,
        }
    }
}

/// Background music control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicCue {
    Play,
    Stop,
}

/// Host-provided playback
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    fn music(&mut self, cue: MusicCue, volume: f32);
}

/// Audio manager: applies settings volumes and forwards to a sink
pub struct AudioManager<S: AudioSink> {
    sink: S,
    sfx_volume: f32,
    music_volume: f32,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        Self {
            sink,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
        }
    }

    /// Play a sound effect (no-op when muted)
    pub fn play(&mut self, effect: SoundEffect) {
        let volume = self.sfx_volume * effect.gain();
        if volume > 0.0 {
            self.sink.play(effect, volume);
        }
    }

    pub fn music(&mut self, cue: MusicCue) {
        self.sink.music(cue, self.music_volume);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Sink that only logs (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {:?} @ {:.2}", effect, volume);
    }

    fn music(&mut self, cue: MusicCue, volume: f32) {
        log::debug!("music {:?} @ {:.2}", cue, volume);
    }
}
