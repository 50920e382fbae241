//! Game settings and balance tuning
//!
//! Settings hold player preferences; `Tuning` is the data-driven game balance
//! every new run starts from. Both load from JSON with per-field defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Logical canvas width
    pub canvas_width: f32,
    /// Logical canvas height
    pub canvas_height: f32,

    // === Starting difficulty ===
    /// Enemy speed per tick
    pub enemy_velocity: f32,
    /// Inverse fire probability (lower fires more)
    pub enemy_fire_rate: f32,
    /// Interval between formation descents (ms)
    pub descent_interval_ms: f32,
    /// Minimum time between player shots (ms)
    pub player_fire_rate_ms: f32,
    /// Score per kill at level 1
    pub reward_per_kill: u64,

    // === Movement ===
    /// Player speed (units per second)
    pub player_speed: f32,
    /// Player projectile speed per tick
    pub player_missile_speed: f32,
    /// Enemy projectile speed per tick
    pub enemy_missile_speed: f32,
    /// Boss projectile speed per tick
    pub boss_missile_speed: f32,
    /// Formation swing around each enemy's anchor
    pub oscillation_amplitude: f32,

    // === Boss & buffs ===
    pub boss_health: u32,
    pub boss_shock_ms: u64,
    pub buff_duration_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            enemy_velocity: ENEMY_VELOCITY,
            enemy_fire_rate: ENEMY_FIRE_RATE,
            descent_interval_ms: DESCENT_INTERVAL_MS,
            player_fire_rate_ms: PLAYER_FIRE_RATE_MS,
            reward_per_kill: REWARD_PER_KILL,

            player_speed: PLAYER_SPEED,
            player_missile_speed: PLAYER_MISSILE_SPEED,
            enemy_missile_speed: ENEMY_MISSILE_SPEED,
            boss_missile_speed: BOSS_MISSILE_SPEED,
            oscillation_amplitude: OSCILLATION_AMPLITUDE,

            boss_health: BOSS_MAX_HEALTH,
            boss_shock_ms: BOSS_SHOCK_MS,
            buff_duration_ms: BUFF_DURATION_MS,
        }
    }
}

impl Tuning {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width <= PLAYER_SIZE || self.canvas_height <= PLAYER_SIZE {
            return Err(GameError::InvalidGeometry {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.enemy_fire_rate < MIN_ENEMY_FIRE_RATE {
            return Err(GameError::Config(format!(
                "enemy_fire_rate must be >= {MIN_ENEMY_FIRE_RATE}, got {}",
                self.enemy_fire_rate
            )));
        }
        if self.player_fire_rate_ms < MIN_PLAYER_FIRE_RATE_MS {
            return Err(GameError::Config(format!(
                "player_fire_rate_ms must be >= {MIN_PLAYER_FIRE_RATE_MS}, got {}",
                self.player_fire_rate_ms
            )));
        }
        if self.descent_interval_ms < MIN_DESCENT_MS {
            return Err(GameError::Config(format!(
                "descent_interval_ms must be >= {MIN_DESCENT_MS}, got {}",
                self.descent_interval_ms
            )));
        }
        if self.boss_health == 0 {
            return Err(GameError::Config("boss_health must be positive".into()));
        }
        let speeds = [
            self.enemy_velocity,
            self.player_speed,
            self.player_missile_speed,
            self.enemy_missile_speed,
            self.boss_missile_speed,
            self.oscillation_amplitude,
        ];
        if speeds.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(GameError::Config("speeds must be positive".into()));
        }
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute everything
    pub muted: bool,

    // === Run ===
    /// RNG seed for headless runs (None = runner default)
    pub seed: Option<u64>,
    /// Game balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 0.6,
            music_volume: 0.7,
            muted: false,
            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Effective sound effect gain (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective music gain (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }
}
