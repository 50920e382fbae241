//! Phat Invaders - a formation/boss arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state machine)
//! - `renderer`: Render collaborator contract and HUD
//! - `audio`: Sound collaborator contract
//! - `highscores`: Leaderboard and score submission
//! - `settings`: Preferences and data-driven game balance

pub mod audio;
pub mod error;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use highscores::HighScores;
pub use settings::{Settings, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation timestep (ms, rounded)
    pub const SIM_DT_MS: u64 = 16;

    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 1000.0;
    pub const CANVAS_HEIGHT: f32 = 1000.0;

    /// Formation grid
    pub const FORMATION_COLUMNS: u32 = 12;
    pub const FORMATION_ROWS: u32 = 6;
    pub const FORMATION_SPACING: f32 = 44.0;
    pub const FORMATION_TOP: f32 = 64.0;
    pub const ENEMY_SIZE: f32 = 40.0;
    /// Max horizontal displacement of an enemy from its anchor
    pub const OSCILLATION_AMPLITUDE: f32 = 160.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 64.0;
    pub const PLAYER_BOTTOM_OFFSET: f32 = 48.0;
    /// Player speed in units per second (the only deltaTime-scaled mover)
    pub const PLAYER_SPEED: f32 = 600.0;
    pub const PLAYER_FIRE_RATE_MS: f32 = 400.0;

    /// Projectiles (speeds are per tick)
    pub const PLAYER_MISSILE_SIZE: f32 = 10.0;
    pub const PLAYER_MISSILE_SPEED: f32 = 10.0;
    pub const SPREAD_OFFSET: f32 = 0.2;
    pub const ENEMY_MISSILE_WIDTH: f32 = 10.0;
    pub const ENEMY_MISSILE_HEIGHT: f32 = 20.0;
    pub const ENEMY_MISSILE_SPEED: f32 = 5.0;
    pub const BOSS_MISSILE_SIZE: f32 = 40.0;
    pub const BOSS_MISSILE_SPEED: f32 = 8.0;

    /// Boss encounter
    pub const BOSS_SIZE: f32 = 200.0;
    pub const BOSS_MAX_HEALTH: u32 = 20;
    pub const BOSS_SHOCK_MS: u64 = 300;
    /// Boss fires with probability `BOSS_FIRE_FACTOR / enemy_fire_rate` per tick
    pub const BOSS_FIRE_FACTOR: f32 = 12.0;
    /// Every Nth level is a boss level
    pub const BOSS_LEVEL_INTERVAL: u32 = 3;

    /// Destructible cover
    pub const BLOCK_SIZE: f32 = 20.0;
    pub const BLOCK_GAP: f32 = 1.0;

    /// Item buffs
    pub const BUFF_DURATION_MS: u64 = 7000;
    pub const FAST_FIRE_DIVISOR: f32 = 3.0;

    /// Starting difficulty
    pub const ENEMY_VELOCITY: f32 = 1.0;
    pub const ENEMY_FIRE_RATE: f32 = 40.0;
    pub const DESCENT_INTERVAL_MS: f32 = 7500.0;
    pub const REWARD_PER_KILL: u64 = 100;

    /// Floors for the geometric decays
    pub const MIN_PLAYER_FIRE_RATE_MS: f32 = 50.0;
    pub const MIN_ENEMY_FIRE_RATE: f32 = 1.0;
    pub const MIN_DESCENT_MS: f32 = 500.0;
}

/// Axis-aligned overlap of two boxes given by top-left corner and size.
///
/// Strict on all four edges: touching boxes do not overlap.
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

/// Top-left corner of a box of `size` centred on `center`
#[inline]
pub fn centered(center: Vec2, size: Vec2) -> Vec2 {
    center - size / 2.0
}
