//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is injected by the caller, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order, columns by index)
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod entity;
pub mod formation;
pub mod machine;
pub mod player;
pub mod progression;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossState};
pub use collision::{CollisionReport, LossCause, resolve};
pub use entity::{Body, Owner, Projectile};
pub use formation::{DescentTimer, front_enemy_x};
pub use machine::{BLOCK_LAYOUT, Command, generate_blocks, generate_formation};
pub use player::Player;
pub use progression::{Progression, is_boss_level, level_bonus, reward_increment};
pub use state::{
    Block, Enemy, EnemyKind, EntityIds, GameEvent, GamePhase, GameState, ItemKind, LevelLog, Menu,
    RngState, RunSummary,
};
pub use tick::{TickInput, tick};
