//! Phase transitions, commands and level setup
//!
//! Menus talk to the machine through `Command`s and hear back through
//! `GameEvent`s. Every phase change goes through `change_phase`, which unbinds
//! the old phase's menu and binds the new one.

use glam::Vec2;
use rand::seq::index;

use super::boss::Boss;
use super::player::Player;
use super::progression::Progression;
use super::state::{
    Block, Enemy, EnemyKind, GameEvent, GamePhase, GameState, ItemKind, LevelLog, RunSummary,
};
use crate::audio::{MusicCue, SoundEffect};
use crate::consts::*;
use crate::error::{GameError, Result};
use crate::highscores::{ScoreService, ScoreSubmission};

/// Cover layout, one string per row; `1` places a block
pub const BLOCK_LAYOUT: [&str; 8] = [
    "0000011111001100110111110011111100000",
    "0000011111101100110111111011111100000",
    "0000011001101100110110011000110000000",
    "0000011111101111110111111000110000000",
    "0000011111001111110111111000110000000",
    "0000011000001100110110011000110000000",
    "0000011000001100110110011000110000000",
    "0000011000001100110110011000110000000",
];

/// Item kinds hidden in every formation, one slot each
pub const WAVE_ITEMS: [ItemKind; 3] = [ItemKind::FireBoost, ItemKind::RowDestroyer, ItemKind::SpreadFire];

/// Boss moves this much faster than the formation would on the same level
pub const BOSS_SPEED_BONUS: f32 = 1.0;

/// Inbound signals from menus and the host
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Asset loading finished (or failed with a message)
    AssetsLoaded(std::result::Result<(), String>),
    /// Welcome menu start button / spacebar
    Start,
    /// Lost or high score menu retry
    Retry,
    /// Pause menu resume
    Resume,
    /// Outcome of a score submission
    HighScoreSubmitted(bool),
}

impl GameState {
    /// Apply a command; commands that make no sense in the current phase are ignored
    pub fn handle(&mut self, command: Command) {
        match (self.phase, command) {
            (GamePhase::Loading, Command::AssetsLoaded(Ok(()))) => {
                log::info!("Assets loaded");
                self.change_phase(GamePhase::Welcome);
            }
            (GamePhase::Loading, Command::AssetsLoaded(Err(message))) => {
                log::error!("{}", GameError::AssetLoad(message));
            }
            (GamePhase::Welcome, Command::Start) => self.start_run(),
            (GamePhase::Lost | GamePhase::HighScore, Command::Retry) => self.start_run(),
            (GamePhase::Paused, Command::Resume) => self.resume(),
            (GamePhase::Lost, Command::HighScoreSubmitted(true)) => {
                self.change_phase(GamePhase::HighScore);
            }
            (GamePhase::Lost, Command::HighScoreSubmitted(false)) => {
                log::warn!("Score submission failed");
            }
            (phase, command) => {
                log::warn!("Ignoring {:?} in {:?}", command, phase);
            }
        }
    }

    /// Move to `to`, swapping the bound menus. Re-entering the same phase is silent.
    pub fn change_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        if let Some(menu) = from.menu() {
            self.push_event(GameEvent::MenuUnbound(menu));
        }
        self.phase = to;
        if let Some(menu) = to.menu() {
            self.push_event(GameEvent::MenuBound(menu));
        }
        self.push_event(GameEvent::PhaseChanged { from, to });
        log::info!("Phase {:?} -> {:?}", from, to);
    }

    /// Fresh progression, fresh player, first level
    pub fn start_run(&mut self) {
        self.progression = Progression::new(&self.tuning);
        self.player = Player::new(&self.tuning, self.progression.player_fire_rate_ms);
        self.run_log.clear();
        log::info!("Run started (seed {})", self.seed);
        self.enter_level();
        self.push_event(GameEvent::Music(MusicCue::Play));
    }

    /// Build the current level and switch to its phase
    pub fn enter_level(&mut self) {
        let level = self.progression.level;
        self.enemies.clear();
        self.enemy_missiles.clear();
        self.boss = None;
        self.player.respawn(&self.tuning);
        self.blocks = generate_blocks(self);
        self.descent.reset(self.now_ms);

        if self.progression.is_boss_level() {
            let velocity = self.progression.enemy_velocity + BOSS_SPEED_BONUS;
            self.boss = Some(Boss::new(&self.tuning, velocity));
            self.play(SoundEffect::Laugh);
            log::info!("Level {}: boss encounter", level);
            self.change_phase(GamePhase::Boss);
        } else {
            self.enemies = generate_formation(self);
            log::info!("Level {}: {} enemies, {} blocks", level, self.enemies.len(), self.blocks.len());
            self.change_phase(GamePhase::Playing);
        }
    }

    /// Level cleared: scale difficulty and build the next level.
    ///
    /// At most one level-up per frame; repeated calls in the same frame do nothing.
    pub fn win(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        if !self.progression.level_up(self.frame) {
            log::debug!("Level-up already applied on frame {}", self.frame);
            return;
        }
        let cleared = self.progression.level - 1;
        self.run_log.push(LevelLog {
            level: cleared,
            score: self.progression.score,
            frame: self.frame,
        });
        self.push_event(GameEvent::LevelCleared { level: cleared });

        let p = &self.progression;
        log::info!(
            "Level {} cleared: velocity {:.2}, fire rate {:.2}, descent {:.0}ms, player rate {:.0}ms, reward {}",
            cleared,
            p.enemy_velocity,
            p.enemy_fire_rate,
            p.descent_interval_ms,
            p.player_fire_rate_ms,
            p.reward_per_kill
        );

        self.player.set_base_fire_rate(self.progression.player_fire_rate_ms);
        self.enter_level();
    }

    /// End the run. Only an active level can be lost, so several loss
    /// conditions in one frame produce one transition.
    pub fn lose(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        let score = self.progression.score;
        let level = self.progression.level;
        self.last_run = Some(RunSummary {
            score,
            level,
            log: std::mem::take(&mut self.run_log),
        });
        self.push_event(GameEvent::Lost { score, level });
        self.play(SoundEffect::Lose);
        self.push_event(GameEvent::Music(MusicCue::Stop));
        log::info!("Run lost at level {} with {} points", level, score);

        self.progression = Progression::new(&self.tuning);
        self.change_phase(GamePhase::Lost);
    }

    /// Toggle between an active level and the pause menu
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing | GamePhase::Boss => {
                self.resume_phase = Some(self.phase);
                self.push_event(GameEvent::Music(MusicCue::Stop));
                self.change_phase(GamePhase::Paused);
            }
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Leave the pause menu; the descent clock restarts so no drop is owed
    pub fn resume(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        let to = self.resume_phase.take().unwrap_or(GamePhase::Playing);
        self.descent.reset(self.now_ms);
        self.push_event(GameEvent::Music(MusicCue::Play));
        self.change_phase(to);
    }

    /// Build a submission from the last lost run, hand it to `service` and
    /// apply the outcome. Returns whether the service accepted it.
    pub fn submit_score<S: ScoreService>(&mut self, service: &mut S, name: &str, email: &str) -> Result<bool> {
        let Some(run) = self.last_run.as_ref() else {
            log::warn!("No finished run to submit");
            return Ok(false);
        };
        let submission = ScoreSubmission::new(name, email, run)?;
        let accepted = service.submit(&submission);
        self.handle(Command::HighScoreSubmitted(accepted));
        Ok(accepted)
    }
}

/// The 12x6 formation, with one random slot per item kind
pub fn generate_formation(state: &mut GameState) -> Vec<Enemy> {
    let total = (FORMATION_COLUMNS * FORMATION_ROWS) as usize;
    let slots = index::sample(state.rng_state.rng_mut(), total, WAVE_ITEMS.len());
    let mut kinds = vec![EnemyKind::Attacker; total];
    for (slot, item) in slots.into_iter().zip(WAVE_ITEMS) {
        kinds[slot] = EnemyKind::Item(item);
    }

    let left = state.tuning.canvas_width / 32.0;
    let velocity = state.progression.enemy_velocity;
    let mut enemies = Vec::with_capacity(total);
    for column in 0..FORMATION_COLUMNS {
        for row in 0..FORMATION_ROWS {
            let center = Vec2::new(
                left + column as f32 * FORMATION_SPACING,
                FORMATION_TOP + row as f32 * FORMATION_SPACING,
            );
            let kind = kinds[(column * FORMATION_ROWS + row) as usize];
            let id = state.next_entity_id();
            enemies.push(Enemy::new(id, column, row, center, velocity, kind));
        }
    }
    enemies
}

/// Cover blocks from `BLOCK_LAYOUT`
pub fn generate_blocks(state: &mut GameState) -> Vec<Block> {
    let width = state.tuning.canvas_width;
    let origin = Vec2::new(width / 8.0, (width / 32.0) * 23.0);
    let pitch = BLOCK_SIZE + BLOCK_GAP;
    let mut blocks = Vec::new();
    for (row, line) in BLOCK_LAYOUT.iter().enumerate() {
        for (col, cell) in line.chars().enumerate() {
            if cell != '1' {
                continue;
            }
            let center = origin + Vec2::new(col as f32, row as f32) * pitch;
            let id = state.next_entity_id();
            blocks.push(Block::new(id, center));
        }
    }
    blocks
}
