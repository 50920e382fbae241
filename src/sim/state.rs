//! Game state and core simulation types
//!
//! The state machine owns every entity collection and the progression state.
//! Entities never point back at the state; side effects leave as `GameEvent`s.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::entity::{Body, Owner, Projectile};
use super::formation::DescentTimer;
use super::player::Player;
use super::progression::Progression;
use crate::audio::{MusicCue, SoundEffect};
use crate::consts::*;
use crate::settings::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for assets
    Loading,
    /// Title menu
    Welcome,
    /// Standard formation wave
    Playing,
    /// Boss encounter
    Boss,
    /// Game is paused
    Paused,
    /// Run ended
    Lost,
    /// Score submitted, leaderboard showing
    HighScore,
}

impl GamePhase {
    /// Phases in which the simulation advances
    pub fn is_active(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Boss)
    }

    /// Menu collaborator bound while in this phase
    pub fn menu(&self) -> Option<Menu> {
        match self {
            GamePhase::Welcome => Some(Menu::Welcome),
            GamePhase::Paused => Some(Menu::Pause),
            GamePhase::Lost => Some(Menu::Lost),
            GamePhase::HighScore => Some(Menu::HighScore),
            GamePhase::Loading | GamePhase::Playing | GamePhase::Boss => None,
        }
    }
}

/// Externally owned menu overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Menu {
    Welcome,
    Pause,
    Lost,
    HighScore,
}

/// Side effects emitted by the simulation, drained by the host each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    Music(MusicCue),
    MenuBound(Menu),
    MenuUnbound(Menu),
    PhaseChanged { from: GamePhase, to: GamePhase },
    LevelCleared { level: u32 },
    Lost { score: u64, level: u32 },
}

/// Item types hidden in the formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Temporary fire-rate boost
    FireBoost,
    /// Destroys its whole row
    RowDestroyer,
    /// Temporary three-way shot
    SpreadFire,
}

/// Formation member types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Attacker,
    Item(ItemKind),
}

impl EnemyKind {
    /// Numeric type code (0 = attacker, 1 = fire boost, 2 = row destroyer, 3 = spread fire)
    pub fn code(&self) -> u8 {
        match self {
            EnemyKind::Attacker => 0,
            EnemyKind::Item(ItemKind::FireBoost) => 1,
            EnemyKind::Item(ItemKind::RowDestroyer) => 2,
            EnemyKind::Item(ItemKind::SpreadFire) => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(EnemyKind::Attacker),
            1 => Some(EnemyKind::Item(ItemKind::FireBoost)),
            2 => Some(EnemyKind::Item(ItemKind::RowDestroyer)),
            3 => Some(EnemyKind::Item(ItemKind::SpreadFire)),
            _ => None,
        }
    }

    /// Only attackers shoot; items are pickups
    pub fn fires(&self) -> bool {
        matches!(self, EnemyKind::Attacker)
    }
}

/// A formation member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    pub column: u32,
    pub row: u32,
    /// Spawn x (top-left), centre of the oscillation
    pub anchor_x: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    /// Spawn centred on `center`, moving right
    pub fn new(id: u32, column: u32, row: u32, center: Vec2, velocity: f32, kind: EnemyKind) -> Self {
        let body = Body::centered(center, Vec2::splat(ENEMY_SIZE)).with_motion(Vec2::X, velocity);
        Self {
            id,
            anchor_x: body.pos.x,
            body,
            column,
            row,
            kind,
        }
    }

    /// Enemies die on any hit
    pub fn hit(&mut self, other: &Body) -> bool {
        self.body.hit(other)
    }

    /// Horizontal offset from the anchor
    pub fn displacement(&self) -> f32 {
        self.body.pos.x - self.anchor_x
    }

    /// Projectile launched from the bottom centre, heading down
    pub fn fire(&self, id: u32, speed: f32) -> Option<Projectile> {
        if !self.kind.fires() {
            return None;
        }
        let origin = Vec2::new(self.body.pos.x + self.body.size.x / 2.0, self.body.bottom());
        Some(Projectile::new(
            id,
            Owner::Enemy { id: self.id },
            origin,
            Vec2::new(ENEMY_MISSILE_WIDTH, ENEMY_MISSILE_HEIGHT),
            Vec2::Y,
            speed,
        ))
    }
}

/// Static destructible cover
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub body: Body,
}

impl Block {
    pub fn new(id: u32, center: Vec2) -> Self {
        Self {
            id,
            body: Body::centered(center, Vec2::splat(BLOCK_SIZE)).with_motion(Vec2::ZERO, 0.0),
        }
    }

    /// Blocks die on any hit
    pub fn hit(&mut self, other: &Body) -> bool {
        self.body.hit(other)
    }
}

/// Entity id allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Snapshot taken at each level clear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLog {
    pub level: u32,
    pub score: u64,
    pub frame: u64,
}

/// Outcome of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub level: u32,
    pub log: Vec<LevelLog>,
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Phase to return to when unpausing
    pub(crate) resume_phase: Option<GamePhase>,
    /// Simulation tick counter
    pub frame: u64,
    /// Timestamp of the current tick (ms)
    pub now_ms: u64,
    /// Level, score and difficulty
    pub progression: Progression,
    pub player: Player,
    /// Formation (empty on boss levels)
    pub enemies: Vec<Enemy>,
    /// Projectiles fired by enemies and the boss
    pub enemy_missiles: Vec<Projectile>,
    pub blocks: Vec<Block>,
    /// Present on boss levels
    pub boss: Option<Boss>,
    /// Shared descent clock for formation and boss
    pub descent: DescentTimer,
    /// Level clears of the current run
    pub run_log: Vec<LevelLog>,
    /// Summary of the last lost run
    pub last_run: Option<RunSummary>,
    /// Pending side effects
    pub events: Vec<GameEvent>,
    pub ids: EntityIds,
    pub rng_state: RngState,
}

/// Seeded generator and its current stream position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    rng: Pcg32,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Fresh generator at the start of the seed's stream
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}

impl GameState {
    /// Create a new game state in the loading phase
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let progression = Progression::new(&tuning);
        let player = Player::new(&tuning, progression.player_fire_rate_ms);
        Self {
            seed,
            phase: GamePhase::Loading,
            resume_phase: None,
            frame: 0,
            now_ms: 0,
            progression,
            player,
            enemies: Vec::new(),
            enemy_missiles: Vec::new(),
            blocks: Vec::new(),
            boss: None,
            descent: DescentTimer::default(),
            run_log: Vec::new(),
            last_run: None,
            events: Vec::new(),
            ids: EntityIds::default(),
            rng_state: RngState::new(seed),
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound(effect));
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn score(&self) -> u64 {
        self.progression.score
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    /// JSON snapshot for debugging and replays
    pub fn snapshot_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
