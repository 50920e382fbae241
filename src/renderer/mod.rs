//! Render collaborator contract
//!
//! The simulation does not rasterize anything. Each frame `render_frame` walks
//! the state in draw order and issues sprite, rectangle and text calls against
//! a host `Canvas` (an HTML canvas, a terminal, a test recorder).

pub mod hud;

use glam::Vec2;

use crate::sim::{BossState, EnemyKind, GamePhase, GameState, ItemKind, Owner};

/// RGBA color, components in `0..=1`
pub type Color = [f32; 4];

/// Sprite ids the host maps to loaded textures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Player,
    PlayerMissile,
    Attacker,
    FireBoost,
    RowDestroyer,
    SpreadFire,
    EnemyMissile,
    Boss,
    BossShocked,
    BossMissile,
    Block,
}

impl Sprite {
    pub fn for_enemy(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Attacker => Sprite::Attacker,
            EnemyKind::Item(ItemKind::FireBoost) => Sprite::FireBoost,
            EnemyKind::Item(ItemKind::RowDestroyer) => Sprite::RowDestroyer,
            EnemyKind::Item(ItemKind::SpreadFire) => Sprite::SpreadFire,
        }
    }
}

/// Axis-aligned rectangle, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

/// Host drawing surface
pub trait Canvas {
    fn clear(&mut self);
    fn sprite(&mut self, sprite: Sprite, rect: Rect);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color);
    fn text(&mut self, text: &str, pos: Vec2, align: TextAlign);
}

/// Draw one frame: cover, formation or boss, projectiles, player, then the HUD.
///
/// The field is only drawn during a level (paused included); menu phases get
/// the HUD alone.
pub fn render_frame<C: Canvas>(canvas: &mut C, state: &GameState) {
    canvas.clear();
    if state.phase.is_active() || state.phase == GamePhase::Paused {
        draw_field(canvas, state);
    }
    hud::draw(canvas, state);
}

fn draw_field<C: Canvas>(canvas: &mut C, state: &GameState) {
    for block in &state.blocks {
        canvas.sprite(Sprite::Block, Rect::new(block.body.pos, block.body.size));
    }

    for enemy in &state.enemies {
        canvas.sprite(Sprite::for_enemy(enemy.kind), Rect::new(enemy.body.pos, enemy.body.size));
    }

    if let Some(boss) = &state.boss {
        match boss.state() {
            BossState::Normal => canvas.sprite(Sprite::Boss, Rect::new(boss.body.pos, boss.body.size)),
            BossState::Shocked => {
                canvas.sprite(Sprite::BossShocked, Rect::new(boss.body.pos, boss.body.size))
            }
            BossState::Dead => {}
        }
    }

    for missile in &state.enemy_missiles {
        let sprite = match missile.owner {
            Owner::Boss => Sprite::BossMissile,
            _ => Sprite::EnemyMissile,
        };
        canvas.sprite(sprite, Rect::new(missile.body.pos, missile.body.size));
    }

    let player = &state.player;
    canvas.sprite(Sprite::Player, Rect::new(player.body.pos, player.body.size));
    for missile in &player.missiles {
        canvas.sprite(Sprite::PlayerMissile, Rect::new(missile.body.pos, missile.body.size));
    }
}
