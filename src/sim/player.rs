//! The player's ship: horizontal movement, rate-limited fire and timed buffs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Owner, Projectile};
use super::state::EntityIds;
use crate::consts::*;
use crate::settings::Tuning;

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Projectiles in flight
    pub missiles: Vec<Projectile>,
    /// Level's fire rate (ms between shots); buffs revert to this
    pub base_fire_rate_ms: f32,
    /// Fire rate currently in effect
    pub fire_rate_ms: f32,
    pub last_fire_ms: Option<u64>,
    /// Fast-fire buff expiry
    pub fast_fire_until: Option<u64>,
    /// Spread-fire buff expiry
    pub spread_fire_until: Option<u64>,
    canvas_width: f32,
    missile_speed: f32,
}

impl Player {
    /// Spawn at the bottom centre of the canvas
    pub fn new(tuning: &Tuning, fire_rate_ms: f32) -> Self {
        Self {
            body: spawn_body(tuning),
            missiles: Vec::new(),
            base_fire_rate_ms: fire_rate_ms,
            fire_rate_ms,
            last_fire_ms: None,
            fast_fire_until: None,
            spread_fire_until: None,
            canvas_width: tuning.canvas_width,
            missile_speed: tuning.player_missile_speed,
        }
    }

    /// Back to the spawn point with no projectiles in flight; buffs are kept
    pub fn respawn(&mut self, tuning: &Tuning) {
        self.body = spawn_body(tuning);
        self.missiles.clear();
    }

    /// Set horizontal direction from the held keys (left wins over right)
    pub fn steer(&mut self, left: bool, right: bool) {
        self.body.direction.x = if left {
            -1.0
        } else if right {
            1.0
        } else {
            0.0
        };
    }

    /// Integrate horizontal motion over `dt` seconds, clamped to the canvas
    pub fn move_by(&mut self, dt: f32) {
        let body = &mut self.body;
        body.pos.x += body.direction.x * body.velocity * dt;
        let max_x = (self.canvas_width - body.size.x).max(0.0);
        body.pos.x = body.pos.x.clamp(0.0, max_x);
    }

    pub fn fast_fire_active(&self, now_ms: u64) -> bool {
        self.fast_fire_until.is_some_and(|until| now_ms < until)
    }

    pub fn spread_fire_active(&self, now_ms: u64) -> bool {
        self.spread_fire_until.is_some_and(|until| now_ms < until)
    }

    /// Try to fire. Returns true when a volley was emitted.
    pub fn fire(&mut self, now_ms: u64, ids: &mut EntityIds) -> bool {
        let cooling = self
            .last_fire_ms
            .is_some_and(|last| (now_ms.saturating_sub(last) as f32) < self.fire_rate_ms);
        if cooling {
            return false;
        }

        let origin = Vec2::new(self.body.pos.x + self.body.size.x / 2.0, self.body.pos.y);
        let offsets: &[f32] = if self.spread_fire_active(now_ms) {
            &[-SPREAD_OFFSET, 0.0, SPREAD_OFFSET]
        } else {
            &[0.0]
        };
        for &dx in offsets {
            self.missiles.push(Projectile::new(
                ids.next(),
                Owner::Player,
                origin,
                Vec2::splat(PLAYER_MISSILE_SIZE),
                Vec2::new(dx, -1.0),
                self.missile_speed,
            ));
        }
        self.last_fire_ms = Some(now_ms);
        true
    }

    /// Fast-fire buff: shorter cooldown until `now + duration`
    pub fn shoot_fast(&mut self, now_ms: u64, duration_ms: u64) {
        self.fire_rate_ms = (self.base_fire_rate_ms / FAST_FIRE_DIVISOR).max(MIN_PLAYER_FIRE_RATE_MS);
        self.fast_fire_until = Some(now_ms + duration_ms);
    }

    /// Spread buff: three-projectile fan until `now + duration`
    pub fn shoot_triple(&mut self, now_ms: u64, duration_ms: u64) {
        self.spread_fire_until = Some(now_ms + duration_ms);
    }

    /// Expire buffs whose time is up
    pub fn update_buffs(&mut self, now_ms: u64) {
        if self.fast_fire_until.is_some() && !self.fast_fire_active(now_ms) {
            self.fast_fire_until = None;
            self.fire_rate_ms = self.base_fire_rate_ms;
        }
        if self.spread_fire_until.is_some() && !self.spread_fire_active(now_ms) {
            self.spread_fire_until = None;
        }
    }

    /// Adopt a new progression fire rate; an active fast-fire buff keeps its speedup
    pub fn set_base_fire_rate(&mut self, rate_ms: f32) {
        self.base_fire_rate_ms = rate_ms;
        self.fire_rate_ms = if self.fast_fire_until.is_some() {
            (rate_ms / FAST_FIRE_DIVISOR).max(MIN_PLAYER_FIRE_RATE_MS)
        } else {
            rate_ms
        };
    }

    /// Move projectiles one tick and drop those that left the screen
    pub fn advance_missiles(&mut self, canvas_height: f32) {
        for missile in &mut self.missiles {
            missile.step();
        }
        self.missiles.retain(|m| !m.out_of_bounds(canvas_height));
    }
}

fn spawn_body(tuning: &Tuning) -> Body {
    let center = Vec2::new(
        tuning.canvas_width / 2.0,
        tuning.canvas_height - PLAYER_BOTTOM_OFFSET,
    );
    Body::centered(center, Vec2::splat(PLAYER_SIZE)).with_motion(Vec2::ZERO, tuning.player_speed)
}
