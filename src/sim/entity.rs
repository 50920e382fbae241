//! Shared body geometry and projectiles
//!
//! Every entity carries a `Body`: a top-left anchored axis-aligned box with a
//! direction, a scalar velocity and a dead flag. Kind-specific data lives in
//! the owning struct (`Player`, `Enemy`, `Boss`, `Block`, `Projectile`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{aabb_overlap, centered};

/// Axis-aligned body shared by all entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height (both positive)
    pub size: Vec2,
    /// Movement direction (not necessarily normalized)
    pub direction: Vec2,
    /// Scalar speed
    pub velocity: f32,
    pub dead: bool,
}

impl Body {
    /// Create a body centred on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0, "body size must be positive");
        Self {
            pos: centered(center, size),
            size,
            direction: Vec2::ZERO,
            velocity: 1.0,
            dead: false,
        }
    }

    /// Create a body from its top-left corner
    pub fn at(pos: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0, "body size must be positive");
        Self {
            pos,
            size,
            direction: Vec2::ZERO,
            velocity: 1.0,
            dead: false,
        }
    }

    pub fn with_motion(mut self, direction: Vec2, velocity: f32) -> Self {
        self.direction = direction;
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Pure overlap test (strict on all edges)
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        aabb_overlap(self.pos, self.size, other.pos, other.size)
    }

    /// Overlap test that marks `self` dead on contact.
    ///
    /// Only the callee dies: `a.hit(&b)` never touches `b`.
    pub fn hit(&mut self, other: &Body) -> bool {
        let hit = self.overlaps(other);
        if hit {
            self.dead = true;
        }
        hit
    }

    /// Per-tick integration: `pos += direction * velocity`
    pub fn step(&mut self) {
        self.pos += self.direction * self.velocity;
    }
}

/// Who fired a projectile (used to pick collision targets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy { id: u32 },
    Boss,
}

/// A projectile with fixed direction and speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: Owner,
    pub body: Body,
}

impl Projectile {
    /// Spawn a projectile centred on `origin`
    pub fn new(id: u32, owner: Owner, origin: Vec2, size: Vec2, direction: Vec2, velocity: f32) -> Self {
        Self {
            id,
            owner,
            body: Body::centered(origin, size).with_motion(direction, velocity),
        }
    }

    pub fn step(&mut self) {
        self.body.step();
    }

    /// True once the projectile has fully left the vertical play bounds
    pub fn out_of_bounds(&self, canvas_height: f32) -> bool {
        self.body.bottom() <= 0.0 || self.body.top() >= canvas_height
    }

    pub fn is_hostile(&self) -> bool {
        self.owner != Owner::Player
    }
}
