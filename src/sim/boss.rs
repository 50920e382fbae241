//! Boss encounter: health pool, shocked reaction, edge bounce and descent

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Owner, Projectile};
use super::state::EntityIds;
use crate::consts::*;
use crate::settings::Tuning;

/// Observable boss state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossState {
    Normal,
    /// Briefly after each hit
    Shocked,
    Dead,
}

/// The boss entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub body: Body,
    pub health: u32,
    pub max_health: u32,
    pub shocked: bool,
    pub shocked_until: u64,
    shock_ms: u64,
    canvas_width: f32,
}

impl Boss {
    /// Spawn at the upper centre of the canvas, heading right
    pub fn new(tuning: &Tuning, velocity: f32) -> Self {
        let center = Vec2::new(tuning.canvas_width / 2.0, FORMATION_TOP + BOSS_SIZE / 2.0);
        let mut body = Body::centered(center, Vec2::splat(BOSS_SIZE)).with_motion(Vec2::X, velocity);
        // No health pool means nothing to fight
        body.dead = tuning.boss_health == 0;
        Self {
            body,
            health: tuning.boss_health,
            max_health: tuning.boss_health,
            shocked: false,
            shocked_until: 0,
            shock_ms: tuning.boss_shock_ms,
            canvas_width: tuning.canvas_width,
        }
    }

    pub fn state(&self) -> BossState {
        if self.body.dead {
            BossState::Dead
        } else if self.shocked {
            BossState::Shocked
        } else {
            BossState::Normal
        }
    }

    /// Fraction of health left (for the health bar)
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.max_health.max(1) as f32
    }

    /// Take a hit from `other` if it overlaps.
    ///
    /// Each hit costs exactly one health point and starts the shock timer; the
    /// boss dies when health reaches zero. A dead boss absorbs nothing.
    pub fn hit(&mut self, other: &Body, now_ms: u64) -> bool {
        if self.body.dead || !self.body.overlaps(other) {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        self.shocked = true;
        self.shocked_until = now_ms + self.shock_ms;
        if self.health == 0 {
            self.body.dead = true;
            log::info!("Boss defeated");
        }
        true
    }

    /// Clear the shock once its timer has passed
    pub fn update_shock(&mut self, now_ms: u64) {
        if self.shocked && now_ms > self.shocked_until {
            self.shocked = false;
        }
    }

    /// Bounce between the canvas edges; drop a fifth of the height on descent
    pub fn step(&mut self, descend: bool) {
        let body = &mut self.body;
        if body.left() <= 0.0 {
            body.direction.x = 1.0;
        }
        if body.right() >= self.canvas_width {
            body.direction.x = -1.0;
        }
        if descend {
            body.pos.y += body.size.y / 5.0;
        }
        body.pos.x += body.direction.x * body.velocity;
    }

    /// Roll for a shot aimed down at the player
    pub fn fire<R: Rng>(&self, rng: &mut R, fire_rate: f32, speed: f32, ids: &mut EntityIds) -> Option<Projectile> {
        if self.body.dead {
            return None;
        }
        let roll: f32 = rng.random();
        if roll >= BOSS_FIRE_FACTOR / fire_rate {
            return None;
        }
        let origin = Vec2::new(self.body.pos.x + self.body.size.x / 2.0, self.body.bottom());
        Some(Projectile::new(
            ids.next(),
            Owner::Boss,
            origin,
            Vec2::splat(BOSS_MISSILE_SIZE),
            Vec2::Y,
            speed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn boss() -> Boss {
        Boss::new(&Tuning::default(), 2.0)
    }

    fn missile_on(boss: &Boss) -> Body {
        Body::centered(boss.body.center(), Vec2::splat(10.0))
    }

    #[test]
    fn test_hit_shocks_and_costs_one() {
        let mut b = boss();
        let m = missile_on(&b);
        assert!(b.hit(&m, 1_000));
        assert_eq!(b.health, 19);
        assert_eq!(b.state(), BossState::Shocked);
        assert_eq!(b.shocked_until, 1_300);

        b.update_shock(1_300);
        assert!(b.shocked);
        b.update_shock(1_301);
        assert_eq!(b.state(), BossState::Normal);
    }

    #[test]
    fn test_miss_changes_nothing() {
        let mut b = boss();
        let far = Body::at(Vec2::new(0.0, 900.0), Vec2::splat(10.0));
        assert!(!b.hit(&far, 0));
        assert_eq!(b.health, 20);
        assert!(!b.shocked);
    }

    #[test]
    fn test_dies_on_last_point() {
        let mut b = boss();
        let m = missile_on(&b);
        for _ in 0..19 {
            assert!(b.hit(&m, 0));
            assert!(!b.body.dead);
        }
        assert_eq!(b.health, 1);
        assert!(b.hit(&m, 0));
        assert_eq!(b.health, 0);
        assert_eq!(b.state(), BossState::Dead);

        // Dead boss absorbs nothing more
        assert!(!b.hit(&m, 0));
        assert_eq!(b.health, 0);
    }

    #[test]
    fn test_zero_health_spawns_dead() {
        let tuning = Tuning {
            boss_health: 0,
            ..Tuning::default()
        };
        let mut b = Boss::new(&tuning, 2.0);
        assert_eq!(b.state(), BossState::Dead);
        let m = missile_on(&b);
        assert!(!b.hit(&m, 0));
        assert_eq!(b.health, 0);
    }

    #[test]
    fn test_bounces_off_edges() {
        let mut b = boss();
        b.body.pos.x = CANVAS_WIDTH - BOSS_SIZE;
        b.step(false);
        assert_eq!(b.body.direction.x, -1.0);
        assert_eq!(b.body.pos.x, CANVAS_WIDTH - BOSS_SIZE - 2.0);

        b.body.pos.x = 0.0;
        b.step(false);
        assert_eq!(b.body.direction.x, 1.0);
        assert_eq!(b.body.pos.x, 2.0);
    }

    #[test]
    fn test_descent_is_fifth_of_height() {
        let mut b = boss();
        let y = b.body.pos.y;
        b.step(true);
        assert_eq!(b.body.pos.y, y + BOSS_SIZE / 5.0);
    }

    #[test]
    fn test_fire_always_at_minimum_rate() {
        let b = boss();
        let mut rng = Pcg32::seed_from_u64(3);
        // 12 / 12 = certain
        let mut ids = EntityIds::default();
        let shot = b.fire(&mut rng, 12.0, 8.0, &mut ids).expect("certain shot");
        assert_eq!(shot.id, 1);
        assert_eq!(shot.owner, Owner::Boss);
        assert_eq!(shot.body.direction, Vec2::Y);
        assert_eq!(shot.body.center().y, b.body.bottom());
    }

    proptest! {
        #[test]
        fn prop_health_never_negative(hits in 0usize..60) {
            let mut b = boss();
            let m = missile_on(&b);
            let mut prev = b.health;
            for _ in 0..hits {
                let landed = b.hit(&m, 0);
                if landed {
                    prop_assert_eq!(b.health, prev - 1);
                } else {
                    prop_assert_eq!(b.health, prev);
                }
                prop_assert_eq!(b.body.dead, b.health == 0);
                prev = b.health;
            }
        }
    }
}
