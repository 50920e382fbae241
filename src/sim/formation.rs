//! Formation movement and fire selection
//!
//! Columns swing in lock-step around their anchors (a bounded ping-pong, not
//! edge to edge), the whole grid drops one enemy height on each descent, and
//! only the front enemy of each column may roll to fire.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Projectile;
use super::state::{EntityIds, Enemy};

/// Shared descent clock
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescentTimer {
    pub last_ms: u64,
}

impl DescentTimer {
    pub fn reset(&mut self, now_ms: u64) {
        self.last_ms = now_ms;
    }

    /// True once `interval_ms` has elapsed since the last trigger; restarts the clock
    pub fn due(&mut self, now_ms: u64, interval_ms: f32) -> bool {
        if (now_ms.saturating_sub(self.last_ms) as f32) < interval_ms {
            return false;
        }
        self.last_ms = now_ms;
        true
    }
}

/// Enemy indices grouped by column, in column order
fn columns(enemies: &[Enemy]) -> BTreeMap<u32, Vec<usize>> {
    let mut cols: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, enemy) in enemies.iter().enumerate() {
        cols.entry(enemy.column).or_default().push(i);
    }
    cols
}

/// Move every column one tick along its swing.
///
/// The first member of a column is its reference: its next displacement is
/// clamped to `±amplitude` (reversing direction at the bound) and the whole
/// column adopts that displacement and direction.
pub fn oscillate(enemies: &mut [Enemy], amplitude: f32) {
    for members in columns(enemies).values() {
        let reference = &enemies[members[0]];
        let mut direction = reference.body.direction.x;
        let mut offset = reference.displacement() + direction * reference.body.velocity;
        if offset >= amplitude {
            offset = amplitude;
            direction = -1.0;
        } else if offset <= -amplitude {
            offset = -amplitude;
            direction = 1.0;
        }

        for &i in members {
            let enemy = &mut enemies[i];
            enemy.body.pos.x = enemy.anchor_x + offset;
            enemy.body.direction.x = direction;
        }
    }
}

/// Drop the whole grid by one enemy height
pub fn descend(enemies: &mut [Enemy]) {
    for enemy in enemies.iter_mut() {
        enemy.body.pos.y += enemy.body.size.y;
    }
}

/// One formation tick: optional descent, then the swing
pub fn update(enemies: &mut [Enemy], amplitude: f32, descend_now: bool) {
    if descend_now {
        descend(enemies);
        log::debug!("Formation descends ({} enemies)", enemies.len());
    }
    oscillate(enemies, amplitude);
}

/// Index of the front (highest row) enemy of each column, in column order
pub fn front_enemies(enemies: &[Enemy]) -> Vec<usize> {
    columns(enemies)
        .values()
        .filter_map(|members| members.iter().copied().max_by_key(|&i| enemies[i].row))
        .collect()
}

/// Centre x of the front enemy nearest to `x`
pub fn front_enemy_x(enemies: &[Enemy], x: f32) -> Option<f32> {
    front_enemies(enemies)
        .into_iter()
        .map(|i| enemies[i].body.center().x)
        .min_by(|a, b| (a - x).abs().total_cmp(&(b - x).abs()))
}

/// Each front enemy rolls with probability `1 / fire_rate`; attackers that
/// win the roll fire.
pub fn roll_fire<R: Rng>(
    enemies: &[Enemy],
    fire_rate: f32,
    missile_speed: f32,
    rng: &mut R,
    ids: &mut EntityIds,
) -> Vec<Projectile> {
    let chance = 1.0 / fire_rate;
    let mut shots = Vec::new();
    for i in front_enemies(enemies) {
        let roll: f32 = rng.random();
        if roll >= chance || !enemies[i].kind.fires() {
            continue;
        }
        if let Some(shot) = enemies[i].fire(ids.next(), missile_speed) {
            shots.push(shot);
        }
    }
    shots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EnemyKind, ItemKind};
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grid(cols: u32, rows: u32, velocity: f32) -> Vec<Enemy> {
        let mut ids = EntityIds::default();
        let mut enemies = Vec::new();
        for c in 0..cols {
            for r in 0..rows {
                let center = Vec2::new(200.0 + c as f32 * 44.0, 64.0 + r as f32 * 44.0);
                enemies.push(Enemy::new(ids.next(), c, r, center, velocity, EnemyKind::Attacker));
            }
        }
        enemies
    }

    #[test]
    fn test_descent_timer() {
        let mut timer = DescentTimer::default();
        timer.reset(1_000);
        assert!(!timer.due(8_499, 7_500.0));
        assert!(timer.due(8_500, 7_500.0));
        assert_eq!(timer.last_ms, 8_500);
        assert!(!timer.due(8_501, 7_500.0));
    }

    #[test]
    fn test_columns_move_in_lockstep() {
        let mut enemies = grid(3, 4, 1.5);
        for _ in 0..50 {
            oscillate(&mut enemies, 160.0);
        }
        for e in &enemies {
            assert_eq!(e.displacement(), 75.0);
            assert_eq!(e.body.direction.x, 1.0);
        }
    }

    #[test]
    fn test_direction_flips_at_amplitude() {
        let mut enemies = grid(1, 2, 1.0);
        for _ in 0..160 {
            oscillate(&mut enemies, 160.0);
        }
        assert_eq!(enemies[0].displacement(), 160.0);
        assert_eq!(enemies[0].body.direction.x, -1.0);
        oscillate(&mut enemies, 160.0);
        assert_eq!(enemies[0].displacement(), 159.0);
        assert_eq!(enemies[1].displacement(), 159.0);
    }

    #[test]
    fn test_descend_drops_full_height() {
        let mut enemies = grid(2, 2, 1.0);
        let ys: Vec<f32> = enemies.iter().map(|e| e.body.pos.y).collect();
        update(&mut enemies, 160.0, true);
        for (e, y) in enemies.iter().zip(ys) {
            assert_eq!(e.body.pos.y, y + 40.0);
        }
    }

    #[test]
    fn test_front_enemy_is_highest_row() {
        let mut enemies = grid(3, 3, 1.0);
        // Kill the bottom of column 1
        enemies.retain(|e| !(e.column == 1 && e.row == 2));
        let fronts: Vec<(u32, u32)> = front_enemies(&enemies)
            .into_iter()
            .map(|i| (enemies[i].column, enemies[i].row))
            .collect();
        assert_eq!(fronts, vec![(0, 2), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_nearest_front_enemy() {
        let enemies = grid(3, 2, 1.0);
        assert_eq!(front_enemy_x(&enemies, 250.0), Some(244.0));
        assert_eq!(front_enemy_x(&enemies, 0.0), Some(200.0));
        assert_eq!(front_enemy_x(&[], 0.0), None);
    }

    #[test]
    fn test_only_front_attackers_fire() {
        let mut enemies = grid(2, 2, 1.0);
        // Front of column 0 is an item
        enemies[1].kind = EnemyKind::Item(ItemKind::SpreadFire);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ids = EntityIds::default();
        // fire_rate 1.0 = certain roll
        let shots = roll_fire(&enemies, 1.0, 5.0, &mut rng, &mut ids);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].owner, crate::sim::Owner::Enemy { id: enemies[3].id });
    }

    #[test]
    fn test_high_fire_rate_rarely_fires() {
        let enemies = grid(12, 6, 1.0);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut ids = EntityIds::default();
        let mut total = 0;
        for _ in 0..1000 {
            total += roll_fire(&enemies, 40.0, 5.0, &mut rng, &mut ids).len();
        }
        // Expected 12 * 1000 / 40 = 300
        assert!((150..450).contains(&total), "total shots {total}");
    }

    proptest! {
        #[test]
        fn prop_displacement_bounded(velocity in 0.1f32..20.0, ticks in 1usize..2000) {
            let mut enemies = grid(2, 2, velocity);
            for _ in 0..ticks {
                oscillate(&mut enemies, 160.0);
                for e in &enemies {
                    prop_assert!(e.displacement().abs() <= 160.0 + 1e-3);
                }
            }
        }
    }
}
