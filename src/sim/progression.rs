//! Level progression, difficulty scaling and kill rewards

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Tuning;

/// Levels below this grow the kill reward linearly
pub const LINEAR_REWARD_LEVELS: u32 = 8;
/// Linear reward growth per level
pub const LINEAR_REWARD_STEP: u64 = 4;

const REWARD_MODULUS: f64 = 1e6;
const REWARD_DEPTH: i32 = 3;

/// Level, score and the difficulty knobs they drive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub score: u64,
    /// Enemy speed per tick
    pub enemy_velocity: f32,
    /// Inverse per-tick fire probability (lower fires more)
    pub enemy_fire_rate: f32,
    /// Interval between descents (ms)
    pub descent_interval_ms: f32,
    /// Player shot cooldown (ms)
    pub player_fire_rate_ms: f32,
    pub reward_per_kill: u64,
    /// Frame of the last applied level-up
    last_level_up_frame: Option<u64>,
}

impl Progression {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            level: 1,
            score: 0,
            enemy_velocity: tuning.enemy_velocity,
            enemy_fire_rate: tuning.enemy_fire_rate,
            descent_interval_ms: tuning.descent_interval_ms,
            player_fire_rate_ms: tuning.player_fire_rate_ms,
            reward_per_kill: tuning.reward_per_kill,
            last_level_up_frame: None,
        }
    }

    /// Apply one level-up. A second call within the same frame is a no-op.
    ///
    /// Returns true if the scaling was applied.
    pub fn level_up(&mut self, frame: u64) -> bool {
        if self.last_level_up_frame == Some(frame) {
            return false;
        }
        self.last_level_up_frame = Some(frame);

        self.level += 1;
        self.enemy_velocity += 0.25;
        self.enemy_fire_rate = (self.enemy_fire_rate - self.enemy_fire_rate / 6.0).max(MIN_ENEMY_FIRE_RATE);
        self.descent_interval_ms =
            (self.descent_interval_ms - self.descent_interval_ms / 14.0).max(MIN_DESCENT_MS);
        self.player_fire_rate_ms =
            (self.player_fire_rate_ms - self.player_fire_rate_ms / 20.0).max(MIN_PLAYER_FIRE_RATE_MS);
        self.reward_per_kill += reward_increment(self.level);
        true
    }

    /// Credit one kill, returning the points awarded
    pub fn award_kill(&mut self) -> u64 {
        self.score += self.reward_per_kill;
        self.reward_per_kill
    }

    pub fn is_boss_level(&self) -> bool {
        is_boss_level(self.level)
    }
}

/// Every third level is a boss encounter
pub fn is_boss_level(level: u32) -> bool {
    level % BOSS_LEVEL_INTERVAL == 0
}

/// Reward growth applied when reaching `level`
pub fn reward_increment(level: u32) -> u64 {
    if level < LINEAR_REWARD_LEVELS {
        LINEAR_REWARD_STEP
    } else {
        level_bonus(level)
    }
}

/// Deterministic level-to-bonus map, always in `[2, 10]`.
///
/// Evaluated in IEEE doubles with `fmod` so every level maps to the same bonus
/// as the deployed browser game.
pub fn level_bonus(level: u32) -> u64 {
    let raw = mix(level as f64, REWARD_DEPTH);
    (raw % 9.0) as u64 + 2
}

fn mix(n: f64, depth: i32) -> f64 {
    if depth <= 0 || n <= 0.0 {
        let base = n * n * n + 7.0 * n * n + 13.0 * n + 5.0;
        return base % REWARD_MODULUS;
    }

    let a = mix(n - 1.0, depth - 1) % REWARD_MODULUS;
    let b = mix((n / 2.0).floor(), depth - 1) % REWARD_MODULUS;

    let combined = (a * a + b * b * b) * n + 7.0 * a - 5.0 * b + depth as f64;
    let limited = combined % REWARD_MODULUS;

    (limited * limited + 3.0 * limited + 17.0) % REWARD_MODULUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_up_scaling() {
        let mut p = Progression::new(&Tuning::default());
        assert!(p.level_up(1));
        assert_eq!(p.level, 2);
        assert_eq!(p.enemy_velocity, 1.25);
        assert!((p.enemy_fire_rate - (40.0 - 40.0 / 6.0)).abs() < 1e-4);
        assert!((p.descent_interval_ms - (7500.0 - 7500.0 / 14.0)).abs() < 1e-3);
        assert!((p.player_fire_rate_ms - 380.0).abs() < 1e-4);
        assert_eq!(p.reward_per_kill, 104);
    }

    #[test]
    fn test_level_up_idempotent_within_frame() {
        let mut p = Progression::new(&Tuning::default());
        assert!(p.level_up(10));
        assert!(!p.level_up(10));
        assert_eq!(p.level, 2);
        assert_eq!(p.enemy_velocity, 1.25);
        assert!(p.level_up(11));
        assert_eq!(p.level, 3);
    }

    #[test]
    fn test_linear_reward_below_eight() {
        let mut p = Progression::new(&Tuning::default());
        for frame in 1..7 {
            let before = p.reward_per_kill;
            p.level_up(frame);
            assert_eq!(p.reward_per_kill, before + 4);
            assert_eq!(p.reward_per_kill, 100 + 4 * (p.level as u64 - 1));
        }
        assert_eq!(p.level, 7);
        assert_eq!(p.reward_per_kill, 124);

        // Level 8 switches to the bonus map
        p.level_up(7);
        assert_eq!(p.reward_per_kill, 124 + 8);
    }

    #[test]
    fn test_level_bonus_known_values() {
        assert_eq!(level_bonus(8), 8);
        assert_eq!(level_bonus(9), 7);
        assert_eq!(level_bonus(10), 4);
        assert_eq!(level_bonus(14), 2);
        assert_eq!(level_bonus(20), 10);
    }

    #[test]
    fn test_rates_clamped_to_floor() {
        let mut p = Progression::new(&Tuning::default());
        for frame in 0..500 {
            p.level_up(frame);
        }
        assert_eq!(p.enemy_fire_rate, MIN_ENEMY_FIRE_RATE);
        assert_eq!(p.descent_interval_ms, MIN_DESCENT_MS);
        assert_eq!(p.player_fire_rate_ms, MIN_PLAYER_FIRE_RATE_MS);
        assert!(p.enemy_fire_rate > 0.0);
    }

    #[test]
    fn test_boss_levels() {
        assert!(!is_boss_level(1));
        assert!(!is_boss_level(2));
        assert!(is_boss_level(3));
        assert!(is_boss_level(6));
        assert!(!is_boss_level(7));
    }

    #[test]
    fn test_award_kill() {
        let mut p = Progression::new(&Tuning::default());
        assert_eq!(p.award_kill(), 100);
        assert_eq!(p.award_kill(), 100);
        assert_eq!(p.score, 200);
    }

    proptest! {
        #[test]
        fn prop_level_bonus_in_range(level in 0u32..5000) {
            let bonus = level_bonus(level);
            prop_assert!((2..=10).contains(&bonus));
        }

        #[test]
        fn prop_reward_never_shrinks(levels in 1usize..60) {
            let mut p = Progression::new(&Tuning::default());
            for frame in 0..levels as u64 {
                let before = p.reward_per_kill;
                p.level_up(frame);
                prop_assert!(p.reward_per_kill >= before + 2);
            }
        }
    }
}
