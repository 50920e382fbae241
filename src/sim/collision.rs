//! Per-frame collision resolution
//!
//! Seven fixed checks run against one snapshot of positions. Hits are recorded
//! in per-collection masks, so an object hit twice is still removed once, and
//! every removal happens in a single pass after the last check.

use super::state::{EnemyKind, GamePhase, GameState, ItemKind};
use crate::audio::SoundEffect;

/// Why a run was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossCause {
    /// Enemy or boss projectile reached the player
    PlayerHit,
    /// Enemy or boss body touched cover
    BodyContact,
    /// Enemy or boss reached the player's row
    Invasion,
}

/// Outcome of one frame's collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Ids of formation members destroyed this frame
    pub enemies_killed: Vec<u32>,
    pub blocks_destroyed: usize,
    /// Projectiles absorbed by the boss
    pub boss_hits: u32,
    pub boss_defeated: bool,
    /// Score gained this frame
    pub points: u64,
    /// First loss condition seen this frame
    pub loss: Option<LossCause>,
    /// Formation emptied or boss destroyed
    pub cleared: bool,
}

impl CollisionReport {
    pub fn lost(&self) -> bool {
        self.loss.is_some()
    }

    fn lose(&mut self, cause: LossCause) {
        if self.loss.is_none() {
            self.loss = Some(cause);
        }
    }
}

/// Run all collision checks for the frame and apply the removals
pub fn resolve(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    if !state.phase.is_active() {
        return report;
    }
    let now = state.now_ms;

    let mut enemy_hit = vec![false; state.enemies.len()];
    let mut shot_hit = vec![false; state.player.missiles.len()];
    let mut hostile_hit = vec![false; state.enemy_missiles.len()];
    let mut block_hit = vec![false; state.blocks.len()];

    // 1. Player projectiles vs enemies and boss
    for (ei, enemy) in state.enemies.iter_mut().enumerate() {
        for (mi, shot) in state.player.missiles.iter().enumerate() {
            if enemy.hit(&shot.body) {
                enemy_hit[ei] = true;
                shot_hit[mi] = true;
            }
        }
    }
    if let Some(boss) = state.boss.as_mut() {
        for (mi, shot) in state.player.missiles.iter().enumerate() {
            if boss.hit(&shot.body, now) {
                shot_hit[mi] = true;
                report.boss_hits += 1;
            }
        }
    }
    credit_kills(state, &mut enemy_hit, &mut report);
    credit_boss(state, &mut report);

    // 2. Hostile projectiles vs player
    for (mi, missile) in state.enemy_missiles.iter().enumerate() {
        if state.player.body.hit(&missile.body) {
            hostile_hit[mi] = true;
            report.lose(LossCause::PlayerHit);
        }
    }

    // 3. Player projectiles vs blocks
    for (bi, block) in state.blocks.iter_mut().enumerate() {
        for (mi, shot) in state.player.missiles.iter().enumerate() {
            if block.hit(&shot.body) {
                block_hit[bi] = true;
                shot_hit[mi] = true;
            }
        }
    }

    // 4. Hostile projectiles vs blocks
    for (bi, block) in state.blocks.iter_mut().enumerate() {
        for (mi, missile) in state.enemy_missiles.iter().enumerate() {
            if block.hit(&missile.body) {
                block_hit[bi] = true;
                hostile_hit[mi] = true;
            }
        }
    }

    // 5. Enemy and boss bodies vs blocks
    for block in &state.blocks {
        let enemy_contact = state.enemies.iter().any(|e| e.body.overlaps(&block.body));
        let boss_contact = state.boss.as_ref().is_some_and(|b| b.body.overlaps(&block.body));
        if enemy_contact || boss_contact {
            report.lose(LossCause::BodyContact);
        }
    }

    // 6. Player projectiles vs hostile projectiles
    for (si, shot) in state.player.missiles.iter().enumerate() {
        for (mi, missile) in state.enemy_missiles.iter().enumerate() {
            if shot.body.overlaps(&missile.body) {
                shot_hit[si] = true;
                hostile_hit[mi] = true;
            }
        }
    }

    // 7. Anything reaching the player's row
    let player_top = state.player.body.top();
    let invaded = state.enemies.iter().any(|e| e.body.bottom() > player_top)
        || state.boss.as_ref().is_some_and(|b| b.body.bottom() > player_top);
    if invaded {
        report.lose(LossCause::Invasion);
    }

    // Batched removal
    report.blocks_destroyed = block_hit.iter().filter(|&&hit| hit).count();
    for _ in 0..report.blocks_destroyed {
        state.play(SoundEffect::Kill);
    }
    retain_unmarked(&mut state.enemies, &enemy_hit);
    retain_unmarked(&mut state.blocks, &block_hit);
    retain_unmarked(&mut state.player.missiles, &shot_hit);
    retain_unmarked(&mut state.enemy_missiles, &hostile_hit);

    report.cleared = match state.phase {
        GamePhase::Playing => state.enemies.is_empty(),
        GamePhase::Boss => state.boss.as_ref().is_some_and(|b| b.body.dead),
        _ => false,
    };

    if let Some(cause) = report.loss {
        log::debug!("Loss condition: {:?}", cause);
    }
    report
}

/// Score every enemy hit this frame, apply item effects and run row-destroyer
/// cascades. Each enemy is credited once however many projectiles hit it.
fn credit_kills(state: &mut GameState, enemy_hit: &mut [bool], report: &mut CollisionReport) {
    let now = state.now_ms;
    let buff_ms = state.tuning.buff_duration_ms;
    let mut credited = vec![false; enemy_hit.len()];
    let mut queue: Vec<usize> = (0..enemy_hit.len()).filter(|&i| enemy_hit[i]).collect();

    let mut cursor = 0;
    while cursor < queue.len() {
        let i = queue[cursor];
        cursor += 1;
        if credited[i] {
            continue;
        }
        credited[i] = true;
        enemy_hit[i] = true;

        let (id, row, kind) = {
            let enemy = &mut state.enemies[i];
            enemy.body.dead = true;
            (enemy.id, enemy.row, enemy.kind)
        };
        report.points += state.progression.award_kill();
        report.enemies_killed.push(id);
        state.play(SoundEffect::Kill);

        match kind {
            EnemyKind::Attacker => {}
            EnemyKind::Item(ItemKind::FireBoost) => {
                state.player.shoot_fast(now, buff_ms);
                state.play(SoundEffect::Boost);
                log::debug!("Fire boost until {}", now + buff_ms);
            }
            EnemyKind::Item(ItemKind::SpreadFire) => {
                state.player.shoot_triple(now, buff_ms);
                state.play(SoundEffect::Boost);
                log::debug!("Spread fire until {}", now + buff_ms);
            }
            EnemyKind::Item(ItemKind::RowDestroyer) => {
                let before = queue.len();
                queue.extend(
                    state
                        .enemies
                        .iter()
                        .enumerate()
                        .filter(|(j, e)| e.row == row && !credited[*j])
                        .map(|(j, _)| j),
                );
                log::debug!("Row {} destroyed ({} enemies)", row, queue.len() - before);
            }
        }
    }
}

/// Score boss hits and announce its death
fn credit_boss(state: &mut GameState, report: &mut CollisionReport) {
    for _ in 0..report.boss_hits {
        report.points += state.progression.award_kill();
    }
    let defeated = report.boss_hits > 0 && state.boss.as_ref().is_some_and(|b| b.body.dead);
    if defeated {
        report.boss_defeated = true;
        state.play(SoundEffect::Kill);
    }
}

fn retain_unmarked<T>(items: &mut Vec<T>, marks: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !marks[index];
        index += 1;
        keep
    });
}
