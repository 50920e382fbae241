//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Time is injected
//! by the caller so replays with the same seed, inputs and timestamps match.

use super::collision::{self, CollisionReport};
use super::formation;
use super::state::{GamePhase, GameState};
use crate::audio::SoundEffect;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left (wins over right)
    pub left: bool,
    pub right: bool,
    /// Fire held
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame.
///
/// `now_ms` drives every timer (cooldowns, buffs, shock, descent); `dt` in
/// seconds scales player movement only. Returns the frame's collision report
/// when a level was simulated.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64, dt: f32) -> Option<CollisionReport> {
    state.now_ms = now_ms;

    if input.pause {
        state.toggle_pause();
    }

    // Don't tick outside a level
    if !state.phase.is_active() {
        return None;
    }
    state.frame += 1;

    // Player
    state.player.steer(input.left, input.right);
    state.player.move_by(dt);
    state.player.update_buffs(now_ms);
    if input.fire && state.player.fire(now_ms, &mut state.ids) {
        state.play(SoundEffect::Fire);
    }
    let canvas_height = state.tuning.canvas_height;
    state.player.advance_missiles(canvas_height);

    // Hostile projectiles outlive whoever fired them
    for missile in &mut state.enemy_missiles {
        missile.step();
    }
    state.enemy_missiles.retain(|m| !m.out_of_bounds(canvas_height));

    let descend = state
        .descent
        .due(now_ms, state.progression.descent_interval_ms);
    let fire_rate = state.progression.enemy_fire_rate;

    match state.phase {
        GamePhase::Playing => {
            formation::update(&mut state.enemies, state.tuning.oscillation_amplitude, descend);
            let shots = formation::roll_fire(
                &state.enemies,
                fire_rate,
                state.tuning.enemy_missile_speed,
                state.rng_state.rng_mut(),
                &mut state.ids,
            );
            state.enemy_missiles.extend(shots);
        }
        GamePhase::Boss => {
            if let Some(boss) = state.boss.as_mut() {
                boss.update_shock(now_ms);
                boss.step(descend);
                let shot = boss.fire(
                    state.rng_state.rng_mut(),
                    fire_rate,
                    state.tuning.boss_missile_speed,
                    &mut state.ids,
                );
                state.enemy_missiles.extend(shot);
            }
        }
        _ => {}
    }

    let report = collision::resolve(state);
    if report.lost() {
        state.lose();
    } else if report.cleared {
        state.win();
    }
    Some(report)
}
