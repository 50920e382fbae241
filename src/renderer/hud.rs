//! Heads-up display: scoreboard strip and boss health bar

use glam::Vec2;

use super::{Canvas, Color, Rect, TextAlign};
use crate::sim::{Boss, BossState, GamePhase, GameState};

pub const HUD_FONT_SIZE: f32 = 16.0;
pub const HEALTH_BAR_HEIGHT: f32 = 10.0;
/// Gap between the health bar and the boss sprite
pub const HEALTH_BAR_GAP: f32 = 5.0;

const STRIP_COLOR: Color = [0.0, 0.0, 0.0, 0.867];
const HEALTH_BACK: Color = [1.0, 0.0, 0.0, 1.0];
const HEALTH_FILL: Color = [0.0, 0.5, 0.0, 1.0];
const HEALTH_BORDER: Color = [0.0, 0.0, 0.0, 1.0];

/// Score and level to display. After a loss the finished run is shown, not
/// the reset progression.
pub fn displayed_score(state: &GameState) -> (u64, u32) {
    match (state.phase, &state.last_run) {
        (GamePhase::Lost | GamePhase::HighScore, Some(run)) => (run.score, run.level),
        _ => (state.score(), state.level()),
    }
}

pub fn scoreboard_lines(state: &GameState) -> (String, String) {
    let (score, level) = displayed_score(state);
    (format!("Score: {}", score), format!("Level: {}", level))
}

/// Dark strip across the top with the score on the left and level on the right
pub fn draw_scoreboard<C: Canvas>(canvas: &mut C, state: &GameState) {
    let width = state.tuning.canvas_width;
    canvas.fill_rect(
        Rect::new(Vec2::ZERO, Vec2::new(width, HUD_FONT_SIZE * 2.0)),
        STRIP_COLOR,
    );
    let (score, level) = scoreboard_lines(state);
    let baseline = HUD_FONT_SIZE * 1.5;
    canvas.text(&score, Vec2::new(HUD_FONT_SIZE, baseline), TextAlign::Left);
    canvas.text(&level, Vec2::new(width - HUD_FONT_SIZE, baseline), TextAlign::Right);
}

/// Bar above the boss, as wide as the boss, filled by remaining health
pub fn draw_boss_health<C: Canvas>(canvas: &mut C, boss: &Boss) {
    let body = &boss.body;
    let pos = Vec2::new(body.pos.x, body.pos.y - HEALTH_BAR_HEIGHT - HEALTH_BAR_GAP);
    let full = Vec2::new(body.size.x, HEALTH_BAR_HEIGHT);

    canvas.fill_rect(Rect::new(pos, full), HEALTH_BACK);
    let remaining = Vec2::new(full.x * boss.health_fraction(), full.y);
    canvas.fill_rect(Rect::new(pos, remaining), HEALTH_FILL);
    canvas.stroke_rect(Rect::new(pos, full), HEALTH_BORDER);
}

pub fn draw<C: Canvas>(canvas: &mut C, state: &GameState) {
    let live_boss = state.boss.as_ref().filter(|b| b.state() != BossState::Dead);
    if let Some(boss) = live_boss {
        draw_boss_health(canvas, boss);
    }
    draw_scoreboard(canvas, state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::{Call, Recorder};
    use crate::settings::Tuning;
    use crate::sim::Command;

    fn playing() -> GameState {
        let mut state = GameState::new(4, Tuning::default());
        state.handle(Command::AssetsLoaded(Ok(())));
        state.handle(Command::Start);
        state
    }

    #[test]
    fn test_scoreboard_text() {
        let mut state = playing();
        state.progression.score = 1_250;
        let mut canvas = Recorder::default();
        draw_scoreboard(&mut canvas, &state);
        assert_eq!(canvas.texts(), vec!["Score: 1250", "Level: 1"]);
        assert_eq!(
            canvas.calls[2],
            Call::Text("Level: 1".into(), Vec2::new(984.0, 24.0), TextAlign::Right)
        );
    }

    #[test]
    fn test_lost_shows_finished_run() {
        let mut state = playing();
        state.progression.score = 700;
        state.lose();
        assert_eq!(state.score(), 0);
        assert_eq!(displayed_score(&state), (700, 1));
    }

    #[test]
    fn test_health_bar_tracks_health() {
        let mut state = playing();
        state.progression.level = 3;
        state.enter_level();
        let boss = state.boss.as_mut().unwrap();
        boss.health = 5;

        let mut canvas = Recorder::default();
        draw_boss_health(&mut canvas, boss);
        let top_left = Vec2::new(400.0, 64.0 - 15.0);
        assert_eq!(
            canvas.calls[1],
            Call::Fill(Rect::new(top_left, Vec2::new(50.0, 10.0)), HEALTH_FILL)
        );
    }
}
