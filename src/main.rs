//! Phat Invaders headless runner
//!
//! Loads optional settings, plays a seeded autopilot session for a fixed number
//! of frames and logs the outcome. Usage: `phat-invaders [settings.json] [frames]`.

use phat_invaders::audio::{AudioManager, LogAudio};
use phat_invaders::consts::*;
use phat_invaders::highscores::LocalScoreService;
use phat_invaders::sim::{Command, GameEvent, GamePhase, GameState, TickInput, front_enemy_x, tick};
use phat_invaders::{Result, Settings};

const DEFAULT_FRAMES: u64 = 60 * 60 * 5;
const DEFAULT_SEED: u64 = 0x5eed;
/// Autopilot dead zone around its target (units)
const AIM_TOLERANCE: f32 = 8.0;

/// Steer under the nearest threat and keep firing
fn autopilot(state: &GameState) -> TickInput {
    let player_x = state.player.body.center().x;
    let target = match &state.boss {
        Some(boss) => Some(boss.body.center().x),
        None => front_enemy_x(&state.enemies, player_x),
    };
    let (left, right) = match target {
        Some(x) if x < player_x - AIM_TOLERANCE => (true, false),
        Some(x) if x > player_x + AIM_TOLERANCE => (false, true),
        _ => (false, false),
    };
    TickInput {
        left,
        right,
        fire: true,
        pause: false,
    }
}

fn route_events(state: &mut GameState, audio: &mut AudioManager<LogAudio>) {
    for event in state.drain_events() {
        match event {
            GameEvent::Sound(effect) => audio.play(effect),
            GameEvent::Music(cue) => audio.music(cue),
            GameEvent::LevelCleared { level } => log::info!("Cleared level {}", level),
            other => log::debug!("{:?}", other),
        }
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let frames = args
        .next()
        .and_then(|f| f.parse::<u64>().ok())
        .unwrap_or(DEFAULT_FRAMES);
    let seed = settings.seed.unwrap_or(DEFAULT_SEED);

    let mut audio = AudioManager::new(LogAudio, &settings);
    let mut scores = LocalScoreService::default();
    let mut state = GameState::new(seed, settings.tuning.clone());
    state.handle(Command::AssetsLoaded(Ok(())));
    state.handle(Command::Start);

    for frame in 1..=frames {
        let input = autopilot(&state);
        tick(&mut state, &input, frame * SIM_DT_MS, SIM_DT);
        route_events(&mut state, &mut audio);
        if state.phase == GamePhase::Lost {
            break;
        }
    }

    match state.last_run.clone() {
        Some(run) => {
            log::info!("Run over: level {}, score {}", run.level, run.score);
            let accepted = state.submit_score(&mut scores, "Autopilot", "")?;
            route_events(&mut state, &mut audio);
            log::info!("Score submitted: {}", accepted);
        }
        None => log::info!(
            "Still alive after {} frames: level {}, score {}",
            state.frame,
            state.level(),
            state.score()
        ),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Phat Invaders (headless) starting...");
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
