//! Space Warriors headless runner
//!
//! Plays one run on autopilot: `space-warriors [seed] [ticks]`.
//! Reads `settings.json` and records the score in `highscores.json`, both in
//! the working directory. `RUST_LOG=debug` shows every cue.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use space_warriors::audio::{AudioManager, LogAudioSink};
use space_warriors::consts::TICK_RATE;
use space_warriors::sim::{GameState, GameStatus};
use space_warriors::{Catalog, Game, HighScoreFile, Session, Settings, Tuning};

const SETTINGS_FILE: &str = "settings.json";
const HIGHSCORES_FILE: &str = "highscores.json";
/// Five minutes of play
const DEFAULT_TICKS: u64 = TICK_RATE * 300;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let max_ticks = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_TICKS);

    log::info!("Space Warriors (headless) starting...");
    if let Err(e) = run(seed, max_ticks) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(seed: u64, max_ticks: u64) -> Result<(), space_warriors::ConfigError> {
    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let catalog = Catalog::default();
    let mut session = Session::default();
    let loadout = session.loadout(&catalog, settings.difficulty)?;

    let store = HighScoreFile::open(HIGHSCORES_FILE);
    let mut game = Game::new(catalog, Tuning::default(), seed, Box::new(store))?;
    game.set_player_name(settings.player_name.clone());
    let mut audio = AudioManager::new(LogAudioSink, &settings);

    game.start_game(loadout)?;
    for _ in 0..max_ticks {
        autopilot(&mut game);
        let state = game.advance();
        session.observe(&state);
        session.check_achievements(game.catalog(), &state);
        audio.observe(&state);
        if state.status == GameStatus::GameOver {
            break;
        }
    }

    let state = game.snapshot();
    session.settle_run(&state);
    audio.enter_menu();
    summarize(seed, &state, &session);
    Ok(())
}

/// Line up under the lowest enemy (or the boss) and keep firing
fn autopilot(game: &mut Game) {
    let state = game.snapshot();
    let target = state
        .enemies
        .iter()
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|e| e.pos.x)
        .or_else(|| state.boss.as_ref().map(|b| b.pos.x));

    if let Some(x) = target {
        let dx = x - state.player.pos.x;
        let step = state.ship.speed * 5.0;
        if dx < -step / 2.0 {
            game.move_left();
        } else if dx > step / 2.0 {
            game.move_right();
        }
    }
    game.shoot();
}

fn summarize(seed: u64, state: &GameState, session: &Session) {
    let seconds = state.time_ticks / TICK_RATE;
    log::info!(
        "Run over after {}s: score {}, wave {}, zone {} ({}), {} kills",
        seconds,
        state.score,
        state.wave_number,
        state.zone.id,
        state.zone.name,
        state.kill_count
    );
    println!("seed:     {}", seed);
    println!("status:   {:?}", state.status);
    println!("score:    {}", state.score);
    println!("wave:     {}", state.wave_number);
    println!("zone:     {} ({})", state.zone.id, state.zone.name);
    println!("kills:    {}", state.kill_count);
    println!("combo:    x{}", state.combo.multiplier());
    println!("credits:  {}", session.credits);
    println!("weapons:  {:?}", session.unlocked_weapons);
    let titles: Vec<&str> = session.achievements.iter().map(|a| a.title()).collect();
    println!("medals:   {}", titles.join(", "));
}
