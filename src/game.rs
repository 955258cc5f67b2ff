//! Game loop facade
//!
//! [`Game`] is the single writer. Every tick and command clones the current
//! snapshot, mutates the private copy and publishes it as a new
//! `Arc<GameState>`. Readers hold on to whatever snapshot they fetched; it
//! never changes underneath them.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::highscores::{ScoreRecord, ScoreStore};
use crate::sim::state::{GameState, GameStatus};
use crate::sim::tick;
use crate::tuning::{Catalog, Loadout, Tuning};

/// Discrete player input, for hosts that collect input on another thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    MoveTo(f32),
    MoveLeft,
    MoveRight,
    Shoot,
    TogglePause,
    EnemyKilled,
    Start(Loadout),
}

pub struct Game {
    snapshot: Arc<GameState>,
    catalog: Catalog,
    tuning: Tuning,
    rng: Pcg32,
    store: Box<dyn ScoreStore>,
    player_name: String,
    /// Score for the current run already handed to the store
    score_saved: bool,
}

impl Game {
    /// Create a game sitting in the menu. Fails if `catalog` cannot start a run.
    pub fn new(catalog: Catalog, tuning: Tuning, seed: u64, store: Box<dyn ScoreStore>) -> Result<Self, ConfigError> {
        let loadout = catalog.default_loadout(0)?;
        let zone = catalog.zones[0].clone();
        let mut menu = GameState::new(&loadout, zone);
        menu.status = GameStatus::Menu;

        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            snapshot: Arc::new(menu),
            catalog,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            store,
            player_name: "Player".to_string(),
            score_saved: false,
        })
    }

    /// Name recorded with high scores
    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<GameState> {
        Arc::clone(&self.snapshot)
    }

    /// Begin a fresh run with `loadout`
    pub fn start_game(&mut self, loadout: Loadout) -> Result<(), ConfigError> {
        self.catalog.validate()?;
        let zone = self.catalog.zone_for_score(0).cloned().ok_or(ConfigError::EmptyZones)?;

        log::info!(
            "Starting run: {} with {} ({:?})",
            loadout.ship.name,
            loadout.weapon.name,
            loadout.difficulty
        );
        self.score_saved = false;
        self.publish(GameState::new(&loadout, zone));
        Ok(())
    }

    /// Resume from a saved snapshot
    pub fn restore(&mut self, state: GameState) {
        self.score_saved = state.status == GameStatus::GameOver;
        self.snapshot = Arc::new(state);
    }

    /// Run one fixed timestep. Returns the snapshot that is current afterwards.
    pub fn advance(&mut self) -> Arc<GameState> {
        if self.snapshot.status.is_running() {
            let mut next = self.begin();
            tick::tick(&mut next, &self.catalog, &self.tuning, &mut self.rng);
            self.publish(next);
        }
        self.snapshot()
    }

    pub fn move_to(&mut self, x: f32) {
        if self.snapshot.status.is_running() {
            let mut next = self.begin();
            tick::move_to(&mut next, x);
            self.publish(next);
        }
    }

    pub fn move_left(&mut self) {
        if self.snapshot.status.is_running() {
            let mut next = self.begin();
            tick::move_left(&mut next, &self.tuning);
            self.publish(next);
        }
    }

    pub fn move_right(&mut self) {
        if self.snapshot.status.is_running() {
            let mut next = self.begin();
            tick::move_right(&mut next, &self.tuning);
            self.publish(next);
        }
    }

    /// Fire the active weapon. Returns false if the shot was ignored.
    pub fn shoot(&mut self) -> bool {
        if !self.snapshot.status.is_running() {
            return false;
        }
        let mut next = self.begin();
        let fired = tick::shoot(&mut next);
        if fired {
            self.publish(next);
        }
        fired
    }

    pub fn toggle_pause(&mut self) {
        let mut next = self.begin();
        tick::toggle_pause(&mut next);
        if next.status != self.snapshot.status {
            log::debug!("{:?} -> {:?}", self.snapshot.status, next.status);
            self.publish(next);
        }
    }

    /// Report a kill from outside the tick. Returns the combo award.
    pub fn on_enemy_killed(&mut self) -> u64 {
        if !self.snapshot.status.is_running() {
            return 0;
        }
        let mut next = self.begin();
        let award = tick::on_enemy_killed(&mut next, &self.tuning);
        self.publish(next);
        award
    }

    /// Apply a queued command
    pub fn apply(&mut self, command: Command) -> Result<(), ConfigError> {
        match command {
            Command::MoveTo(x) => self.move_to(x),
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::Shoot => {
                self.shoot();
            }
            Command::TogglePause => self.toggle_pause(),
            Command::EnemyKilled => {
                self.on_enemy_killed();
            }
            Command::Start(loadout) => self.start_game(loadout)?,
        }
        Ok(())
    }

    /// Private copy of the current snapshot with its events cleared
    fn begin(&self) -> GameState {
        let mut next = GameState::clone(&self.snapshot);
        next.events.clear();
        next
    }

    fn publish(&mut self, next: GameState) {
        let finished = next.status == GameStatus::GameOver && !self.score_saved;
        self.snapshot = Arc::new(next);
        if finished {
            self.save_score();
        }
    }

    /// Hand the finished run to the store. Failures are logged, never raised.
    fn save_score(&mut self) {
        self.score_saved = true;
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let record = ScoreRecord {
            player_name: self.player_name.clone(),
            score: self.snapshot.score,
            level: self.snapshot.wave_number,
            timestamp_ms,
        };
        if let Err(e) = self.store.save(&record) {
            log::warn!("Failed to save score {}: {}", record.score, e);
        }
    }
}
