//! Space Warriors - a vertical arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, combat, game state)
//! - `game`: Snapshot publishing and the single command/tick entry point
//! - `tuning`: Data-driven game balance (ships, weapons, zones, difficulty)
//! - `session`: Credits, selections, unlocks, upgrades and achievements carried between runs
//! - `settings`: Player preferences
//! - `highscores`: Score store collaborator
//! - `audio`: Sound/haptic cues derived from simulation events

pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, StoreError};
pub use game::{Command, Game};
pub use highscores::{HighScoreFile, HighScores, NullScoreStore, ScoreRecord, ScoreStore};
pub use session::{Achievement, Session};
pub use settings::Settings;
pub use tuning::{Catalog, Difficulty, Loadout, Tuning, UpgradeKind};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u64 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;

    /// Playfield width in normalized units
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    /// Horizontal limits for the player ship
    pub const PLAYER_MIN_X: f32 = 50.0;
    pub const PLAYER_MAX_X: f32 = 750.0;
    /// Player row and starting column
    pub const PLAYER_START_X: f32 = 400.0;
    pub const PLAYER_Y: f32 = 800.0;
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Bullets spawn this far above the ship
    pub const MUZZLE_OFFSET: f32 = 50.0;

    /// Bullets at or above this line are gone
    pub const TOP_BOUNDARY: f32 = -50.0;
    /// Enemies and bonuses at or below this line are gone
    pub const BOTTOM_BOUNDARY: f32 = 1000.0;

    /// Spawn lanes (x uniform in [SPAWN_MIN_X, SPAWN_MIN_X + SPAWN_SPAN_X))
    pub const SPAWN_MIN_X: f32 = 50.0;
    pub const SPAWN_SPAN_X: f32 = 700.0;
    pub const ENEMY_SPAWN_Y: f32 = -50.0;
    pub const BONUS_SPAWN_Y: f32 = -30.0;

    /// Per-tick enemy step cap after the zone multiplier
    pub const MAX_ENEMY_SPEED: f32 = 8.0;
    /// Bonus fall speed per tick
    pub const BONUS_FALL_SPEED: f32 = 3.0;
    /// Boss descends this far per tick until it reaches the hover line
    pub const BOSS_DESCENT_SPEED: f32 = 1.0;
    pub const BOSS_HOVER_Y: f32 = 100.0;

    /// Homing bullets turn at most this much per tick (radians, 3 degrees)
    pub const HOMING_TURN_RATE: f32 = 0.052_359_88;

    /// Particle gravity (units/s^2) and cap
    pub const PARTICLE_GRAVITY: f32 = 360.0;
    pub const MAX_PARTICLES: usize = 256;
}

/// Simulation time in milliseconds after `ticks` fixed steps
#[inline]
pub fn ticks_to_ms(ticks: u64) -> u64 {
    ticks * 1000 / consts::TICK_RATE
}

/// Squared-distance proximity test: true when `a` and `b` are closer than `radius`
#[inline]
pub fn within(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Unit heading for an angle measured clockwise from straight up
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
