//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod combo;
pub mod effects;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{BulletOutcome, Contact};
pub use combo::{ComboTracker, combo_award};
pub use effects::{EffectScheduler, TimedEffect};
pub use spawn::SpawnResult;
pub use state::{
    AttackPattern, Bonus, BonusKind, Boss, BossKind, Bullet, Enemy, EnemyKind, GameEvent, GameState, GameStatus,
    Particle, Player,
};
pub use tick::tick;
