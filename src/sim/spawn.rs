//! Probabilistic spawning
//!
//! Decides, once per tick, whether a new enemy, bonus or boss enters the
//! playfield. Nothing here touches existing entities; callers merge the
//! returned [`SpawnResult`] into the next snapshot.

use glam::Vec2;
use rand::Rng;

use super::state::{Bonus, BonusKind, Boss, BossKind, Enemy, EnemyKind, GameState};
use crate::consts::*;
use crate::tuning::Tuning;

/// Entities created this tick
#[derive(Debug, Clone, Default)]
pub struct SpawnResult {
    pub enemy: Option<Enemy>,
    pub bonus: Option<Bonus>,
}

fn spawn_x<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    SPAWN_MIN_X + rng.random::<f32>() * SPAWN_SPAN_X
}

/// Roll enemy and bonus spawns for this tick.
///
/// Enemies only appear while no boss is active. Bonuses roll independently.
pub fn roll_spawns<R: Rng + ?Sized>(state: &mut GameState, tuning: &Tuning, rng: &mut R) -> SpawnResult {
    let mut result = SpawnResult::default();

    let enemy_chance = state.zone.enemy_spawn_rate * state.difficulty.spawn_rate();
    if state.boss.is_none() && rng.random::<f64>() < enemy_chance {
        let kind = EnemyKind::ALL[rng.random_range(0..EnemyKind::ALL.len())];
        let pos = Vec2::new(spawn_x(rng), ENEMY_SPAWN_Y);
        let id = state.next_entity_id();
        result.enemy = Some(Enemy::spawn(id, kind, pos, state.difficulty));
    }

    if rng.random::<f64>() < tuning.bonus_chance {
        let kind = BonusKind::ALL[rng.random_range(0..BonusKind::ALL.len())];
        let pos = Vec2::new(spawn_x(rng), BONUS_SPAWN_Y);
        let id = state.next_entity_id();
        result.bonus = Some(Bonus::new(id, kind, pos));
    }

    result
}

/// A boss arrives when the score sits on a positive multiple of the boss
/// interval and none is active.
pub fn boss_due(score: u64, boss_active: bool, tuning: &Tuning) -> Option<Boss> {
    let interval = tuning.boss_score_interval;
    if boss_active || score == 0 || interval == 0 || score % interval != 0 {
        return None;
    }
    Some(Boss::new(BossKind::Destroyer, PLAYFIELD_WIDTH / 2.0))
}
