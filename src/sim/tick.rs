//! Fixed timestep simulation tick and player commands
//!
//! One tick runs Spawner -> Motion -> Collision -> timed-effect expiry ->
//! boss/zone/game-over derivation, in that order. Commands (move, shoot,
//! pause) are separate steps that the owning [`crate::Game`] serializes with
//! ticks.

use glam::Vec2;
use rand::Rng;

use super::collision::{self, Contact};
use super::combo::combo_award;
use super::effects::TimedEffect;
use super::motion;
use super::spawn;
use super::state::{BonusKind, Bullet, Enemy, GameEvent, GameState, GameStatus, Particle};
use crate::consts::*;
use crate::tuning::{Catalog, SpecialEffect, Tuning, WeaponUpgrade};

/// Advance a running game by one fixed timestep.
///
/// Does nothing unless the status is `Playing` or `BossFight`.
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, catalog: &Catalog, tuning: &Tuning, rng: &mut R) {
    if !state.status.is_running() {
        return;
    }

    state.time_ticks += 1;
    let now_ms = state.time_ms();

    // Spawner
    let spawned = spawn::roll_spawns(state, tuning, rng);
    state.enemies.extend(spawned.enemy);
    state.bonuses.extend(spawned.bonus);

    // Motion
    motion::advance_bullets(&mut state.bullets, &state.enemies);
    motion::advance_enemies(&mut state.enemies, state.zone.enemy_speed);
    motion::advance_bonuses(&mut state.bonuses);
    if let Some(boss) = state.boss.as_mut() {
        motion::advance_boss(boss);
    }
    motion::advance_particles(&mut state.particles, SIM_DT);

    // Combat
    let outcome = collision::resolve_bullets(&mut state.bullets, &mut state.enemies, &mut state.boss, tuning);
    if outcome.boss_damage > 0 {
        log::debug!("Boss hit for {}", outcome.boss_damage);
    }
    for enemy in &outcome.kills {
        award_kill(state, enemy, now_ms, tuning, rng);
    }
    if let Some(boss) = outcome.boss_defeated {
        state.score += tuning.boss_kill_score;
        state.credits += tuning.boss_kill_credits;
        state.wave_number += 1;
        explode(state, boss.pos, 0xffaa00, rng);
        state.events.push(GameEvent::BossDefeated(boss.kind));
        log::info!("{} defeated, wave {} begins", boss.name, state.wave_number);
    }

    match collision::resolve_player_contact(&mut state.player, &mut state.enemies) {
        Contact::None | Contact::PassedThrough => {}
        Contact::ShieldAbsorbed => state.events.push(GameEvent::ShieldBroken),
        Contact::Damaged => state.events.push(GameEvent::PlayerHit {
            health: state.player.health,
        }),
    }

    for bonus in collision::collect_bonuses(&state.player, &mut state.bonuses, tuning) {
        apply_bonus(state, bonus.kind, bonus.pos, catalog, tuning, rng);
    }

    // Timed effects
    for effect in state.effects.drain_due(now_ms) {
        revert_effect(state, effect);
    }

    // Derived state
    if let Some(boss) = spawn::boss_due(state.score, state.boss.is_some(), tuning) {
        log::info!("Boss incoming: {} at score {}", boss.name, state.score);
        state.events.push(GameEvent::BossSpawned(boss.kind));
        state.boss = Some(boss);
    }

    if let Some(zone) = catalog.zone_for_score(state.score) {
        if zone.id != state.zone.id {
            log::info!("Entering zone {} ({})", zone.id, zone.name);
            state.events.push(GameEvent::ZoneChanged { id: zone.id });
            state.zone = zone.clone();
        }
    }

    state.status = if state.player.health == 0 {
        log::info!("Game over: score {} in wave {}", state.score, state.wave_number);
        state.events.push(GameEvent::GameOver { score: state.score });
        GameStatus::GameOver
    } else if state.boss.is_some() {
        GameStatus::BossFight
    } else {
        GameStatus::Playing
    };

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Score, credits, combo and effects for one destroyed enemy
fn award_kill<R: Rng + ?Sized>(state: &mut GameState, enemy: &Enemy, now_ms: u64, tuning: &Tuning, rng: &mut R) {
    let points = enemy.points();
    state.score += points;
    state.credits += points / 10;
    state.kill_count += 1;

    let combo = state.combo.register_kill(now_ms, tuning.combo_window_ms);
    if combo > 1 {
        state.score += combo_award(tuning.combo_base_score, combo);
    }

    explode(state, enemy.pos, enemy.color(), rng);
    state.events.push(GameEvent::EnemyKilled {
        kind: enemy.kind,
        points,
    });
}

/// Explicit combo hook: every kill reported here scores `base * combo`.
pub fn on_enemy_killed(state: &mut GameState, tuning: &Tuning) -> u64 {
    let combo = state.combo.register_kill(state.time_ms(), tuning.combo_window_ms);
    let award = combo_award(tuning.combo_base_score, combo);
    state.score += award;
    award
}

fn apply_bonus<R: Rng + ?Sized>(
    state: &mut GameState,
    kind: BonusKind,
    pos: Vec2,
    catalog: &Catalog,
    tuning: &Tuning,
    rng: &mut R,
) {
    let now_ms = state.time_ms();
    state.credits += kind.credit_reward();

    match kind {
        BonusKind::Shield => state.player.has_shield = true,
        BonusKind::Speed => {
            state.player.has_speed_boost = true;
            state.effects.schedule(TimedEffect::SpeedBoost, now_ms, tuning.speed_boost_ms);
        }
        BonusKind::Invincibility => {
            state.player.is_invincible = true;
            state.effects.schedule(TimedEffect::Invincibility, now_ms, tuning.invincibility_ms);
        }
        BonusKind::Weapon => {
            let upgrade = WeaponUpgrade::ALL[rng.random_range(0..WeaponUpgrade::ALL.len())];
            state.weapon = state.loadout_weapon.with_upgrade(upgrade);
            state.player.weapon = state.weapon.kind;
            state.effects.schedule(TimedEffect::WeaponUpgrade, now_ms, tuning.weapon_upgrade_ms);

            if !catalog.weapons.is_empty() {
                let unlocked = catalog.weapons[rng.random_range(0..catalog.weapons.len())].kind;
                state.events.push(GameEvent::WeaponUnlocked(unlocked));
            }
            log::debug!("Weapon upgrade {:?} on {}", upgrade, state.weapon.name);
        }
    }

    pickup_sparkle(state, pos, kind.color(), rng);
    state.events.push(GameEvent::BonusCollected(kind));
}

/// Undo a timed effect. Reverting something already cleared is a no-op.
fn revert_effect(state: &mut GameState, effect: TimedEffect) {
    let changed = match effect {
        TimedEffect::SpeedBoost => std::mem::replace(&mut state.player.has_speed_boost, false),
        TimedEffect::Invincibility => std::mem::replace(&mut state.player.is_invincible, false),
        TimedEffect::WeaponUpgrade => {
            let upgraded = state.weapon != state.loadout_weapon;
            state.weapon = state.loadout_weapon.clone();
            state.player.weapon = state.weapon.kind;
            upgraded
        }
    };
    if changed {
        state.events.push(GameEvent::EffectExpired(effect));
    }
}

fn explode<R: Rng + ?Sized>(state: &mut GameState, pos: Vec2, color: u32, rng: &mut R) {
    for _ in 0..15 {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed: f32 = rng.random_range(50.0..150.0);
        state.particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            max_life: 1.0,
            size: rng.random_range(2.0..6.0),
            color,
        });
    }
}

fn pickup_sparkle<R: Rng + ?Sized>(state: &mut GameState, pos: Vec2, color: u32, rng: &mut R) {
    for _ in 0..8 {
        let vel = Vec2::new(rng.random_range(-30.0f32..30.0), rng.random_range(-30.0f32..30.0));
        state.particles.push(Particle {
            pos,
            vel,
            life: 0.8,
            max_life: 0.8,
            size: 3.0,
            color,
        });
    }
}

/// Fire the active weapon. Returns false when the shot was ignored
/// (not running, or the weapon is still cooling down).
pub fn shoot(state: &mut GameState) -> bool {
    if !state.status.is_running() {
        return false;
    }
    let now_ms = state.time_ms();
    let cooldown = state.weapon.cooldown_ms(state.ship.fire_rate);
    if let Some(last) = state.last_shot_ms {
        if now_ms.saturating_sub(last) < cooldown {
            return false;
        }
    }
    state.last_shot_ms = Some(now_ms);

    // (x offset, angle in degrees)
    let pattern: &[(f32, f32)] = match (state.weapon.upgrade, state.weapon.effect) {
        (Some(WeaponUpgrade::Spread), _) => &[(-20.0, -15.0), (0.0, 0.0), (20.0, 15.0)],
        (Some(WeaponUpgrade::Multishot), _) => &[
            (-40.0, -25.0),
            (-20.0, -12.0),
            (0.0, 0.0),
            (20.0, 12.0),
            (40.0, 25.0),
        ],
        (_, SpecialEffect::Spread) => &[(-20.0, 0.0), (0.0, 0.0), (20.0, 0.0)],
        _ => &[(0.0, 0.0)],
    };

    let muzzle = state.player.pos - Vec2::new(0.0, MUZZLE_OFFSET);
    for &(dx, degrees) in pattern {
        let id = state.next_entity_id();
        let bullet = Bullet::fired(id, muzzle + Vec2::new(dx, 0.0), degrees.to_radians(), &state.weapon);
        state.bullets.push(bullet);
    }
    state.events.push(GameEvent::ShotFired(state.weapon.kind));
    true
}

/// Put the ship at `x`, clamped to the playfield
pub fn move_to(state: &mut GameState, x: f32) {
    if state.status.is_running() {
        state.player.pos.x = x.clamp(PLAYER_MIN_X, PLAYER_MAX_X);
    }
}

/// Lateral step for one left/right command
pub fn lateral_step(state: &GameState, tuning: &Tuning) -> f32 {
    let step = state.ship.speed * 5.0;
    if state.player.has_speed_boost {
        step * tuning.speed_boost_factor
    } else {
        step
    }
}

pub fn move_left(state: &mut GameState, tuning: &Tuning) {
    let x = state.player.pos.x - lateral_step(state, tuning);
    move_to(state, x);
}

pub fn move_right(state: &mut GameState, tuning: &Tuning) {
    let x = state.player.pos.x + lateral_step(state, tuning);
    move_to(state, x);
}

/// Playing/BossFight <-> Paused. Other statuses are left alone.
pub fn toggle_pause(state: &mut GameState) {
    state.status = match state.status {
        GameStatus::Playing | GameStatus::BossFight => GameStatus::Paused,
        GameStatus::Paused if state.boss.is_some() => GameStatus::BossFight,
        GameStatus::Paused => GameStatus::Playing,
        other => other,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Boss, BossKind, EnemyKind};
    use crate::tuning::WeaponKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// A run with spawning switched off so tests control every entity
    fn quiet() -> (GameState, Catalog, Tuning, Pcg32) {
        let mut catalog = Catalog::default();
        for zone in &mut catalog.zones {
            zone.enemy_spawn_rate = 0.0;
        }
        let tuning = Tuning {
            bonus_chance: 0.0,
            ..Tuning::default()
        };
        let loadout = catalog.default_loadout(0).unwrap();
        let state = GameState::new(&loadout, catalog.zones[0].clone());
        (state, catalog, tuning, Pcg32::seed_from_u64(42))
    }

    fn add_enemy(state: &mut GameState, kind: EnemyKind, x: f32, y: f32) -> u32 {
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, kind, Vec2::new(x, y)));
        id
    }

    #[test]
    fn test_tick_ignored_unless_running() {
        let (mut state, catalog, tuning, mut rng) = quiet();
        state.status = GameStatus::Paused;
        tick(&mut state, &catalog, &tuning, &mut rng);
        assert_eq!(state.time_ticks, 0);
        state.status = GameStatus::GameOver;
        tick(&mut state, &catalog, &tuning, &mut rng);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_toggle_pause_round_trips() {
        let (mut state, ..) = quiet();
        toggle_pause(&mut state);
        assert_eq!(state.status, GameStatus::Paused);
        toggle_pause(&mut state);
        assert_eq!(state.status, GameStatus::Playing);

        state.status = GameStatus::BossFight;
        state.boss = Some(Boss::new(BossKind::Destroyer, 400.0));
        toggle_pause(&mut state);
        assert_eq!(state.status, GameStatus::Paused);
        toggle_pause(&mut state);
        assert_eq!(state.status, GameStatus::BossFight);

        state.status = GameStatus::Menu;
        toggle_pause(&mut state);
        assert_eq!(state.status, GameStatus::Menu);
    }

    #[test]
    fn test_laser_kills_asteroid_end_to_end() {
        let (mut state, catalog, tuning, mut rng) = quiet();
        move_to(&mut state, 100.0);
        let enemy_id = add_enemy(&mut state, EnemyKind::Asteroid, 100.0, -50.0);
        assert!(shoot(&mut state));
        assert_eq!(state.bullets.len(), 1);

        for _ in 0..120 {
            tick(&mut state, &catalog, &tuning, &mut rng);
            if state.enemies.is_empty() {
                break;
            }
        }
        assert!(state.enemies.iter().all(|e| e.id != enemy_id));
        assert_eq!(state.score, 10);
        assert_eq!(state.credits, 1);
        assert_eq!(state.kill_count, 1);
        assert!(state.bullets.is_empty());
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::EnemyKilled { kind: EnemyKind::Asteroid, points: 10 }))
        );
    }

    #[test]
    fn test_fire_rate_throttles_shots() {
        let (mut state, catalog, tuning, mut rng) = quiet();
        assert!(shoot(&mut state));
        assert!(!shoot(&mut state));
        // Fighter (0.3) x Laser (0.3) = 90 ms = 6 ticks at 60 Hz
        for _ in 0..5 {
            tick(&mut state, &catalog, &tuning, &mut rng);
        }
        assert!(!shoot(&mut state));
        tick(&mut state, &catalog, &tuning, &mut rng);
        assert!(shoot(&mut state));
    }

    #[test]
    fn test_shoot_ignored_while_paused() {
        let (mut state, ..) = quiet();
        toggle_pause(&mut state);
        assert!(!shoot(&mut state));
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_multishot_fans_five_bullets() {
        let (mut state, ..) = quiet();
        state.weapon = state.loadout_weapon.with_upgrade(WeaponUpgrade::Multishot);
        assert!(shoot(&mut state));
        assert_eq!(state.bullets.len(), 5);
        let angles: Vec<f32> = state.bullets.iter().map(|b| b.angle.to_degrees().round()).collect();
        assert_eq!(angles, vec![-25.0, -12.0, 0.0, 12.0, 25.0]);
        assert!(state.bullets.iter().all(|b| b.pos.y == PLAYER_Y - MUZZLE_OFFSET));
    }

    #[test]
    fn test_movement_clamped() {
        let (mut state, _, tuning, _) = quiet();
        move_to(&mut state, -500.0);
        assert_eq!(state.player.pos.x, PLAYER_MIN_X);
        move_to(&mut state, 5000.0);
        assert_eq!(state.player.pos.x, PLAYER_MAX_X);
        move_left(&mut state, &tuning);
        assert_eq!(state.player.pos.x, PLAYER_MAX_X - 40.0);
        state.player.has_speed_boost = true;
        move_left(&mut state, &tuning);
        assert_eq!(state.player.pos.x, PLAYER_MAX_X - 100.0);
    }

    #[test]
    fn test_last_life_collision_ends_game() {
        let (mut state, catalog, tuning, mut rng) = quiet();
        state.player.health = 1;
        let p = state.player.pos;
        add_enemy(&mut state, EnemyKind::EnemyShip, p.x, p.y - 4.0);
        tick(&mut state, &catalog, &tuning, &mut rng);
        assert_eq!(state.player.health, 0);
        assert_eq!(state.status, GameStatus::GameOver);
        assert!(state.enemies.is_empty());
        assert_eq!(
            state.events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count(),
            1
        );
    }

    #[test]
    fn test_speed_bonus_expires_after_five_seconds() {
        let (mut state, catalog, tuning, mut rng) = quiet();
        let pos = state.player.pos;
        apply_bonus(&mut state, BonusKind::Speed, pos, &catalog, &tuning, &mut rng);
        assert!(state.player.has_speed_boost);
        assert_eq!(state.credits, 15);

        // 300 ticks = 5000 ms
        for _ in 0..299 {
            tick(&mut state, &catalog, &tuning, &mut rng);
        }
        assert!(state.player.has_speed_boost);
        tick(&mut state, &catalog, &tuning, &mut rng);
        assert!(!state.player.has_speed_boost);
    }

    #[test]
    fn test_repeat_pickup_restarts_timer() {
        let (mut state, catalog, tuning, mut rng) = quiet();
        let pos = state.player.pos;
        apply_bonus(&mut state, BonusKind::Invincibility, pos, &catalog, &tuning, &mut rng);
        for _ in 0..180 {
            tick(&mut state, &catalog, &tuning, &mut rng);
        }
        let pos = state.player.pos;
        apply_bonus(&mut state, BonusKind::Invincibility, pos, &catalog, &tuning, &mut rng);
        for _ in 0..200 {
            tick(&mut state, &catalog, &tuning, &mut rng);
        }
        // 380 ticks in, but the second pickup at tick 180 runs until tick 480
        assert!(state.player.is_invincible);
        for _ in 0..100 {
            tick(&mut state, &catalog, &tuning, &mut rng);
        }
        assert!(!state.player.is_invincible);
    }

    #[test]
    fn test_weapon_bonus_upgrades_then_reverts() {
        let (mut state, catalog, tuning, mut rng) = quiet();
        let pos = state.player.pos;
        apply_bonus(&mut state, BonusKind::Weapon, pos, &catalog, &tuning, &mut rng);
        assert!(state.weapon.upgrade.is_some());
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::WeaponUnlocked(_))));
        assert_eq!(state.credits, 50);

        for _ in 0..600 {
            tick(&mut state, &catalog, &tuning, &mut rng);
        }
        assert!(state.weapon.upgrade.is_none());
        assert_eq!(state.weapon.kind, state.loadout_weapon.kind);
        assert_eq!(state.weapon.kind, WeaponKind::Laser);
    }

    #[test]
    fn test_reversion_of_cleared_flag_is_noop() {
        let (mut state, ..) = quiet();
        revert_effect(&mut state, TimedEffect::Invincibility);
        assert!(!state.player.is_invincible);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_boss_spawns_on_interval_and_switches_status() {
        let (mut state, catalog, tuning, mut rng) = quiet();
        state.score = 2990;
        add_enemy(&mut state, EnemyKind::Asteroid, 400.0, 300.0);
        state.bullets.push(Bullet::fired(
            99,
            Vec2::new(400.0, 320.0),
            0.0,
            &state.weapon.clone(),
        ));
        tick(&mut state, &catalog, &tuning, &mut rng);
        assert_eq!(state.score, 3000);
        assert!(state.boss.is_some());
        assert_eq!(state.status, GameStatus::BossFight);
        assert_eq!(state.zone.id, 3);
        assert!(state.events.contains(&GameEvent::BossSpawned(BossKind::Destroyer)));
    }

    #[test]
    fn test_boss_defeat_awards_and_returns_to_playing() {
        let (mut state, catalog, tuning, mut rng) = quiet();
        let mut boss = Boss::new(BossKind::Destroyer, 400.0);
        boss.pos.y = BOSS_HOVER_Y;
        boss.health = 1;
        state.boss = Some(boss);
        state.status = GameStatus::BossFight;
        let id = state.next_entity_id();
        let bullet = Bullet::fired(id, Vec2::new(400.0, 150.0), 0.0, &state.weapon.clone());
        state.bullets.push(bullet);

        tick(&mut state, &catalog, &tuning, &mut rng);
        assert!(state.boss.is_none());
        assert_eq!(state.score, 1000);
        assert_eq!(state.credits, 100);
        assert_eq!(state.wave_number, 2);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.zone.id, 2);
    }

    #[test]
    fn test_explicit_combo_hook_awards_base_times_count() {
        let (mut state, catalog, tuning, mut rng) = quiet();
        assert_eq!(on_enemy_killed(&mut state, &tuning), 50);
        for _ in 0..60 {
            tick(&mut state, &catalog, &tuning, &mut rng);
        }
        assert_eq!(state.time_ms(), 1000);
        assert_eq!(on_enemy_killed(&mut state, &tuning), 100);
        assert_eq!(state.score, 150);
    }

    #[test]
    fn test_chained_kills_add_combo_bonus() {
        let (mut state, catalog, tuning, mut rng) = quiet();
        add_enemy(&mut state, EnemyKind::Asteroid, 100.0, 300.0);
        add_enemy(&mut state, EnemyKind::Asteroid, 600.0, 300.0);
        for x in [100.0, 600.0] {
            let id = state.next_entity_id();
            let bullet = Bullet::fired(id, Vec2::new(x, 320.0), 0.0, &state.weapon.clone());
            state.bullets.push(bullet);
        }
        tick(&mut state, &catalog, &tuning, &mut rng);
        // 10 + (10 + 50 * 2)
        assert_eq!(state.score, 120);
        assert_eq!(state.combo.count, 2);
    }
}
