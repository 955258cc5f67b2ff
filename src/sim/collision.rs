//! Collision detection and combat resolution
//!
//! Every pair is tested once per tick with squared distances. Bullets are
//! resolved in id order against enemies in id order, so the outcome does
//! not depend on how entities were pushed into their vectors. An enemy can
//! only die once: it stops being a target as soon as its health reaches 0,
//! and dead enemies are swept out after all bullets have been processed.

use super::state::{Bonus, Boss, Bullet, Enemy, Player};
use crate::tuning::{SpecialEffect, Tuning};
use crate::within;

/// Result of resolving all bullets for a tick
#[derive(Debug, Clone, Default)]
pub struct BulletOutcome {
    /// Enemies destroyed this tick, in the order they died
    pub kills: Vec<Enemy>,
    /// Boss that reached 0 health this tick (already removed)
    pub boss_defeated: Option<Boss>,
    /// Boss damage dealt this tick
    pub boss_damage: i32,
}

/// What happened when enemies touched the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Contact {
    #[default]
    None,
    /// Player was invincible; colliding enemies keep falling
    PassedThrough,
    /// Shield was spent; colliding enemies destroyed
    ShieldAbsorbed,
    /// Player lost one health; colliding enemies destroyed
    Damaged,
}

/// Subtract damage from a live enemy, recording the kill if it drops to 0
fn strike(enemies: &mut [Enemy], idx: usize, damage: i32, killed: &mut Vec<usize>) {
    let enemy = &mut enemies[idx];
    if !enemy.is_alive() {
        return;
    }
    enemy.health -= damage;
    if !enemy.is_alive() {
        killed.push(idx);
    }
}

/// Lightning arcs from the struck enemy to its nearest-by-id neighbours
fn chain_lightning(enemies: &mut [Enemy], origin: usize, damage: i32, tuning: &Tuning, killed: &mut Vec<usize>) {
    let center = enemies[origin].pos;
    let targets: Vec<usize> = (0..enemies.len())
        .filter(|&i| i != origin && enemies[i].is_alive() && within(center, enemies[i].pos, tuning.chain_radius))
        .take(tuning.chain_targets)
        .collect();
    for idx in targets {
        strike(enemies, idx, damage, killed);
    }
}

fn freeze_around(enemies: &mut [Enemy], origin: usize, tuning: &Tuning) {
    let center = enemies[origin].pos;
    for enemy in enemies.iter_mut() {
        if enemy.is_alive() && within(center, enemy.pos, tuning.freeze_radius) {
            enemy.speed *= tuning.freeze_factor;
        }
    }
}

fn blast(enemies: &mut [Enemy], origin: usize, damage: i32, tuning: &Tuning, killed: &mut Vec<usize>) {
    let center = enemies[origin].pos;
    for idx in 0..enemies.len() {
        if idx != origin && within(center, enemies[idx].pos, tuning.blast_radius) {
            strike(enemies, idx, damage, killed);
        }
    }
}

/// Resolve bullets against enemies and the boss.
///
/// Consumed bullets are removed from `bullets`; destroyed enemies are
/// removed from `enemies`; a defeated boss is taken out of `boss`.
pub fn resolve_bullets(
    bullets: &mut Vec<Bullet>,
    enemies: &mut Vec<Enemy>,
    boss: &mut Option<Boss>,
    tuning: &Tuning,
) -> BulletOutcome {
    let mut outcome = BulletOutcome::default();
    let mut killed: Vec<usize> = Vec::new();
    let mut consumed = vec![false; bullets.len()];

    for (bi, bullet) in bullets.iter_mut().enumerate() {
        for ei in 0..enemies.len() {
            if consumed[bi] {
                break;
            }
            let target = &enemies[ei];
            if !target.is_alive()
                || bullet.pierced.contains(&target.id)
                || !within(bullet.pos, target.pos, tuning.bullet_hit_radius)
            {
                continue;
            }

            let target_id = target.id;
            strike(enemies, ei, bullet.damage, &mut killed);

            match bullet.effect {
                SpecialEffect::Piercing => bullet.pierced.push(target_id),
                SpecialEffect::Chain => {
                    chain_lightning(enemies, ei, bullet.damage / 2, tuning, &mut killed);
                    consumed[bi] = true;
                }
                SpecialEffect::Freeze => {
                    freeze_around(enemies, ei, tuning);
                    consumed[bi] = true;
                }
                SpecialEffect::Area => {
                    blast(enemies, ei, bullet.damage, tuning, &mut killed);
                    consumed[bi] = true;
                }
                SpecialEffect::None | SpecialEffect::Homing | SpecialEffect::Spread => {
                    consumed[bi] = true;
                }
            }
        }

        if consumed[bi] {
            continue;
        }
        if let Some(target) = boss.as_mut() {
            if !target.is_defeated() && within(bullet.pos, target.pos, target.size) {
                target.take_damage(bullet.damage);
                outcome.boss_damage += bullet.damage;
                consumed[bi] = true;
            }
        }
    }

    let mut consumed = consumed.into_iter();
    bullets.retain(|_| !consumed.next().unwrap_or(false));

    outcome.kills = killed.iter().map(|&i| enemies[i].clone()).collect();
    enemies.retain(|e| e.is_alive());

    if boss.as_ref().is_some_and(|b| b.is_defeated()) {
        outcome.boss_defeated = boss.take();
    }

    outcome
}

/// Resolve enemies touching the player.
///
/// Invincibility wins over the shield, which wins over damage. However many
/// enemies collide, the player loses at most one health (or one shield).
pub fn resolve_player_contact(player: &mut Player, enemies: &mut Vec<Enemy>) -> Contact {
    let reach = player.hitbox_radius();
    let touching =
        |e: &Enemy| e.is_alive() && within(player.pos, e.pos, reach + e.radius());

    if !enemies.iter().any(&touching) {
        return Contact::None;
    }
    if player.is_invincible {
        return Contact::PassedThrough;
    }

    enemies.retain(|e| !touching(e));
    if player.has_shield {
        player.has_shield = false;
        Contact::ShieldAbsorbed
    } else {
        player.health = player.health.saturating_sub(1);
        Contact::Damaged
    }
}

/// Remove and return bonuses within pickup range of the player
pub fn collect_bonuses(player: &Player, bonuses: &mut Vec<Bonus>, tuning: &Tuning) -> Vec<Bonus> {
    let (picked, remaining): (Vec<Bonus>, Vec<Bonus>) = bonuses
        .drain(..)
        .partition(|b| within(player.pos, b.pos, tuning.pickup_radius));
    *bonuses = remaining;
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BonusKind, BossKind, EnemyKind};
    use crate::tuning::{Weapon, WeaponKind};
    use glam::Vec2;

    fn bullet(id: u32, kind: WeaponKind, pos: Vec2) -> Bullet {
        Bullet::fired(id, pos, 0.0, &Weapon::of(kind))
    }

    fn asteroid(id: u32, x: f32, y: f32) -> Enemy {
        Enemy::new(id, EnemyKind::Asteroid, Vec2::new(x, y))
    }

    #[test]
    fn test_laser_kills_and_is_consumed() {
        let tuning = Tuning::default();
        let mut bullets = vec![bullet(1, WeaponKind::Laser, Vec2::new(100.0, 100.0))];
        let mut enemies = vec![asteroid(2, 100.0, 120.0), asteroid(3, 110.0, 110.0)];
        let mut boss = None;

        let outcome = resolve_bullets(&mut bullets, &mut enemies, &mut boss, &tuning);
        assert!(bullets.is_empty());
        assert_eq!(outcome.kills.len(), 1);
        assert_eq!(outcome.kills[0].id, 2);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, 3);
    }

    #[test]
    fn test_two_bullets_one_enemy_dies_once() {
        let tuning = Tuning::default();
        let mut bullets = vec![
            bullet(1, WeaponKind::Laser, Vec2::new(100.0, 100.0)),
            bullet(2, WeaponKind::Laser, Vec2::new(105.0, 100.0)),
        ];
        let mut enemies = vec![asteroid(3, 100.0, 100.0)];
        let mut boss = None;

        let outcome = resolve_bullets(&mut bullets, &mut enemies, &mut boss, &tuning);
        assert_eq!(outcome.kills.len(), 1);
        assert!(enemies.is_empty());
        // Second bullet found nothing alive to hit
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].id, 2);
    }

    #[test]
    fn test_damaged_enemy_keeps_reduced_health() {
        let tuning = Tuning::default();
        let mut bullets = vec![bullet(1, WeaponKind::Laser, Vec2::new(100.0, 100.0))];
        let mut enemies = vec![Enemy::new(2, EnemyKind::BigAsteroid, Vec2::new(100.0, 100.0))];
        let mut boss = None;

        let outcome = resolve_bullets(&mut bullets, &mut enemies, &mut boss, &tuning);
        assert!(outcome.kills.is_empty());
        assert_eq!(enemies[0].health, 2);
    }

    #[test]
    fn test_rail_gun_pierces_every_enemy_once() {
        let tuning = Tuning::default();
        let mut bullets = vec![bullet(1, WeaponKind::RailGun, Vec2::new(100.0, 100.0))];
        let mut enemies = vec![
            Enemy::new(2, EnemyKind::BigAsteroid, Vec2::new(100.0, 90.0)),
            Enemy::new(3, EnemyKind::BigAsteroid, Vec2::new(100.0, 110.0)),
        ];
        let mut boss = None;

        let outcome = resolve_bullets(&mut bullets, &mut enemies, &mut boss, &tuning);
        assert_eq!(outcome.kills.len(), 2);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].pierced, vec![2, 3]);

        // Still overlapping a fresh enemy next tick: hits it, not the old ones
        enemies.push(Enemy::new(4, EnemyKind::BigAsteroid, Vec2::new(100.0, 100.0)));
        let outcome = resolve_bullets(&mut bullets, &mut enemies, &mut boss, &tuning);
        assert_eq!(outcome.kills.len(), 1);
        assert_eq!(bullets[0].pierced, vec![2, 3, 4]);
    }

    #[test]
    fn test_lightning_chains_two_neighbours_for_half_damage() {
        let tuning = Tuning::default();
        let mut bullets = vec![bullet(1, WeaponKind::Lightning, Vec2::new(100.0, 100.0))];
        let mut enemies = vec![
            Enemy::new(2, EnemyKind::BigAsteroid, Vec2::new(100.0, 100.0)),
            Enemy::new(3, EnemyKind::BigAsteroid, Vec2::new(150.0, 100.0)),
            Enemy::new(4, EnemyKind::Asteroid, Vec2::new(100.0, 200.0)),
            Enemy::new(5, EnemyKind::Asteroid, Vec2::new(50.0, 100.0)),
            Enemy::new(6, EnemyKind::Asteroid, Vec2::new(400.0, 400.0)),
        ];
        let mut boss = None;

        let outcome = resolve_bullets(&mut bullets, &mut enemies, &mut boss, &tuning);
        assert!(bullets.is_empty());
        // Struck enemy 2 drops to 1; neighbours 3 and 4 take 1 each; 5 is a third neighbour and is skipped
        assert_eq!(outcome.kills.iter().map(|e| e.id).collect::<Vec<_>>(), vec![4]);
        let health = |id| enemies.iter().find(|e| e.id == id).map(|e| e.health);
        assert_eq!(health(2), Some(1));
        assert_eq!(health(3), Some(2));
        assert_eq!(health(5), Some(1));
        assert_eq!(health(6), Some(1));
    }

    #[test]
    fn test_freeze_slows_neighbourhood() {
        let tuning = Tuning::default();
        let mut bullets = vec![bullet(1, WeaponKind::FreezeRay, Vec2::new(100.0, 100.0))];
        let mut enemies = vec![
            Enemy::new(2, EnemyKind::BigAsteroid, Vec2::new(100.0, 100.0)),
            Enemy::new(3, EnemyKind::EnemyShip, Vec2::new(160.0, 100.0)),
            Enemy::new(4, EnemyKind::EnemyShip, Vec2::new(300.0, 100.0)),
        ];
        let mut boss = None;

        resolve_bullets(&mut bullets, &mut enemies, &mut boss, &tuning);
        assert!(bullets.is_empty());
        assert!((enemies[0].speed - 0.6).abs() < 1e-5);
        assert!((enemies[1].speed - 1.2).abs() < 1e-5);
        assert_eq!(enemies[2].speed, 4.0);
    }

    #[test]
    fn test_nuke_clears_blast_radius() {
        let tuning = Tuning::default();
        let mut bullets = vec![bullet(1, WeaponKind::Nuke, Vec2::new(100.0, 100.0))];
        let mut enemies = vec![
            Enemy::new(2, EnemyKind::BigAsteroid, Vec2::new(100.0, 100.0)),
            Enemy::new(3, EnemyKind::BigAsteroid, Vec2::new(180.0, 100.0)),
            Enemy::new(4, EnemyKind::EnemyShip, Vec2::new(100.0, 190.0)),
            Enemy::new(5, EnemyKind::EnemyShip, Vec2::new(300.0, 100.0)),
        ];
        let mut boss = None;

        let outcome = resolve_bullets(&mut bullets, &mut enemies, &mut boss, &tuning);
        assert_eq!(outcome.kills.len(), 3);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, 5);
        assert!(enemies.iter().all(|e| e.health > 0));
    }

    #[test]
    fn test_boss_takes_damage_and_is_cleared_when_defeated() {
        let tuning = Tuning::default();
        let mut boss = Some(Boss::new(BossKind::Destroyer, 400.0));
        if let Some(b) = boss.as_mut() {
            b.pos.y = 100.0;
            b.health = 2;
        }
        let mut enemies = Vec::new();

        let mut bullets = vec![bullet(1, WeaponKind::Laser, Vec2::new(400.0, 150.0))];
        let outcome = resolve_bullets(&mut bullets, &mut enemies, &mut boss, &tuning);
        assert!(outcome.boss_defeated.is_none());
        assert_eq!(outcome.boss_damage, 1);
        assert_eq!(boss.as_ref().map(|b| b.health), Some(1));

        let mut bullets = vec![
            bullet(2, WeaponKind::Plasma, Vec2::new(400.0, 150.0)),
            bullet(3, WeaponKind::Plasma, Vec2::new(400.0, 150.0)),
        ];
        let outcome = resolve_bullets(&mut bullets, &mut enemies, &mut boss, &tuning);
        let defeated = outcome.boss_defeated.expect("boss defeated");
        assert_eq!(defeated.health, 0);
        assert_eq!(outcome.boss_damage, 3);
        assert!(boss.is_none());
        // Only the first plasma bolt was needed
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn test_contact_damages_once_for_many_enemies() {
        let mut player = Player::default();
        let p = player.pos;
        let mut enemies = vec![
            asteroid(1, p.x, p.y),
            asteroid(2, p.x + 10.0, p.y),
            asteroid(3, p.x + 300.0, p.y),
        ];
        assert_eq!(resolve_player_contact(&mut player, &mut enemies), Contact::Damaged);
        assert_eq!(player.health, 2);
        assert_eq!(enemies.len(), 1);
    }

    #[test]
    fn test_shield_absorbs_contact() {
        let mut player = Player::default();
        player.has_shield = true;
        let mut enemies = vec![asteroid(1, player.pos.x, player.pos.y)];
        assert_eq!(resolve_player_contact(&mut player, &mut enemies), Contact::ShieldAbsorbed);
        assert_eq!(player.health, 3);
        assert!(!player.has_shield);
        assert!(enemies.is_empty());
    }

    #[test]
    fn test_invincible_player_lets_enemies_pass() {
        let mut player = Player::default();
        player.is_invincible = true;
        player.has_shield = true;
        let mut enemies = vec![asteroid(1, player.pos.x, player.pos.y)];
        assert_eq!(resolve_player_contact(&mut player, &mut enemies), Contact::PassedThrough);
        assert_eq!(player.health, 3);
        assert!(player.has_shield);
        assert_eq!(enemies.len(), 1);
    }

    #[test]
    fn test_collect_bonuses_in_range() {
        let tuning = Tuning::default();
        let player = Player::default();
        let mut bonuses = vec![
            Bonus::new(1, BonusKind::Speed, player.pos + Vec2::new(30.0, 0.0)),
            Bonus::new(2, BonusKind::Shield, player.pos + Vec2::new(41.0, 0.0)),
        ];
        let picked = collect_bonuses(&player, &mut bonuses, &tuning);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].kind, BonusKind::Speed);
        assert_eq!(bonuses.len(), 1);
        assert_eq!(bonuses[0].id, 2);
    }
}
