//! Per-tick motion for every entity kind

use super::state::{Boss, Bonus, Bullet, Enemy, Particle};
use crate::consts::*;
use crate::{heading, normalize_angle};

/// Steer homing bullets, advance every bullet along its heading and drop
/// the ones that left through the top.
pub fn advance_bullets(bullets: &mut Vec<Bullet>, enemies: &[Enemy]) {
    for bullet in bullets.iter_mut() {
        if bullet.homing {
            steer_toward_nearest(bullet, enemies);
        }
        bullet.pos += heading(bullet.angle) * bullet.speed;
    }
    bullets.retain(|b| b.pos.y > TOP_BOUNDARY);
}

fn steer_toward_nearest(bullet: &mut Bullet, enemies: &[Enemy]) {
    let target = enemies
        .iter()
        .filter(|e| e.is_alive() && e.pos.y < bullet.pos.y)
        .min_by(|a, b| {
            a.pos
                .distance_squared(bullet.pos)
                .partial_cmp(&b.pos.distance_squared(bullet.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(enemy) = target {
        let to_target = enemy.pos - bullet.pos;
        // Angle from straight up, clockwise positive (matches `heading`)
        let desired = to_target.x.atan2(-to_target.y);
        let delta = normalize_angle(desired - bullet.angle);
        bullet.angle = normalize_angle(bullet.angle + delta.clamp(-HOMING_TURN_RATE, HOMING_TURN_RATE));
    }
}

/// Per-tick fall step for an enemy in a zone with `zone_speed`
#[inline]
pub fn enemy_step(enemy: &Enemy, zone_speed: f32) -> f32 {
    (enemy.speed * zone_speed).min(MAX_ENEMY_SPEED)
}

/// Move enemies down and drop the ones past the bottom
pub fn advance_enemies(enemies: &mut Vec<Enemy>, zone_speed: f32) {
    for enemy in enemies.iter_mut() {
        enemy.pos.y += enemy_step(enemy, zone_speed);
    }
    enemies.retain(|e| e.pos.y < BOTTOM_BOUNDARY);
}

pub fn advance_bonuses(bonuses: &mut Vec<Bonus>) {
    for bonus in bonuses.iter_mut() {
        bonus.pos.y += BONUS_FALL_SPEED;
    }
    bonuses.retain(|b| b.pos.y < BOTTOM_BOUNDARY);
}

/// Boss descends to the hover line, then holds
pub fn advance_boss(boss: &mut Boss) {
    boss.pos.y = (boss.pos.y + BOSS_DESCENT_SPEED).min(BOSS_HOVER_Y);
}

/// Cosmetic particles: gravity-biased drift, fade, cap
pub fn advance_particles(particles: &mut Vec<Particle>, dt: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel.y += PARTICLE_GRAVITY * dt;
        particle.life -= dt;
    }
    particles.retain(|p| p.life > 0.0);
    if particles.len() > MAX_PARTICLES {
        let excess = particles.len() - MAX_PARTICLES;
        particles.drain(..excess);
    }
}
