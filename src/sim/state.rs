//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]. Published
//! snapshots are never mutated; the game loop clones, steps and republishes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combo::ComboTracker;
use super::effects::EffectScheduler;
use crate::consts::*;
use crate::ticks_to_ms;
use crate::tuning::{Difficulty, Loadout, Ship, SpecialEffect, Weapon, WeaponKind, Zone};

/// Top-level status of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Menu,
    ShipSelect,
    WeaponSelect,
    Playing,
    Paused,
    BossFight,
    GameOver,
    Victory,
}

impl GameStatus {
    /// Only these statuses admit simulation ticks and combat commands
    pub fn is_running(&self) -> bool {
        matches!(self, GameStatus::Playing | GameStatus::BossFight)
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub health: u32,
    pub weapon: WeaponKind,
    pub has_shield: bool,
    pub is_invincible: bool,
    pub has_speed_boost: bool,
    pub size: f32,
}

impl Player {
    pub fn new(health: u32, weapon: WeaponKind) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_Y),
            health,
            weapon,
            has_shield: false,
            is_invincible: false,
            has_speed_boost: false,
            size: PLAYER_SIZE,
        }
    }

    #[inline]
    pub fn hitbox_radius(&self) -> f32 {
        self.size / 2.0
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(3, WeaponKind::Laser)
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Asteroid,
    BigAsteroid,
    EnemyShip,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Asteroid, EnemyKind::BigAsteroid, EnemyKind::EnemyShip];

    pub fn base_speed(&self) -> f32 {
        match self {
            EnemyKind::Asteroid => 3.0,
            EnemyKind::BigAsteroid => 2.0,
            EnemyKind::EnemyShip => 4.0,
        }
    }

    pub fn base_health(&self) -> i32 {
        match self {
            EnemyKind::Asteroid => 1,
            EnemyKind::BigAsteroid => 3,
            EnemyKind::EnemyShip => 2,
        }
    }

    pub fn size(&self) -> f32 {
        match self {
            EnemyKind::Asteroid => 25.0,
            EnemyKind::BigAsteroid => 40.0,
            EnemyKind::EnemyShip => 30.0,
        }
    }

    pub fn points(&self) -> u64 {
        match self {
            EnemyKind::Asteroid => 10,
            EnemyKind::BigAsteroid => 25,
            EnemyKind::EnemyShip => 50,
        }
    }

    /// RGB color for renderers
    pub fn color(&self) -> u32 {
        match self {
            EnemyKind::Asteroid => 0x888888,
            EnemyKind::BigAsteroid => 0xff0000,
            EnemyKind::EnemyShip => 0xff00ff,
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: i32,
    /// Per-tick fall speed before the zone multiplier
    pub speed: f32,
    pub size: f32,
}

impl Enemy {
    /// Build an enemy from its kind's base table
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            health: kind.base_health(),
            speed: kind.base_speed(),
            size: kind.size(),
        }
    }

    /// Build an enemy with difficulty scalars applied
    pub fn spawn(id: u32, kind: EnemyKind, pos: Vec2, difficulty: Difficulty) -> Self {
        Self {
            health: difficulty.scale_health(kind.base_health()),
            speed: kind.base_speed() * difficulty.enemy_speed(),
            ..Self::new(id, kind, pos)
        }
    }

    #[inline]
    pub fn points(&self) -> u64 {
        self.kind.points()
    }

    #[inline]
    pub fn color(&self) -> u32 {
        self.kind.color()
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// A player projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Heading in radians, 0 = straight up, positive = clockwise
    pub angle: f32,
    pub speed: f32,
    pub size: f32,
    pub weapon: WeaponKind,
    pub effect: SpecialEffect,
    pub damage: i32,
    #[serde(default)]
    pub homing: bool,
    /// Enemy ids already struck (piercing bullets hit each enemy once)
    #[serde(default)]
    pub pierced: Vec<u32>,
}

impl Bullet {
    /// Fire a bullet from `weapon` at `pos` with heading `angle`
    pub fn fired(id: u32, pos: Vec2, angle: f32, weapon: &Weapon) -> Self {
        Self {
            id,
            pos,
            angle,
            speed: weapon.bullet_speed,
            size: weapon.kind.bullet_size(),
            weapon: weapon.kind,
            effect: weapon.effect,
            damage: weapon.shot_damage(),
            homing: weapon.homing(),
            pierced: Vec::new(),
        }
    }
}

/// Bonus pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    Shield,
    Speed,
    Weapon,
    Invincibility,
}

impl BonusKind {
    pub const ALL: [BonusKind; 4] = [
        BonusKind::Shield,
        BonusKind::Speed,
        BonusKind::Weapon,
        BonusKind::Invincibility,
    ];

    /// Credits granted on pickup
    pub fn credit_reward(&self) -> u64 {
        match self {
            BonusKind::Shield => 20,
            BonusKind::Speed => 15,
            BonusKind::Weapon => 50,
            BonusKind::Invincibility => 30,
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            BonusKind::Shield => 0x0000ff,
            BonusKind::Speed => 0xffff00,
            BonusKind::Weapon => 0xff00ff,
            BonusKind::Invincibility => 0x00ff00,
        }
    }
}

/// A falling bonus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub id: u32,
    pub kind: BonusKind,
    pub pos: Vec2,
    pub size: f32,
}

impl Bonus {
    pub fn new(id: u32, kind: BonusKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size: 30.0,
        }
    }

    #[inline]
    pub fn color(&self) -> u32 {
        self.kind.color()
    }
}

/// Boss types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    Destroyer,
    Mothership,
}

/// Boss attack patterns (data for renderers and future boss AI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    SpreadFire,
    LaserBeam,
    MissileBarrage,
    SpawnMinions,
    DeathRay,
    TeleportAttack,
    ShieldPhase,
}

/// A boss entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub kind: BossKind,
    pub name: String,
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub size: f32,
    pub attack_patterns: Vec<AttackPattern>,
    /// 1 until health drops to half, then 2
    pub phase: u32,
}

impl Boss {
    /// Boss template, centered horizontally on `center_x`, parked above the screen
    pub fn new(kind: BossKind, center_x: f32) -> Self {
        match kind {
            BossKind::Destroyer => Self {
                kind,
                name: "Star Destroyer".to_string(),
                pos: Vec2::new(center_x, -200.0),
                health: 50,
                max_health: 50,
                size: 80.0,
                attack_patterns: vec![
                    AttackPattern::SpreadFire,
                    AttackPattern::LaserBeam,
                    AttackPattern::MissileBarrage,
                ],
                phase: 1,
            },
            BossKind::Mothership => Self {
                kind,
                name: "Mothership".to_string(),
                pos: Vec2::new(center_x, -300.0),
                health: 100,
                max_health: 100,
                size: 120.0,
                attack_patterns: vec![
                    AttackPattern::SpawnMinions,
                    AttackPattern::DeathRay,
                    AttackPattern::TeleportAttack,
                    AttackPattern::ShieldPhase,
                ],
                phase: 1,
            },
        }
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Apply damage; health never goes below zero
    pub fn take_damage(&mut self, damage: i32) {
        self.health = (self.health - damage).max(0);
        if self.phase == 1 && self.health * 2 <= self.max_health {
            self.phase = 2;
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: u32,
}

/// Discrete things that happened during the last tick or command.
/// Audio, haptics and persistence observers key off these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired(WeaponKind),
    EnemyKilled { kind: EnemyKind, points: u64 },
    BonusCollected(BonusKind),
    WeaponUnlocked(WeaponKind),
    EffectExpired(super::effects::TimedEffect),
    PlayerHit { health: u32 },
    ShieldBroken,
    BossSpawned(BossKind),
    BossDefeated(BossKind),
    ZoneChanged { id: u32 },
    GameOver { score: u64 },
}

/// Complete game snapshot (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub score: u64,
    pub credits: u64,
    pub wave_number: u32,
    pub zone: Zone,
    pub ship: Ship,
    pub difficulty: Difficulty,
    pub player: Player,
    /// Active weapon instance (may carry a temporary upgrade)
    pub weapon: Weapon,
    /// Weapon chosen at start; the active weapon reverts to it
    pub loadout_weapon: Weapon,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub bonuses: Vec<Bonus>,
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub boss: Option<Boss>,
    pub kill_count: u32,
    pub combo: ComboTracker,
    pub effects: EffectScheduler,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation time of the last accepted shot
    pub last_shot_ms: Option<u64>,
    /// Events raised since the previous snapshot
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh run in the `Playing` status
    pub fn new(loadout: &Loadout, zone: Zone) -> Self {
        Self {
            status: GameStatus::Playing,
            score: 0,
            credits: loadout.credits,
            wave_number: 1,
            zone,
            ship: loadout.ship.clone(),
            difficulty: loadout.difficulty,
            player: Player::new(loadout.ship.max_health, loadout.weapon.kind),
            weapon: loadout.weapon.clone(),
            loadout_weapon: loadout.weapon.clone(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            bonuses: Vec::new(),
            particles: Vec::new(),
            boss: None,
            kill_count: 0,
            combo: ComboTracker::default(),
            effects: EffectScheduler::default(),
            time_ticks: 0,
            last_shot_ms: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulation time in milliseconds
    #[inline]
    pub fn time_ms(&self) -> u64 {
        ticks_to_ms(self.time_ticks)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.bullets.sort_by_key(|b| b.id);
        self.bonuses.sort_by_key(|b| b.id);
    }
}
