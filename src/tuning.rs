//! Data-driven game balance
//!
//! Ship, weapon, zone and difficulty tables plus the per-tick tuning knobs.
//! These are data, not logic: the numbers are the game design and several
//! tests depend on them exactly.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::state::BossKind;

/// Weapon families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Laser,
    Plasma,
    RailGun,
    Missile,
    SpreadShot,
    Lightning,
    FreezeRay,
    Nuke,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 8] = [
        WeaponKind::Laser,
        WeaponKind::Plasma,
        WeaponKind::RailGun,
        WeaponKind::Missile,
        WeaponKind::SpreadShot,
        WeaponKind::Lightning,
        WeaponKind::FreezeRay,
        WeaponKind::Nuke,
    ];

    /// Bullet size drawn for this weapon
    pub fn bullet_size(&self) -> f32 {
        match self {
            WeaponKind::RailGun => 12.0,
            WeaponKind::Nuke => 15.0,
            _ => 8.0,
        }
    }
}

/// What a weapon's bullets do on impact (or in flight)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialEffect {
    None,
    /// Bullet is not consumed by enemies
    Piercing,
    /// Bullets steer toward the nearest enemy
    Homing,
    /// Three parallel bullets per shot
    Spread,
    /// Arcs to up to two nearby enemies for half damage
    Chain,
    /// Slows enemies around the impact
    Freeze,
    /// Damages everything around the impact
    Area,
}

/// Transient modifier on the active weapon instance (from a Weapon bonus)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponUpgrade {
    Spread,
    Homing,
    RapidFire,
    Multishot,
    PowerShot,
}

impl WeaponUpgrade {
    pub const ALL: [WeaponUpgrade; 5] = [
        WeaponUpgrade::Spread,
        WeaponUpgrade::Homing,
        WeaponUpgrade::RapidFire,
        WeaponUpgrade::Multishot,
        WeaponUpgrade::PowerShot,
    ];
}

/// A weapon instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub name: String,
    pub damage: i32,
    /// Seconds between shots (scaled by the ship's fire rate)
    pub fire_rate: f32,
    pub bullet_speed: f32,
    pub effect: SpecialEffect,
    #[serde(default)]
    pub upgrade: Option<WeaponUpgrade>,
}

impl Weapon {
    fn entry(
        kind: WeaponKind,
        name: &str,
        damage: i32,
        fire_rate: f32,
        bullet_speed: f32,
        effect: SpecialEffect,
    ) -> Self {
        Self {
            kind,
            name: name.to_string(),
            damage,
            fire_rate,
            bullet_speed,
            effect,
            upgrade: None,
        }
    }

    /// Full weapon catalog in unlock order
    pub fn catalog() -> Vec<Weapon> {
        WeaponKind::ALL.iter().map(|&kind| Self::of(kind)).collect()
    }

    /// Catalog entry for a kind
    pub fn of(kind: WeaponKind) -> Weapon {
        use SpecialEffect as E;
        use WeaponKind as K;
        match kind {
            K::Laser => Self::entry(kind, "Laser", 1, 0.3, 12.0, E::None),
            K::Plasma => Self::entry(kind, "Plasma", 3, 0.8, 8.0, E::None),
            K::RailGun => Self::entry(kind, "Rail Gun", 5, 1.5, 20.0, E::Piercing),
            K::Missile => Self::entry(kind, "Missiles", 4, 1.0, 6.0, E::Homing),
            K::SpreadShot => Self::entry(kind, "Spread Shot", 2, 0.6, 10.0, E::Spread),
            K::Lightning => Self::entry(kind, "Lightning", 2, 0.4, 15.0, E::Chain),
            K::FreezeRay => Self::entry(kind, "Freeze Ray", 1, 0.3, 12.0, E::Freeze),
            K::Nuke => Self::entry(kind, "Nuke", 10, 3.0, 8.0, E::Area),
        }
    }

    /// Same weapon carrying an upgrade
    pub fn with_upgrade(&self, upgrade: WeaponUpgrade) -> Weapon {
        Weapon {
            upgrade: Some(upgrade),
            ..self.clone()
        }
    }

    /// Damage carried by each bullet fired from this instance
    pub fn shot_damage(&self) -> i32 {
        match self.upgrade {
            Some(WeaponUpgrade::PowerShot) => self.damage * 2,
            _ => self.damage,
        }
    }

    /// Whether bullets from this instance steer toward enemies
    pub fn homing(&self) -> bool {
        self.effect == SpecialEffect::Homing || self.upgrade == Some(WeaponUpgrade::Homing)
    }

    /// Minimum milliseconds between shots for a ship with the given fire rate
    pub fn cooldown_ms(&self, ship_fire_rate: f32) -> u64 {
        let mut secs = ship_fire_rate * self.fire_rate;
        if self.upgrade == Some(WeaponUpgrade::RapidFire) {
            secs *= 0.5;
        }
        (secs * 1000.0).round().max(0.0) as u64
    }
}

/// Ship hulls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipKind {
    Fighter,
    Tank,
    Sniper,
    Gunship,
    Stealth,
}

/// Ship stats chosen before a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub kind: ShipKind,
    pub name: String,
    pub max_health: u32,
    /// Lateral step scale (a left/right command moves `speed * 5`)
    pub speed: f32,
    /// Multiplier on the weapon's fire interval
    pub fire_rate: f32,
    pub price: u64,
}

impl Ship {
    pub fn catalog() -> Vec<Ship> {
        let ship = |kind, name: &str, max_health, speed, fire_rate, price| Ship {
            kind,
            name: name.to_string(),
            max_health,
            speed,
            fire_rate,
            price,
        };
        vec![
            ship(ShipKind::Fighter, "Fighter", 3, 8.0, 0.3, 0),
            ship(ShipKind::Tank, "Tank", 8, 4.0, 0.8, 500),
            ship(ShipKind::Sniper, "Sniper", 4, 6.0, 1.2, 750),
            ship(ShipKind::Gunship, "Gunship", 5, 5.0, 0.4, 1000),
            ship(ShipKind::Stealth, "Stealth", 2, 9.0, 0.5, 1500),
        ]
    }
}

/// Highest level any ship upgrade can reach
pub const MAX_UPGRADE_LEVEL: u32 = 5;

/// Per-ship upgrades bought with credits between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    HealthBoost,
    SpeedBoost,
    FireRate,
    DamageMultiplier,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::HealthBoost,
        UpgradeKind::SpeedBoost,
        UpgradeKind::FireRate,
        UpgradeKind::DamageMultiplier,
    ];

    pub fn base_cost(&self) -> u64 {
        match self {
            UpgradeKind::HealthBoost => 100,
            UpgradeKind::SpeedBoost => 150,
            UpgradeKind::FireRate => 200,
            UpgradeKind::DamageMultiplier => 250,
        }
    }

    /// Price of buying `level` (1-based)
    #[inline]
    pub fn cost(&self, level: u32) -> u64 {
        self.base_cost() * level as u64
    }

    /// Apply `level` ranks of this upgrade to a loadout
    pub fn apply(&self, level: u32, loadout: &mut Loadout) {
        if level == 0 {
            return;
        }
        match self {
            UpgradeKind::HealthBoost => loadout.ship.max_health += level,
            UpgradeKind::SpeedBoost => loadout.ship.speed *= 1.0 + 0.05 * level as f32,
            UpgradeKind::FireRate => loadout.ship.fire_rate *= 0.9f32.powi(level as i32),
            UpgradeKind::DamageMultiplier => loadout.weapon.damage += level as i32,
        }
    }
}

/// Score-gated configuration bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: u32,
    pub name: String,
    pub required_score: u64,
    /// Per-tick enemy spawn probability
    pub enemy_spawn_rate: f64,
    /// Enemy speed multiplier
    pub enemy_speed: f32,
    pub boss: Option<BossKind>,
}

impl Zone {
    pub fn catalog() -> Vec<Zone> {
        let zone = |id, name: &str, required_score, enemy_spawn_rate, enemy_speed, boss| Zone {
            id,
            name: name.to_string(),
            required_score,
            enemy_spawn_rate,
            enemy_speed,
            boss,
        };
        vec![
            zone(1, "Asteroid Belt", 0, 0.02, 1.0, None),
            zone(2, "Nebula", 1000, 0.025, 1.2, None),
            zone(3, "Enemy Sector", 2000, 0.03, 1.4, Some(BossKind::Destroyer)),
            zone(4, "Black Hole", 4000, 0.035, 1.6, None),
            zone(5, "Final Battle", 6000, 0.04, 1.8, Some(BossKind::Mothership)),
        ]
    }
}

/// Difficulty scalars applied to spawned enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Nightmare => "Nightmare",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "nightmare" => Some(Difficulty::Nightmare),
            _ => None,
        }
    }

    pub fn enemy_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.2,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.3,
            Difficulty::Nightmare => 1.6,
        }
    }

    pub fn enemy_health(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.2,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Nightmare => 2.0,
        }
    }

    pub fn spawn_rate(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.2,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.3,
            Difficulty::Nightmare => 1.6,
        }
    }

    /// Scale a base health value, never below 1
    pub fn scale_health(&self, base: i32) -> i32 {
        ((base as f32 * self.enemy_health()).ceil() as i32).max(1)
    }
}

/// Per-tick probabilities, intervals, radii and timers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Per-tick bonus spawn probability
    pub bonus_chance: f64,
    /// Boss appears when score is a positive multiple of this
    pub boss_score_interval: u64,
    /// Bullet-enemy hit radius
    pub bullet_hit_radius: f32,
    /// Player-bonus pickup radius
    pub pickup_radius: f32,
    pub chain_radius: f32,
    pub chain_targets: usize,
    pub freeze_radius: f32,
    /// Speed kept by frozen enemies (0.3 = slowed by 70%)
    pub freeze_factor: f32,
    pub blast_radius: f32,
    pub boss_kill_score: u64,
    pub boss_kill_credits: u64,
    pub combo_window_ms: u64,
    pub combo_base_score: u64,
    pub speed_boost_ms: u64,
    pub weapon_upgrade_ms: u64,
    pub invincibility_ms: u64,
    /// Lateral step multiplier while the speed boost is active
    pub speed_boost_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bonus_chance: 0.008,
            boss_score_interval: 3000,
            bullet_hit_radius: 30.0,
            pickup_radius: 40.0,
            chain_radius: 120.0,
            chain_targets: 2,
            freeze_radius: 80.0,
            freeze_factor: 0.3,
            blast_radius: 100.0,
            boss_kill_score: 1000,
            boss_kill_credits: 100,
            combo_window_ms: 3000,
            combo_base_score: 50,
            speed_boost_ms: 5000,
            weapon_upgrade_ms: 10_000,
            invincibility_ms: 5000,
            speed_boost_factor: 1.5,
        }
    }
}

/// The static catalogs a run draws from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Sorted ascending by required score
    pub zones: Vec<Zone>,
    pub ships: Vec<Ship>,
    pub weapons: Vec<Weapon>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            zones: Zone::catalog(),
            ships: Ship::catalog(),
            weapons: Weapon::catalog(),
        }
    }
}

impl Catalog {
    /// Fail fast on catalogs the game cannot start from
    pub fn validate(&self) -> Result<(), ConfigError> {
        let first = self.zones.first().ok_or(ConfigError::EmptyZones)?;
        if self.ships.is_empty() {
            return Err(ConfigError::EmptyShips);
        }
        if self.weapons.is_empty() {
            return Err(ConfigError::EmptyWeapons);
        }
        if first.required_score != 0 {
            return Err(ConfigError::NoStartingZone(first.required_score));
        }
        for pair in self.zones.windows(2) {
            if pair[1].required_score < pair[0].required_score {
                return Err(ConfigError::UnsortedZones(
                    pair[1].required_score,
                    pair[0].required_score,
                ));
            }
        }
        Ok(())
    }

    /// Highest-threshold zone whose requirement is met
    pub fn zone_for_score(&self, score: u64) -> Option<&Zone> {
        self.zones.iter().rev().find(|z| z.required_score <= score)
    }

    /// Default loadout: first ship, first weapon
    pub fn default_loadout(&self, credits: u64) -> Result<Loadout, ConfigError> {
        self.validate()?;
        Ok(Loadout {
            ship: self.ships[0].clone(),
            weapon: self.weapons[0].clone(),
            credits,
            difficulty: Difficulty::Normal,
        })
    }
}

/// Everything chosen before a run starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub ship: Ship,
    pub weapon: Weapon,
    pub credits: u64,
    pub difficulty: Difficulty,
}
