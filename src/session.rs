//! Progress carried between runs
//!
//! A [`Session`] owns the player's credits, ship/weapon selection, unlocks,
//! ship upgrades and achievements. It builds the [`Loadout`] for each run
//! and folds the run's results back in afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::state::{GameEvent, GameState};
use crate::tuning::{Catalog, Difficulty, Loadout, MAX_UPGRADE_LEVEL, ShipKind, UpgradeKind, WeaponKind};

/// Credits a brand new pilot starts with
pub const STARTING_CREDITS: u64 = 1000;

/// Milestones that pay out credits once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    FirstKill,
    Score1000,
    Score5000,
    Score10000,
    UnlockAllShips,
    BossDefeated,
    PerfectWave,
    WeaponMaster,
    CreditsEarned,
}

impl Achievement {
    pub const ALL: [Achievement; 9] = [
        Achievement::FirstKill,
        Achievement::Score1000,
        Achievement::Score5000,
        Achievement::Score10000,
        Achievement::UnlockAllShips,
        Achievement::BossDefeated,
        Achievement::PerfectWave,
        Achievement::WeaponMaster,
        Achievement::CreditsEarned,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Achievement::FirstKill => "First Blood",
            Achievement::Score1000 => "Rookie Pilot",
            Achievement::Score5000 => "Seasoned Fighter",
            Achievement::Score10000 => "Master of Space",
            Achievement::UnlockAllShips => "Collector",
            Achievement::BossDefeated => "Boss Slayer",
            Achievement::PerfectWave => "Flawless",
            Achievement::WeaponMaster => "Weapon Master",
            Achievement::CreditsEarned => "Wealthy",
        }
    }

    /// Credits paid when unlocked
    pub fn reward(&self) -> u64 {
        match self {
            Achievement::FirstKill => 50,
            Achievement::Score1000 => 100,
            Achievement::Score5000 => 250,
            Achievement::Score10000 => 500,
            Achievement::UnlockAllShips => 1000,
            Achievement::BossDefeated => 300,
            Achievement::PerfectWave => 200,
            Achievement::WeaponMaster => 400,
            Achievement::CreditsEarned => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub credits: u64,
    pub selected_ship: ShipKind,
    pub selected_weapon: WeaponKind,
    pub unlocked_ships: Vec<ShipKind>,
    pub unlocked_weapons: Vec<WeaponKind>,
    /// Upgrade levels bought per ship
    #[serde(default)]
    pub upgrades: HashMap<ShipKind, HashMap<UpgradeKind, u32>>,
    /// Unlocked achievements, in unlock order
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    /// Achievement rewards earned during a run, paid out by `settle_run`
    #[serde(default)]
    pub pending_rewards: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            credits: STARTING_CREDITS,
            selected_ship: ShipKind::Fighter,
            selected_weapon: WeaponKind::Laser,
            unlocked_ships: vec![ShipKind::Fighter],
            unlocked_weapons: vec![WeaponKind::Laser, WeaponKind::Plasma, WeaponKind::RailGun],
            upgrades: HashMap::new(),
            achievements: Vec::new(),
            pending_rewards: 0,
        }
    }
}

impl Session {
    pub fn is_ship_unlocked(&self, kind: ShipKind) -> bool {
        self.unlocked_ships.contains(&kind)
    }

    pub fn is_weapon_unlocked(&self, kind: WeaponKind) -> bool {
        self.unlocked_weapons.contains(&kind)
    }

    /// Select an owned (or free) ship. Returns false if the ship is locked.
    pub fn select_ship(&mut self, catalog: &Catalog, kind: ShipKind) -> bool {
        let free = catalog.ships.iter().any(|s| s.kind == kind && s.price == 0);
        if !free && !self.is_ship_unlocked(kind) {
            return false;
        }
        self.selected_ship = kind;
        true
    }

    /// Buy and select a ship. Fails if already owned or unaffordable.
    pub fn purchase_ship(&mut self, catalog: &Catalog, kind: ShipKind) -> bool {
        let Some(ship) = catalog.ships.iter().find(|s| s.kind == kind) else {
            return false;
        };
        if self.is_ship_unlocked(kind) || self.credits < ship.price {
            return false;
        }
        self.credits -= ship.price;
        self.unlocked_ships.push(kind);
        self.selected_ship = kind;
        log::info!("Purchased {} for {} credits", ship.name, ship.price);
        true
    }

    /// Select an unlocked weapon. Returns false if the weapon is locked.
    pub fn select_weapon(&mut self, kind: WeaponKind) -> bool {
        if !self.is_weapon_unlocked(kind) {
            return false;
        }
        self.selected_weapon = kind;
        true
    }

    pub fn unlock_weapon(&mut self, kind: WeaponKind) {
        if !self.is_weapon_unlocked(kind) {
            self.unlocked_weapons.push(kind);
            log::info!("Unlocked weapon {:?}", kind);
        }
    }

    pub fn add_credits(&mut self, amount: u64) {
        self.credits += amount;
    }

    pub fn upgrade_level(&self, ship: ShipKind, kind: UpgradeKind) -> u32 {
        self.upgrades
            .get(&ship)
            .and_then(|levels| levels.get(&kind))
            .copied()
            .unwrap_or(0)
    }

    /// Buy the next level of `kind` for `ship`.
    /// Fails at the level cap or when the next level is unaffordable.
    pub fn purchase_upgrade(&mut self, ship: ShipKind, kind: UpgradeKind) -> bool {
        let level = self.upgrade_level(ship, kind);
        let cost = kind.cost(level + 1);
        if level >= MAX_UPGRADE_LEVEL || self.credits < cost {
            return false;
        }
        self.credits -= cost;
        self.upgrades.entry(ship).or_default().insert(kind, level + 1);
        log::info!("Upgraded {:?} {:?} to level {} for {} credits", ship, kind, level + 1, cost);
        true
    }

    pub fn has_achievement(&self, achievement: Achievement) -> bool {
        self.achievements.contains(&achievement)
    }

    /// Unlock every achievement `state` satisfies and bank its reward.
    ///
    /// Call once per published snapshot, after [`Session::observe`]. Rewards
    /// are held until the run is settled, since the run owns the credit
    /// balance while it is in progress. Returns the newly unlocked ones.
    pub fn check_achievements(&mut self, catalog: &Catalog, state: &GameState) -> Vec<Achievement> {
        let boss_down = state.events.iter().any(|e| matches!(e, GameEvent::BossDefeated(_)));

        let mut unlocked = Vec::new();
        for achievement in Achievement::ALL {
            if self.has_achievement(achievement) {
                continue;
            }
            let earned = match achievement {
                Achievement::FirstKill => state.kill_count > 0,
                Achievement::Score1000 => state.score >= 1000,
                Achievement::Score5000 => state.score >= 5000,
                Achievement::Score10000 => state.score >= 10_000,
                Achievement::UnlockAllShips => catalog
                    .ships
                    .iter()
                    .all(|s| s.price == 0 || self.is_ship_unlocked(s.kind)),
                Achievement::BossDefeated => boss_down,
                Achievement::PerfectWave => boss_down && state.player.health == state.ship.max_health,
                Achievement::WeaponMaster => catalog.weapons.iter().all(|w| self.is_weapon_unlocked(w.kind)),
                Achievement::CreditsEarned => state.credits >= STARTING_CREDITS,
            };
            if earned {
                log::info!("Achievement unlocked: {} (+{} credits)", achievement.title(), achievement.reward());
                self.achievements.push(achievement);
                self.pending_rewards += achievement.reward();
                unlocked.push(achievement);
            }
        }
        unlocked
    }

    /// Build the loadout for the next run, with the selected ship's upgrades
    /// applied.
    ///
    /// Selections missing from `catalog` fall back to its first entries.
    pub fn loadout(&self, catalog: &Catalog, difficulty: Difficulty) -> Result<Loadout, ConfigError> {
        let mut loadout = catalog.default_loadout(self.credits)?;
        if let Some(ship) = catalog.ships.iter().find(|s| s.kind == self.selected_ship) {
            loadout.ship = ship.clone();
        }
        if let Some(weapon) = catalog.weapons.iter().find(|w| w.kind == self.selected_weapon) {
            loadout.weapon = weapon.clone();
        }
        loadout.difficulty = difficulty;
        for kind in UpgradeKind::ALL {
            kind.apply(self.upgrade_level(loadout.ship.kind, kind), &mut loadout);
        }
        Ok(loadout)
    }

    /// Pick up unlocks raised in a snapshot. Call once per published snapshot.
    pub fn observe(&mut self, state: &GameState) {
        for event in &state.events {
            if let GameEvent::WeaponUnlocked(kind) = event {
                self.unlock_weapon(*kind);
            }
        }
    }

    /// Take the run's credit balance once it has ended, plus any
    /// achievement rewards earned along the way
    pub fn settle_run(&mut self, state: &GameState) {
        log::info!(
            "Run settled: {} credits (was {}), {} from achievements",
            state.credits,
            self.credits,
            self.pending_rewards
        );
        self.credits = state.credits;
        let rewards = std::mem::take(&mut self.pending_rewards);
        self.add_credits(rewards);
    }
}
