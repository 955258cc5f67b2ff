//! Kill combo accounting
//!
//! Kills landing within the combo window of the previous kill grow the
//! counter; a late kill restarts it at 1.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTracker {
    /// Current combo counter (0 before the first kill)
    pub count: u32,
    /// Simulation time of the most recent kill
    pub last_kill_ms: Option<u64>,
}

impl ComboTracker {
    /// Register a kill at `now_ms` and return the new counter
    pub fn register_kill(&mut self, now_ms: u64, window_ms: u64) -> u32 {
        let chained = self
            .last_kill_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < window_ms);
        self.count = if chained { self.count + 1 } else { 1 };
        self.last_kill_ms = Some(now_ms);
        self.count
    }

    /// Multiplier shown on the HUD
    pub fn multiplier(&self) -> u32 {
        self.count.max(1)
    }
}

/// Points awarded for a kill at combo `count`
#[inline]
pub fn combo_award(base_score: u64, count: u32) -> u64 {
    base_score * count as u64
}
