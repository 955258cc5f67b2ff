//! Timed effect scheduler
//!
//! Expiring buffs are kept as a min-heap of `(due_ms, effect, generation)`.
//! Re-acquiring an effect bumps its generation, which orphans the pending
//! reversion; orphaned entries are discarded when they surface.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

/// Effects with a finite duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimedEffect {
    SpeedBoost,
    WeaponUpgrade,
    Invincibility,
}

impl TimedEffect {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            TimedEffect::SpeedBoost => 0,
            TimedEffect::WeaponUpgrade => 1,
            TimedEffect::Invincibility => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
struct Pending {
    due_ms: u64,
    effect: TimedEffect,
    generation: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectScheduler {
    queue: BinaryHeap<Reverse<Pending>>,
    generations: [u64; TimedEffect::COUNT],
}

impl EffectScheduler {
    /// Schedule the reversion of `effect` at `now_ms + duration_ms`,
    /// replacing any reversion already pending for it
    pub fn schedule(&mut self, effect: TimedEffect, now_ms: u64, duration_ms: u64) {
        let slot = &mut self.generations[effect.index()];
        *slot += 1;
        self.queue.push(Reverse(Pending {
            due_ms: now_ms + duration_ms,
            effect,
            generation: *slot,
        }));
    }

    /// Pop every live reversion due at or before `now_ms`, earliest first
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<TimedEffect> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.queue.peek().copied() {
            if next.due_ms > now_ms {
                break;
            }
            self.queue.pop();
            if next.generation == self.generations[next.effect.index()] {
                due.push(next.effect);
            }
        }
        due
    }
}
