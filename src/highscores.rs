//! High score leaderboard system
//!
//! Persisted to a JSON file, tracks top 10 scores. The game only sees the
//! [`ScoreStore`] trait and saves one [`ScoreRecord`] per finished run.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Result of a finished run, handed to the score store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_name: String,
    pub score: u64,
    /// Wave reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp_ms: u64,
}

/// Destination for finished runs
pub trait ScoreStore: Send {
    fn save(&mut self, record: &ScoreRecord) -> Result<(), StoreError>;
}

/// Store that discards every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScoreStore;

impl ScoreStore for NullScoreStore {
    fn save(&mut self, _record: &ScoreRecord) -> Result<(), StoreError> {
        Ok(())
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HighScores {
    pub entries: Vec<ScoreRecord>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a run to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, record: ScoreRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| record.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load a leaderboard from `path`, starting fresh if it is missing or unreadable
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt high score file {}: {}", path.display(), e);
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Write the leaderboard to `path`
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// JSON-file backed leaderboard.
///
/// The in-memory table is updated synchronously; the file write happens on a
/// background thread so a slow disk never stalls the simulation. Write
/// failures are logged and dropped. Dropping the store waits for the last
/// write.
#[derive(Debug)]
pub struct HighScoreFile {
    path: PathBuf,
    scores: HighScores,
    pending: Option<JoinHandle<()>>,
}

impl HighScoreFile {
    /// Open the leaderboard at `path` (missing file = empty table)
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = HighScores::load(&path);
        Self {
            path,
            scores,
            pending: None,
        }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for HighScoreFile {
    fn save(&mut self, record: &ScoreRecord) -> Result<(), StoreError> {
        let Some(rank) = self.scores.add_score(record.clone()) else {
            log::debug!("Score {} did not make the leaderboard", record.score);
            return Ok(());
        };
        log::info!("{} placed #{} with {}", record.player_name, rank, record.score);

        let json = serde_json::to_string_pretty(&self.scores)?;
        let path = self.path.clone();
        let previous = self.pending.take();
        self.pending = Some(std::thread::spawn(move || {
            // Keep writes in order
            if let Some(handle) = previous {
                if handle.join().is_err() {
                    log::warn!("Previous high score write panicked");
                }
            }
            if let Err(e) = std::fs::write(&path, json) {
                log::warn!("Failed to write high scores to {}: {}", path.display(), e);
            }
        }));
        Ok(())
    }
}

impl Drop for HighScoreFile {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            if handle.join().is_err() {
                log::warn!("High score writer thread panicked");
            }
        }
    }
}
