//! Error types

use thiserror::Error;

/// Static catalog problems detected before a run can start
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("zone catalog is empty")]
    EmptyZones,

    #[error("ship catalog is empty")]
    EmptyShips,

    #[error("weapon catalog is empty")]
    EmptyWeapons,

    /// No zone is reachable at score 0
    #[error("no zone has a required score of 0 (lowest is {0})")]
    NoStartingZone(u64),

    #[error("zones must be sorted by required score ({0} follows {1})")]
    UnsortedZones(u64, u64),
}

/// Failure writing a JSON file (high scores or settings)
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON failed: {0}")]
    Json(#[from] serde_json::Error),
}
