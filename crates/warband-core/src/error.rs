//! Error types for scenario loading and entity assembly.
//!
//! Turn resolution itself never fails: missing entities and components are
//! skipped. Only configuration and construction surfaces return errors.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`ScenarioError`].
pub type Result<T, E = ScenarioError> = std::result::Result<T, E>;

/// Errors raised while loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Scenario JSON could not be parsed.
    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    /// Scenario file could not be read.
    #[error("Failed to read scenario file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scenario has no player")]
    NoPlayer,

    #[error("Scenario has {0} players, expected exactly one")]
    MultiplePlayers(usize),

    /// Two entities that block movement start on the same cell.
    #[error("Cell ({x}, {y}) is occupied more than once")]
    Occupied { x: i32, y: i32 },

    #[error("Action quota must be at least 1, got {0}")]
    InvalidQuota(u32),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

/// Errors raised while attaching behaviour to an entity.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// The target entity was despawned before its machine was attached.
    #[error("Entity not found: {0:?}")]
    NoSuchEntity(hecs::Entity),
}
