//! # World Generation Error Types
//!
//! Generation itself is total: every operation succeeds for well-formed
//! inputs, and the spacing heuristic degrades silently rather than
//! failing. The errors here come from the two places the outside world
//! hands us data: config files and snapshots. A corrupt snapshot must be
//! rejected loudly - silently accepting one would desynchronize a
//! multiplayer session.

use thiserror::Error;

/// Errors that can occur in the world generation system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// Snapshot is structurally inconsistent.
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot {
        /// What failed validation.
        reason: String,
    },

    /// Snapshot bytes did not decode.
    #[error("snapshot decode failed: {0}")]
    SnapshotDecode(String),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WorldError {
    /// Shorthand for an [`WorldError::InvalidSnapshot`] with a formatted
    /// reason.
    #[must_use]
    pub fn invalid_snapshot(reason: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            reason: reason.into(),
        }
    }
}

/// Result type for world generation operations.
pub type WorldResult<T> = Result<T, WorldError>;
