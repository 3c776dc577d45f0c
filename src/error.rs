//! Error types.
//!
//! Nothing in the per-tick path returns these: runtime faults degrade to
//! "no effect" or "challenge failed". Only configuration loading and
//! challenge admission report errors to the caller.

use std::path::PathBuf;

/// Errors loading or validating a challenge book
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse challenge book: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Challenge '{id}' is invalid: {reason}")]
    Invalid { id: String, reason: String },

    #[error("Challenge id '{0}' is defined more than once")]
    DuplicateId(String),
}

/// Errors admitting a challenge into the runner
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChallengeError {
    #[error("A challenge is already running ({active})")]
    RunnerBusy { active: &'static str },

    #[error("No challenge named '{0}'")]
    UnknownChallenge(String),

    #[error("Invalid {challenge} challenge: {reason}")]
    InvalidChallenge {
        challenge: &'static str,
        reason: &'static str,
    },
}
