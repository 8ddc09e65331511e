//! Error types for momentum.
//!
//! The ledger's rejection taxonomy (not found, already completed, reward
//! unavailable, insufficient balance) is carried alongside infrastructure
//! failures in one crate-level enum. Rejections are expected, recoverable
//! outcomes that callers render as error results; everything else is a fault.

use thiserror::Error;

/// The error type used across momentum.
#[derive(Debug, Error)]
pub enum MomentumError {
    /// Configuration or usage errors.
    #[error("{0}")]
    Config(String),

    /// A task, reward, assignment, or profile lookup found nothing.
    #[error("{0}")]
    NotFound(String),

    /// The assignment was already completed; no second payout.
    #[error("Task already completed")]
    AlreadyCompleted,

    /// The reward exists but is currently disabled.
    #[error("Reward is not available")]
    Unavailable,

    /// The balance does not cover the reward cost.
    #[error("Insufficient token balance")]
    InsufficientBalance {
        /// Tokens the reward costs.
        required: u32,
        /// Tokens the user has.
        available: u32,
    },

    /// Underlying store failure. Callers may retry the operation.
    #[error("Database error: {0}")]
    Database(String),

    /// JSON serialization failure.
    #[error("Failed to serialize output: {0}")]
    Parse(#[from] serde_json::Error),
}

impl MomentumError {
    /// Whether this is an expected ledger rejection rather than a fault.
    ///
    /// Rejections are surfaced to callers as `{status: "error"}` results;
    /// faults propagate and terminate the command.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::AlreadyCompleted
                | Self::Unavailable
                | Self::InsufficientBalance { .. }
        )
    }
}
