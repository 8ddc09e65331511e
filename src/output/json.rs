//! JSON output formatting for momentum.
//!
//! Mutating commands emit the discriminated `{status, message, ...}`
//! envelope; the status field, not the exit path, is what callers should
//! branch on.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::MomentumError;
use crate::features::ledger::{AssignedTask, RewardsView, WalletHistory};
use crate::features::stats::ProgressSummary;

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `MomentumError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, MomentumError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format a success envelope, merging the payload's fields in.
///
/// # Errors
///
/// Returns `MomentumError::Parse` if JSON serialization fails.
pub fn success_envelope<T: Serialize>(message: &str, payload: &T) -> Result<String, MomentumError> {
    let mut output = json!({
        "status": "success",
        "message": message,
    });

    if let (Value::Object(envelope), Value::Object(fields)) =
        (&mut output, serde_json::to_value(payload)?)
    {
        for (key, value) in fields {
            envelope.insert(key, value);
        }
    }

    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format an error envelope for an expected rejection.
///
/// # Errors
///
/// Returns `MomentumError::Parse` if JSON serialization fails.
pub fn error_envelope(message: &str) -> Result<String, MomentumError> {
    let output = json!({
        "status": "error",
        "message": message,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format today's assigned tasks as JSON
///
/// # Errors
///
/// Returns `MomentumError::Parse` if JSON serialization fails.
pub fn format_tasks_json(tasks: &[AssignedTask]) -> Result<String, MomentumError> {
    let output = json!({
        "count": tasks.len(),
        "tasks": tasks
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the reward catalog as JSON
///
/// # Errors
///
/// Returns `MomentumError::Parse` if JSON serialization fails.
pub fn format_rewards_json(view: &RewardsView) -> Result<String, MomentumError> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// Format wallet history as JSON
///
/// # Errors
///
/// Returns `MomentumError::Parse` if JSON serialization fails.
pub fn format_wallet_json(history: &WalletHistory) -> Result<String, MomentumError> {
    Ok(serde_json::to_string_pretty(history)?)
}

/// Format a progress summary as JSON
///
/// # Errors
///
/// Returns `MomentumError::Parse` if JSON serialization fails.
pub fn format_stats_json(summary: &ProgressSummary) -> Result<String, MomentumError> {
    Ok(serde_json::to_string_pretty(summary)?)
}
