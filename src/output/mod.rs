//! Output formatting for momentum.
//!
//! This module provides formatters for displaying ledger data in pretty or
//! JSON form, plus the `{status, message}` envelopes mutating commands emit.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::MomentumError;
use crate::features::ledger::{AssignedTask, RewardsView, WalletHistory};
use crate::features::stats::ProgressSummary;

pub use json::*;
pub use pretty::*;

/// Format today's assigned tasks based on output format
///
/// # Errors
///
/// Returns `MomentumError::Parse` if JSON serialization fails.
pub fn format_tasks(tasks: &[AssignedTask], format: OutputFormat) -> Result<String, MomentumError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks)),
        OutputFormat::Json => format_tasks_json(tasks),
    }
}

/// Format the reward catalog based on output format
///
/// # Errors
///
/// Returns `MomentumError::Parse` if JSON serialization fails.
pub fn format_rewards(view: &RewardsView, format: OutputFormat) -> Result<String, MomentumError> {
    match format {
        OutputFormat::Pretty => Ok(format_rewards_pretty(view)),
        OutputFormat::Json => format_rewards_json(view),
    }
}

/// Format wallet history based on output format
///
/// # Errors
///
/// Returns `MomentumError::Parse` if JSON serialization fails.
pub fn format_wallet(
    history: &WalletHistory,
    limit: usize,
    format: OutputFormat,
) -> Result<String, MomentumError> {
    match format {
        OutputFormat::Pretty => Ok(format_wallet_pretty(history, limit)),
        OutputFormat::Json => format_wallet_json(history),
    }
}

/// Format a progress summary based on output format
///
/// # Errors
///
/// Returns `MomentumError::Parse` if JSON serialization fails.
pub fn format_stats(
    summary: &ProgressSummary,
    format: OutputFormat,
) -> Result<String, MomentumError> {
    match format {
        OutputFormat::Pretty => Ok(format_stats_pretty(summary)),
        OutputFormat::Json => format_stats_json(summary),
    }
}
