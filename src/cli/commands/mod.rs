//! Command implementations for momentum.
//!
//! This module contains the implementation of all CLI commands. Commands
//! return their output as a `String`; main prints it.

mod completions;
mod focus;
mod ledger;
mod seed;

pub use completions::completions;
pub use focus::focus;
pub use ledger::{assign, complete, redeem};
pub use seed::seed;

use crate::cli::args::OutputFormat;
use crate::core::Clock;
use crate::error::MomentumError;
use crate::features::ledger::{Ledger, LedgerStore};
use crate::features::stats::ProgressSummary;
use crate::output::{format_rewards, format_stats, format_tasks, format_wallet};

/// Resolve the single local profile.
///
/// # Errors
///
/// Returns `NotFound` if the database has not been seeded yet.
pub(crate) fn current_user_id<S: LedgerStore>(store: &S) -> Result<i64, MomentumError> {
    store.users()?.first().map(|u| u.id).ok_or_else(|| {
        MomentumError::NotFound("No profile found. Run 'momentum seed' first.".to_string())
    })
}

/// Execute tasks command
///
/// # Errors
///
/// Returns an error if the store fails or output formatting fails.
pub fn tasks<S: LedgerStore, C: Clock>(
    ledger: &Ledger<S, C>,
    format: OutputFormat,
) -> Result<String, MomentumError> {
    let user_id = current_user_id(ledger.store())?;
    let today = ledger.today_tasks(user_id)?;
    format_tasks(&today, format)
}

/// Execute rewards command
///
/// # Errors
///
/// Returns an error if the store fails or output formatting fails.
pub fn rewards<S: LedgerStore, C: Clock>(
    ledger: &Ledger<S, C>,
    format: OutputFormat,
) -> Result<String, MomentumError> {
    let user_id = current_user_id(ledger.store())?;
    let view = ledger.available_rewards(user_id)?;
    format_rewards(&view, format)
}

/// Execute wallet command
///
/// # Errors
///
/// Returns an error if the store fails or output formatting fails.
pub fn wallet<S: LedgerStore, C: Clock>(
    ledger: &Ledger<S, C>,
    limit: usize,
    format: OutputFormat,
) -> Result<String, MomentumError> {
    let user_id = current_user_id(ledger.store())?;
    let history = ledger.wallet_history(user_id)?;
    format_wallet(&history, limit, format)
}

/// Execute stats command
///
/// # Errors
///
/// Returns an error if the store fails or output formatting fails.
pub fn stats<S: LedgerStore, C: Clock>(
    ledger: &Ledger<S, C>,
    days: u32,
    format: OutputFormat,
) -> Result<String, MomentumError> {
    let user_id = current_user_id(ledger.store())?;
    let summary = ProgressSummary::collect(ledger.store(), user_id, days, ledger.today())?;
    format_stats(&summary, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::features::ledger::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn empty_ledger() -> Ledger<MemoryStore, FixedClock> {
        Ledger::new(
            MemoryStore::new(),
            FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 14, 9, 0, 0).unwrap()),
        )
    }

    #[test]
    fn test_commands_require_seeded_profile() {
        let ledger = empty_ledger();

        for result in [
            tasks(&ledger, OutputFormat::Json),
            rewards(&ledger, OutputFormat::Json),
            wallet(&ledger, 10, OutputFormat::Json),
            stats(&ledger, 7, OutputFormat::Json),
        ] {
            match result {
                Err(MomentumError::NotFound(msg)) => assert!(msg.contains("momentum seed")),
                other => panic!("expected NotFound, got {other:?}"),
            }
        }
    }
}
