//! Progress statistics derived from the token ledger.
//!
//! Aggregates the transaction log into per-day earn/spend activity for the
//! dashboard-style `stats` command. Everything here is computed, never
//! stored.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::core::TransactionKind;
use crate::error::MomentumError;
use crate::features::ledger::LedgerStore;

/// One day of token activity.
#[derive(Debug, Clone, Serialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub earned: u32,
    pub spent: u32,
    pub tasks_completed: u32,
}

/// Activity over a trailing window of days.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    /// One entry per day in the window, oldest first. Days without
    /// activity are zero-filled.
    pub days: Vec<DailyActivity>,
    pub total_earned: u32,
    pub total_spent: u32,
    pub current_balance: u32,
    pub streak_days: u32,
}

impl ProgressSummary {
    /// Aggregate the user's transaction log over the trailing `window_days`
    /// ending at `today`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown user or `Database` if the store
    /// fails.
    pub fn collect<S: LedgerStore>(
        store: &S,
        user_id: i64,
        window_days: u32,
        today: NaiveDate,
    ) -> Result<Self, MomentumError> {
        let user = store
            .user(user_id)?
            .ok_or_else(|| MomentumError::NotFound("Profile not found".to_string()))?;

        let window_days = window_days.max(1);
        let start = today - Duration::days(i64::from(window_days) - 1);

        let mut by_date: HashMap<NaiveDate, DailyActivity> = HashMap::new();

        for transaction in store.transactions(user_id)? {
            let date = transaction.date.date_naive();
            if date < start || date > today {
                continue;
            }

            let entry = by_date.entry(date).or_insert_with(|| DailyActivity {
                date,
                earned: 0,
                spent: 0,
                tasks_completed: 0,
            });

            match transaction.kind {
                TransactionKind::Earn => {
                    entry.earned += transaction.amount;
                    if transaction.related_task_id.is_some() {
                        entry.tasks_completed += 1;
                    }
                }
                TransactionKind::Bonus => entry.earned += transaction.amount,
                TransactionKind::Spend => entry.spent += transaction.amount,
            }
        }

        let days: Vec<DailyActivity> = (0..window_days)
            .map(|offset| {
                let date = start + Duration::days(i64::from(offset));
                by_date.remove(&date).unwrap_or(DailyActivity {
                    date,
                    earned: 0,
                    spent: 0,
                    tasks_completed: 0,
                })
            })
            .collect();

        let total_earned = days.iter().map(|d| d.earned).sum();
        let total_spent = days.iter().map(|d| d.spent).sum();

        Ok(Self {
            days,
            total_earned,
            total_spent,
            current_balance: user.token_balance,
            streak_days: user.streak_days,
        })
    }
}
