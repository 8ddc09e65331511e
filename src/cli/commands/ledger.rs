//! Ledger command implementations.
//!
//! The two mutating operations (complete, redeem) and the assignment
//! scheduler. Expected rejections - unknown IDs, repeat completions,
//! unavailable rewards, thin balances - are rendered as `{status: "error"}`
//! results rather than propagated; callers branch on the status field.

use chrono::{Datelike, NaiveDate, Weekday};
use colored::Colorize;
use serde_json::json;

use crate::cli::args::OutputFormat;
use crate::core::{Assignment, Clock, TaskCategory};
use crate::error::MomentumError;
use crate::features::ledger::{CompletionReceipt, Ledger, LedgerStore, RedemptionReceipt};
use crate::output::{error_envelope, success_envelope};

use super::current_user_id;

/// Execute complete command.
///
/// # Errors
///
/// Returns an error if the store fails or output formatting fails; ledger
/// rejections are rendered into the output instead.
pub fn complete<S: LedgerStore, C: Clock>(
    ledger: &mut Ledger<S, C>,
    task_id: i64,
    format: OutputFormat,
) -> Result<String, MomentumError> {
    let user_id = current_user_id(ledger.store())?;

    match ledger.complete_task(user_id, task_id) {
        Ok(receipt) => match format {
            OutputFormat::Json => success_envelope("Task completed successfully!", &receipt),
            OutputFormat::Pretty => Ok(format_completion_pretty(&receipt)),
        },
        Err(e) if e.is_rejection() => rejection(&e, format),
        Err(e) => Err(e),
    }
}

/// Execute redeem command.
///
/// # Errors
///
/// Returns an error if the store fails or output formatting fails; ledger
/// rejections are rendered into the output instead.
pub fn redeem<S: LedgerStore, C: Clock>(
    ledger: &mut Ledger<S, C>,
    reward_id: i64,
    format: OutputFormat,
) -> Result<String, MomentumError> {
    let user_id = current_user_id(ledger.store())?;

    match ledger.redeem_reward(user_id, reward_id) {
        Ok(receipt) => match format {
            OutputFormat::Json => success_envelope("Reward redeemed successfully!", &receipt),
            OutputFormat::Pretty => Ok(format_redemption_pretty(&receipt)),
        },
        Err(e) if e.is_rejection() => rejection(&e, format),
        Err(e) => Err(e),
    }
}

/// Execute assign command.
///
/// # Errors
///
/// Returns an error if the store fails or output formatting fails.
pub fn assign<S: LedgerStore, C: Clock>(
    ledger: &mut Ledger<S, C>,
    format: OutputFormat,
) -> Result<String, MomentumError> {
    let user_id = current_user_id(ledger.store())?;
    let today = ledger.today();
    let created = assign_for_day(ledger.store_mut(), user_id, today)?;

    match format {
        OutputFormat::Json => success_envelope(
            "Assignments created",
            &json!({ "assigned": created, "date": today }),
        ),
        OutputFormat::Pretty => {
            if created == 0 {
                Ok("Nothing new to assign today.".to_string())
            } else {
                Ok(format!(
                    "📅 Assigned {created} task{} for {today}",
                    if created == 1 { "" } else { "s" }
                ))
            }
        }
    }
}

/// Create the day's pending assignments: daily tasks every day, weekly
/// tasks on Mondays. Each (task, day) pair is assigned at most once.
///
/// This is the scheduling step the ledger itself treats as external.
pub(crate) fn assign_for_day<S: LedgerStore>(
    store: &mut S,
    user_id: i64,
    day: NaiveDate,
) -> Result<usize, MomentumError> {
    let mut created = 0;

    for task in store.tasks()? {
        let due = match task.category {
            TaskCategory::Daily => true,
            TaskCategory::Weekly => day.weekday() == Weekday::Mon,
            TaskCategory::Special => false,
        };
        if !due {
            continue;
        }

        if store.assignment(user_id, task.id, day)?.is_some() {
            continue;
        }

        let mut assignment = Assignment::pending(user_id, task.id, day);
        store.insert_assignment(&mut assignment)?;
        created += 1;
    }

    Ok(created)
}

fn rejection(error: &MomentumError, format: OutputFormat) -> Result<String, MomentumError> {
    match format {
        OutputFormat::Json => error_envelope(&error.to_string()),
        OutputFormat::Pretty => Ok(format!("{} {error}", "✗".red())),
    }
}

fn format_completion_pretty(receipt: &CompletionReceipt) -> String {
    let mut output = Vec::new();

    output.push("✅ Task completed successfully!".green().to_string());
    output.push(format!("   Earned:  +{} tokens", receipt.tokens_earned));

    if let Some(bonus) = receipt.streak_bonus {
        output.push(format!(
            "   🔥 Streak bonus: +{bonus} tokens ({} day{})",
            receipt.streak_days,
            if receipt.streak_days == 1 { "" } else { "s" }
        ));
    }

    output.push(format!(
        "   Balance: {}",
        format!("{} tokens", receipt.new_balance).yellow().bold()
    ));

    output.join("\n")
}

fn format_redemption_pretty(receipt: &RedemptionReceipt) -> String {
    let mut output = Vec::new();

    output.push("🎁 Reward redeemed successfully!".green().to_string());
    output.push(format!("   Spent:   -{} tokens", receipt.tokens_spent));
    output.push(format!(
        "   Balance: {}",
        format!("{} tokens", receipt.new_balance).yellow().bold()
    ));

    output.join("\n")
}
