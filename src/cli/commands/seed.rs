//! Seed command implementation.
//!
//! Bootstraps a fresh database: one profile, the default task and reward
//! catalogs, and today's assignments.

use colored::Colorize;
use serde_json::json;

use crate::cli::args::{OutputFormat, SeedArgs};
use crate::core::{Clock, Difficulty, Reward, RewardCategory, Task, TaskCategory, User};
use crate::error::MomentumError;
use crate::features::ledger::{Ledger, LedgerStore};
use crate::output::success_envelope;

use super::ledger::assign_for_day;

/// Execute seed command.
///
/// # Errors
///
/// Returns `Config` if a profile already exists and `--force` was not
/// given, or an error if the store fails.
pub fn seed<S: LedgerStore, C: Clock>(
    ledger: &mut Ledger<S, C>,
    args: &SeedArgs,
    format: OutputFormat,
) -> Result<String, MomentumError> {
    if !ledger.store().users()?.is_empty() {
        if !args.force {
            return Err(MomentumError::Config(
                "A profile already exists. Use --force to wipe everything and reseed."
                    .to_string(),
            ));
        }
        ledger.store_mut().clear()?;
    }

    let mut user = User::new(&args.name, &args.email);
    ledger.store_mut().insert_user(&mut user)?;

    let mut task_count = 0;
    for mut task in default_tasks() {
        ledger.store_mut().insert_task(&mut task)?;
        task_count += 1;
    }

    let mut reward_count = 0;
    for mut reward in default_rewards() {
        ledger.store_mut().insert_reward(&mut reward)?;
        reward_count += 1;
    }

    let today = ledger.today();
    let assigned = assign_for_day(ledger.store_mut(), user.id, today)?;

    match format {
        OutputFormat::Json => success_envelope(
            "Profile created",
            &json!({
                "user": user,
                "tasks": task_count,
                "rewards": reward_count,
                "assigned_today": assigned,
            }),
        ),
        OutputFormat::Pretty => {
            let mut output = Vec::new();
            output.push(format!("🌱 Welcome, {}!", user.name.bold()));
            output.push(format!(
                "   Created {task_count} tasks and {reward_count} rewards, assigned {assigned} for today."
            ));
            output.push(String::new());
            output.push("   See today's tasks:  momentum tasks".dimmed().to_string());
            output.push("   Complete one:       momentum complete <id>".dimmed().to_string());
            Ok(output.join("\n"))
        }
    }
}

/// The default task catalog.
fn default_tasks() -> Vec<Task> {
    let make = |title: &str, description: &str, reward, category, difficulty| Task {
        id: 0,
        title: title.to_string(),
        description: description.to_string(),
        token_reward: reward,
        category,
        difficulty,
    };

    vec![
        make(
            "Take morning medication",
            "Take your prescribed medication at 8:00 AM",
            5,
            TaskCategory::Daily,
            Difficulty::Easy,
        ),
        make(
            "Complete 30-minute exercise",
            "Do your daily physical activity routine",
            10,
            TaskCategory::Daily,
            Difficulty::Medium,
        ),
        make(
            "Practice mindfulness",
            "Spend 15 minutes in meditation or deep breathing",
            8,
            TaskCategory::Daily,
            Difficulty::Easy,
        ),
        make(
            "Complete weekly review",
            "Review your progress and plan for next week",
            15,
            TaskCategory::Weekly,
            Difficulty::Hard,
        ),
        make(
            "Read for 20 minutes",
            "Read a book or article of your choice",
            7,
            TaskCategory::Daily,
            Difficulty::Medium,
        ),
    ]
}

/// The default reward catalog.
fn default_rewards() -> Vec<Reward> {
    let make = |name: &str, description: &str, cost, category| Reward {
        id: 0,
        name: name.to_string(),
        description: description.to_string(),
        token_cost: cost,
        category,
        available: true,
    };

    vec![
        make(
            "10% Therapy Session Discount",
            "Get 10% off your next therapy session with any of our certified therapists",
            20,
            RewardCategory::Discount,
        ),
        make(
            "Premium Video Content",
            "Unlock exclusive ADHD management videos and guided sessions",
            15,
            RewardCategory::Content,
        ),
        make(
            "Custom Focus Timer",
            "Get a personalized focus timer with your preferred settings",
            25,
            RewardCategory::Premium,
        ),
        make(
            "Weekly Progress Report",
            "Detailed weekly progress analysis and recommendations",
            12,
            RewardCategory::Premium,
        ),
        make(
            "ADHD Workbook",
            "Physical workbook with exercises and strategies",
            50,
            RewardCategory::Physical,
        ),
    ]
}
