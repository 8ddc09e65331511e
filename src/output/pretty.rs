use colored::Colorize;

use crate::core::AssignmentStatus;
use crate::features::ledger::{AssignedTask, RewardsView, WalletHistory};
use crate::features::stats::ProgressSummary;
use crate::features::timer::render_progress_bar;

/// Format today's assigned tasks as a pretty list
#[must_use]
pub fn format_tasks_pretty(tasks: &[AssignedTask]) -> String {
    if tasks.is_empty() {
        return "Today (0 tasks)\n  Nothing assigned. Run 'momentum assign' to schedule today's tasks.".to_string();
    }

    let completed = tasks.iter().filter(|t| is_completed(t)).count();
    let mut output = format!("Today ({completed}/{} completed)\n", tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let status_icon = match task.status {
            AssignmentStatus::Pending => "[ ]".white(),
            AssignmentStatus::Completed => "[x]".green(),
        };

        let mut line = format!(
            "{} {:>3}  {}",
            status_icon,
            task.task.id,
            task.task.title.bold()
        );

        line.push_str(&format!("  +{}", task.task.token_reward).yellow().to_string());
        line.push_str(&format!("  {}", task.task.category).dimmed().to_string());
        line.push_str(&format!("  {}", task.task.difficulty).dimmed().to_string());

        output.push_str(&line);
        output.push('\n');
    }

    output
}

const fn is_completed(task: &AssignedTask) -> bool {
    matches!(task.status, AssignmentStatus::Completed)
}

/// Format the reward catalog as a pretty list
#[must_use]
pub fn format_rewards_pretty(view: &RewardsView) -> String {
    let mut output = format!(
        "Rewards ({} available)  Balance: {}\n",
        view.rewards.len(),
        format!("{} tokens", view.user_balance).yellow().bold()
    );
    output.push_str(&"─".repeat(60));
    output.push('\n');

    if view.rewards.is_empty() {
        output.push_str("  No rewards available.\n");
        return output;
    }

    for reward in &view.rewards {
        let affordable = view.user_balance >= reward.token_cost;
        let cost = if affordable {
            format!("{:>3} tokens", reward.token_cost).green()
        } else {
            format!("{:>3} tokens", reward.token_cost).red()
        };

        output.push_str(&format!(
            "{:>3}  {}  {}  {}\n",
            reward.id,
            cost,
            reward.name.bold(),
            reward.category.to_string().dimmed()
        ));

        if !reward.description.is_empty() {
            output.push_str(&format!("     {}\n", reward.description.dimmed()));
        }
    }

    output
}

/// Format wallet history as pretty output
#[must_use]
pub fn format_wallet_pretty(history: &WalletHistory, limit: usize) -> String {
    let mut output = Vec::new();

    output.push(format!(
        "💰 {} — {}",
        history.user.name.bold(),
        format!("{} tokens", history.current_balance).yellow().bold()
    ));
    output.push(format!(
        "   Streak: {} day{}   Level {}",
        history.user.streak_days,
        if history.user.streak_days == 1 { "" } else { "s" },
        history.user.level
    ));
    output.push(String::new());

    if history.transactions.is_empty() {
        output.push("No transactions yet. Complete a task to earn tokens.".to_string());
        return output.join("\n");
    }

    output.push(format!(
        "{:<12} {:>7} {:<7} {}",
        "Date", "Amount", "Type", "Description"
    ));
    output.push("─".repeat(60));

    for transaction in history.transactions.iter().take(limit) {
        let amount = transaction.signed_amount();
        let amount_str = if amount >= 0 {
            format!("{amount:+}").green().to_string()
        } else {
            format!("{amount:+}").red().to_string()
        };

        output.push(format!(
            "{:<12} {:>7} {:<7} {}",
            transaction.date.format("%Y-%m-%d"),
            amount_str,
            transaction.kind.to_string(),
            transaction.description
        ));
    }

    if history.transactions.len() > limit {
        output.push(
            format!("... {} older entries", history.transactions.len() - limit)
                .dimmed()
                .to_string(),
        );
    }

    output.join("\n")
}

/// Format a progress summary as pretty output
#[must_use]
pub fn format_stats_pretty(summary: &ProgressSummary) -> String {
    let mut output = Vec::new();

    output.push("📈 Progress".bold().to_string());
    output.push("─".repeat(60));

    let peak = summary.days.iter().map(|d| d.earned).max().unwrap_or(0);
    for day in &summary.days {
        let bar = if peak == 0 {
            render_progress_bar(0.0, 20)
        } else {
            render_progress_bar(f64::from(day.earned) / f64::from(peak), 20)
        };

        output.push(format!(
            "{}  {} {:>3} earned  {:>3} spent  {} task{}",
            day.date.format("%a %m-%d"),
            bar,
            day.earned,
            day.spent,
            day.tasks_completed,
            if day.tasks_completed == 1 { "" } else { "s" }
        ));
    }

    output.push(String::new());
    output.push(format!(
        "Earned {} / spent {} over {} days   Balance: {}   Streak: {} days",
        summary.total_earned.to_string().green(),
        summary.total_spent.to_string().red(),
        summary.days.len(),
        format!("{} tokens", summary.current_balance).yellow(),
        summary.streak_days
    ));

    output.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Difficulty, Task, TaskCategory, User};
    use crate::features::stats::DailyActivity;
    use chrono::NaiveDate;

    fn make_assigned(id: i64, title: &str, status: AssignmentStatus) -> AssignedTask {
        AssignedTask {
            task: Task {
                id,
                title: title.to_string(),
                description: String::new(),
                token_reward: 5,
                category: TaskCategory::Daily,
                difficulty: Difficulty::Easy,
            },
            status,
            completion_date: None,
        }
    }

    #[test]
    fn test_format_tasks_empty() {
        let output = format_tasks_pretty(&[]);
        assert!(output.contains("0 tasks"));
        assert!(output.contains("momentum assign"));
    }

    #[test]
    fn test_format_tasks_counts_completed() {
        let tasks = vec![
            make_assigned(1, "Take morning medication", AssignmentStatus::Completed),
            make_assigned(2, "Read", AssignmentStatus::Pending),
        ];

        let output = format_tasks_pretty(&tasks);
        assert!(output.contains("1/2 completed"));
        assert!(output.contains("Take morning medication"));
    }

    #[test]
    fn test_format_wallet_truncates() {
        let user = User::new("John Doe", "john@example.com");
        let transactions = (0..20)
            .map(|i| crate::core::TokenTransaction {
                id: Some(i),
                user_id: 1,
                kind: crate::core::TransactionKind::Earn,
                amount: 1,
                description: format!("entry {i}"),
                date: chrono::Utc::now(),
                related_task_id: None,
                related_reward_id: None,
            })
            .collect();

        let history = WalletHistory {
            current_balance: 20,
            transactions,
            user,
        };

        let output = format_wallet_pretty(&history, 10);
        assert!(output.contains("10 older entries"));
    }

    #[test]
    fn test_format_stats_handles_quiet_week() {
        let summary = ProgressSummary {
            days: vec![DailyActivity {
                date: NaiveDate::from_ymd_opt(2025, 1, 14).unwrap(),
                earned: 0,
                spent: 0,
                tasks_completed: 0,
            }],
            total_earned: 0,
            total_spent: 0,
            current_balance: 0,
            streak_days: 0,
        };

        let output = format_stats_pretty(&summary);
        assert!(output.contains("Progress"));
    }
}
