use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "momentum")]
#[command(about = "A token-economy task and focus CLI")]
#[command(long_about = "momentum - earn tokens, keep streaks, stay focused

Complete your assigned tasks to earn tokens, close out a full day for a
streak bonus, and spend tokens on rewards. A built-in Pomodoro timer keeps
focus sessions honest.

QUICK START:
  momentum seed             Create your profile and the default catalogs
  momentum tasks            Show today's assigned tasks
  momentum complete 3       Complete task 3 and collect its tokens
  momentum wallet           Balance and transaction history
  momentum focus run        Start a focus session

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  momentum <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the profile and default task/reward catalogs
    ///
    /// Sets up a fresh database: one profile, the standard daily and weekly
    /// tasks, the reward catalog, and today's assignments. Run this once
    /// before anything else.
    ///
    /// # Examples
    ///
    ///   momentum seed
    ///   momentum seed --name "Sarah Johnson" --email sarah@example.com
    ///   momentum seed --force      Wipe everything and start over
    Seed(SeedArgs),

    /// Assign today's tasks
    ///
    /// Creates today's pending assignments: daily tasks every day, weekly
    /// tasks on Mondays. Safe to run repeatedly - each task is assigned at
    /// most once per day.
    ///
    /// # Examples
    ///
    ///   momentum assign           Schedule today's tasks
    ///   momentum assign -o json   Report created assignments as JSON
    Assign,

    /// List today's assigned tasks
    ///
    /// Shows every task assigned for today with its completion status,
    /// token reward, category, and difficulty. Use the listed ID with
    /// 'momentum complete'.
    ///
    /// # Examples
    ///
    ///   momentum tasks            List today's tasks
    ///   momentum t                Short alias
    ///   momentum tasks -o json    Output as JSON for scripting
    #[command(alias = "t")]
    Tasks,

    /// Complete a task and collect its tokens
    ///
    /// Marks today's assignment of the task as completed and credits its
    /// token reward. Completing the last remaining task of the day also
    /// grants the daily streak bonus. A task can only be completed once
    /// per day - repeats are rejected without a second payout.
    ///
    /// # Examples
    ///
    ///   momentum complete 3       Complete task 3
    ///   momentum done 3           Alias
    #[command(alias = "done")]
    Complete {
        /// ID of the task to complete (see 'momentum tasks')
        task_id: i64,
    },

    /// List available rewards
    ///
    /// Shows every reward currently available for redemption, its token
    /// cost, and whether your balance covers it.
    ///
    /// # Examples
    ///
    ///   momentum rewards          List rewards and balance
    ///   momentum rewards -o json  Output as JSON
    Rewards,

    /// Redeem a reward
    ///
    /// Spends tokens on a reward. The full cost is debited from your
    /// balance; redemption is all-or-nothing and fails cleanly when the
    /// balance is too low.
    ///
    /// # Examples
    ///
    ///   momentum redeem 2         Redeem reward 2
    Redeem {
        /// ID of the reward to redeem (see 'momentum rewards')
        reward_id: i64,
    },

    /// Show balance and transaction history
    ///
    /// Prints the current token balance, streak, and the transaction log
    /// (earnings, bonuses, and redemptions), most recent first.
    ///
    /// # Examples
    ///
    ///   momentum wallet           Balance and recent transactions
    ///   momentum w --limit 50     Show more history
    ///   momentum wallet -o json   Full history as JSON
    #[command(alias = "w")]
    Wallet(WalletArgs),

    /// Show daily progress statistics
    ///
    /// Aggregates the transaction log into per-day earned/spent totals
    /// and completed-task counts over a trailing window.
    ///
    /// # Examples
    ///
    ///   momentum stats            Last 7 days
    ///   momentum stats --days 30  Last 30 days
    Stats(StatsArgs),

    /// Pomodoro-style focus sessions
    ///
    /// Runs a focus/break countdown in the terminal. The timer stops at
    /// each phase boundary and waits for you; every few focus sessions the
    /// break is a long one.
    ///
    /// # Examples
    ///
    ///   momentum focus run                    Default 25m focus / 5m break
    ///   momentum focus run --focus 50m        Longer focus intervals
    ///   momentum focus run --cycles 4         Stop after 4 full cycles
    Focus(FocusArgs),

    /// Generate shell completions
    ///
    /// Writes a completion script for the given shell to stdout.
    ///
    /// # Examples
    ///
    ///   momentum completions zsh > ~/.zfunc/_momentum
    ///   momentum completions bash > /etc/bash_completion.d/momentum
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct SeedArgs {
    /// Profile name
    #[arg(long, default_value = "John Doe")]
    pub name: String,

    /// Profile email
    #[arg(long, default_value = "john@example.com")]
    pub email: String,

    /// Wipe any existing data first
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct WalletArgs {
    /// Maximum number of transactions to show in pretty output
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Number of trailing days to aggregate
    #[arg(short, long, default_value_t = 7)]
    pub days: u32,
}

#[derive(Args)]
pub struct FocusArgs {
    #[command(subcommand)]
    pub command: FocusCommands,
}

#[derive(Subcommand)]
pub enum FocusCommands {
    /// Run the focus timer
    Run {
        /// Focus interval duration (e.g. "25m", "1h")
        #[arg(long)]
        focus: Option<String>,

        /// Short break duration (e.g. "5m")
        #[arg(long = "break")]
        break_duration: Option<String>,

        /// Long break duration (e.g. "15m")
        #[arg(long)]
        long_break: Option<String>,

        /// Stop after this many completed focus/break cycles
        #[arg(long)]
        cycles: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_complete_alias() {
        let cli = Cli::try_parse_from(["momentum", "done", "3"]).unwrap();
        match cli.command {
            Commands::Complete { task_id } => assert_eq!(task_id, 3),
            _ => panic!("expected complete command"),
        }
    }

    #[test]
    fn test_global_output_flag() {
        let cli = Cli::try_parse_from(["momentum", "tasks", "-o", "json"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));

        let cli = Cli::try_parse_from(["momentum", "tasks"]).unwrap();
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_focus_run_durations() {
        let cli = Cli::try_parse_from([
            "momentum", "focus", "run", "--focus", "50m", "--break", "10m", "--cycles", "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Focus(args) => {
                let FocusCommands::Run {
                    focus,
                    break_duration,
                    cycles,
                    ..
                } = args.command;
                assert_eq!(focus.as_deref(), Some("50m"));
                assert_eq!(break_duration.as_deref(), Some("10m"));
                assert_eq!(cycles, Some(2));
            }
            _ => panic!("expected focus command"),
        }
    }
}
