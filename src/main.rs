use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use momentum::cli::args::{Cli, Commands};
use momentum::cli::commands;
use momentum::config::Config;
use momentum::core::SystemClock;
use momentum::features::ledger::{Ledger, LedgerConfig, SqliteStore};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let format = cli.output.unwrap_or(config.general.default_output);

    let output = match cli.command {
        Commands::Seed(args) => commands::seed(&mut open_ledger(&config)?, &args, format)?,
        Commands::Assign => commands::assign(&mut open_ledger(&config)?, format)?,
        Commands::Tasks => commands::tasks(&open_ledger(&config)?, format)?,
        Commands::Complete { task_id } => {
            commands::complete(&mut open_ledger(&config)?, task_id, format)?
        }
        Commands::Rewards => commands::rewards(&open_ledger(&config)?, format)?,
        Commands::Redeem { reward_id } => {
            commands::redeem(&mut open_ledger(&config)?, reward_id, format)?
        }
        Commands::Wallet(args) => commands::wallet(&open_ledger(&config)?, args.limit, format)?,
        Commands::Stats(args) => commands::stats(&open_ledger(&config)?, args.days, format)?,
        Commands::Focus(args) => commands::focus(&config.focus, args.command)?,
        Commands::Completions { shell } => commands::completions(shell),
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn open_ledger(config: &Config) -> Result<Ledger<SqliteStore, SystemClock>> {
    let store = SqliteStore::open()?;
    Ok(Ledger::with_config(
        store,
        SystemClock,
        LedgerConfig {
            streak_bonus_tokens: config.ledger.streak_bonus_tokens,
        },
    ))
}
