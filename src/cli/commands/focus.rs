//! Focus command implementation.
//!
//! Drives the pure timer state machine against the wall clock: one tick per
//! second, a live countdown line, and a stop at every phase boundary.

use std::io::{BufRead, Write};

use colored::Colorize;

use crate::cli::args::FocusCommands;
use crate::config::FocusConfig;
use crate::error::MomentumError;
use crate::features::timer::{
    format_seconds_mmss, parse_minutes, render_progress_bar, FocusTimer, Phase, TimerSettings,
};

/// Execute focus subcommands.
///
/// # Errors
///
/// Returns `Config` for unparseable durations or failed terminal input.
pub fn focus(config: &FocusConfig, cmd: FocusCommands) -> Result<String, MomentumError> {
    match cmd {
        FocusCommands::Run {
            focus,
            break_duration,
            long_break,
            cycles,
        } => run(
            build_settings(config, focus, break_duration, long_break)?,
            cycles,
        ),
    }
}

/// Merge CLI duration overrides into the configured settings.
pub(crate) fn build_settings(
    config: &FocusConfig,
    focus: Option<String>,
    break_duration: Option<String>,
    long_break: Option<String>,
) -> Result<TimerSettings, MomentumError> {
    let mut settings = config.timer_settings();

    if let Some(value) = focus {
        settings.focus_minutes = parse_setting(&value, "focus")?;
    }
    if let Some(value) = break_duration {
        settings.break_minutes = parse_setting(&value, "break")?;
    }
    if let Some(value) = long_break {
        settings.long_break_minutes = parse_setting(&value, "long break")?;
    }

    Ok(settings)
}

fn parse_setting(value: &str, which: &str) -> Result<u32, MomentumError> {
    parse_minutes(value)
        .ok_or_else(|| MomentumError::Config(format!("Invalid {which} duration: {value}")))
}

/// The interactive run loop. Blocks until the user stops or the requested
/// number of cycles completes.
fn run(settings: TimerSettings, cycles: Option<u32>) -> Result<String, MomentumError> {
    let mut timer = FocusTimer::new(settings);
    let mut completed_cycles = 0u32;

    println!(
        "🎯 {} focus / {} break, long break {} every {} sessions",
        format!("{}m", settings.focus_minutes).bold(),
        format!("{}m", settings.break_minutes).bold(),
        format!("{}m", settings.long_break_minutes).bold(),
        settings.sessions_until_long_break
    );
    println!("{}", "   Ctrl-C quits at any time.".dimmed());
    println!();

    loop {
        timer.start();

        while timer.is_running() {
            draw_countdown(&timer);
            std::thread::sleep(std::time::Duration::from_secs(1));

            if let Some(change) = timer.tick() {
                println!();

                if change.completed_cycle {
                    completed_cycles += 1;
                    println!(
                        "{}",
                        format!("✅ Cycle {completed_cycles} complete. Back to focus!").green()
                    );
                } else if change.long_break {
                    println!(
                        "{}",
                        format!(
                            "🏖️  Long break earned - {}",
                            format_seconds_mmss(timer.total_time())
                        )
                        .cyan()
                    );
                } else {
                    println!(
                        "{}",
                        format!("☕ Break time - {}", format_seconds_mmss(timer.total_time()))
                            .cyan()
                    );
                }
            }
        }

        if let Some(target) = cycles {
            if completed_cycles >= target {
                break;
            }
        }

        if !prompt_continue(&timer)? {
            break;
        }
    }

    Ok(format!(
        "Focus session ended: {completed_cycles} completed cycle{}.",
        if completed_cycles == 1 { "" } else { "s" }
    ))
}

fn draw_countdown(timer: &FocusTimer) {
    let icon = match timer.phase() {
        Phase::Focus => "🎯",
        Phase::Break => "☕",
    };

    print!(
        "\r{icon} {} {} {}  ",
        timer.phase(),
        format_seconds_mmss(timer.time_left()).bold(),
        render_progress_bar(timer.progress(), 24)
    );
    let _ = std::io::stdout().flush();
}

fn prompt_continue(timer: &FocusTimer) -> Result<bool, MomentumError> {
    print!(
        "Press Enter to start {} ({}), or q then Enter to stop: ",
        timer.phase().to_string().bold(),
        format_seconds_mmss(timer.total_time())
    );
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| MomentumError::Config(format!("Failed to read input: {e}")))?;

    Ok(!line.trim().eq_ignore_ascii_case("q"))
}
