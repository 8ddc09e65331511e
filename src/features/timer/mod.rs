//! Pomodoro-style focus sessions.
//!
//! A tick-driven countdown alternating between focus and break intervals,
//! with a long break every few cycles. The state machine never touches the
//! wall clock; the CLI feeds it one tick per second.

mod duration;
mod state;

pub use duration::{
    format_duration, format_duration_mmss, format_seconds_mmss, parse_duration, parse_minutes,
    render_progress_bar,
};
pub use state::{FocusTimer, Phase, PhaseChange, TimerSettings};
