//! The focus session state machine.
//!
//! A countdown alternating between focus and break phases. The machine is
//! purely tick-driven: callers feed it one `tick` per elapsed second, so
//! tests can run a full Pomodoro in microseconds.

use serde::{Deserialize, Serialize};

/// Durations and cadence for the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub focus_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
    /// Every Nth break is a long break.
    pub sessions_until_long_break: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
            long_break_minutes: 15,
            sessions_until_long_break: 4,
        }
    }
}

impl TimerSettings {
    const fn focus_seconds(&self) -> u32 {
        self.focus_minutes * 60
    }

    const fn break_seconds(&self) -> u32 {
        self.break_minutes * 60
    }

    const fn long_break_seconds(&self) -> u32 {
        self.long_break_minutes * 60
    }
}

/// Which interval the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Focus => "Focus",
            Self::Break => "Break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Emitted when the timer crosses a phase boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    /// The phase now being counted down.
    pub entered: Phase,
    /// True when the break that just ended completed a full focus/break
    /// cycle.
    pub completed_cycle: bool,
    /// True when the phase just entered is a long break.
    pub long_break: bool,
}

/// Pomodoro-style countdown.
///
/// Invariants: `time_left <= total_time` always, the session count never
/// decreases, and phases strictly alternate. Every boundary crossing stops
/// the timer; the user starts the next interval explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct FocusTimer {
    settings: TimerSettings,
    phase: Phase,
    running: bool,
    time_left: u32,
    total_time: u32,
    /// Completed focus/break cycles, advanced each time a break ends.
    session_count: u32,
}

impl FocusTimer {
    /// Create a stopped timer at the start of a focus interval.
    #[must_use]
    pub const fn new(settings: TimerSettings) -> Self {
        let total = settings.focus_seconds();
        Self {
            settings,
            phase: Phase::Focus,
            running: false,
            time_left: total,
            total_time: total,
            session_count: 0,
        }
    }

    /// Start the countdown. No-op while running or when the interval has
    /// already expired (reset or skip first).
    pub fn start(&mut self) {
        if !self.running && self.time_left > 0 {
            self.running = true;
        }
    }

    /// Stop the countdown, preserving the remaining time.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the phase change when this tick crossed the boundary. The
    /// timer stops at the boundary; the next interval does not auto-start.
    pub fn tick(&mut self) -> Option<PhaseChange> {
        if !self.running || self.time_left == 0 {
            return None;
        }

        self.time_left -= 1;
        if self.time_left > 0 {
            return None;
        }

        Some(self.advance_phase())
    }

    /// Force the phase transition without waiting for the countdown.
    pub fn skip(&mut self) -> PhaseChange {
        self.advance_phase()
    }

    /// Stop and rewind the current interval, picking up any settings
    /// changes. Break intervals rewind to the short break duration.
    pub fn reset(&mut self) {
        self.running = false;
        self.total_time = match self.phase {
            Phase::Focus => self.settings.focus_seconds(),
            Phase::Break => self.settings.break_seconds(),
        };
        self.time_left = self.total_time;
    }

    /// Replace the settings. Takes effect at the next reset or phase
    /// transition; a running countdown is never shortened retroactively.
    pub fn set_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
    }

    /// The shared transition logic for natural expiry and skip.
    fn advance_phase(&mut self) -> PhaseChange {
        self.running = false;

        let (entered, completed_cycle, long_break) = match self.phase {
            Phase::Focus => {
                let long = self.settings.sessions_until_long_break > 0
                    && (self.session_count + 1) % self.settings.sessions_until_long_break == 0;
                self.total_time = if long {
                    self.settings.long_break_seconds()
                } else {
                    self.settings.break_seconds()
                };
                (Phase::Break, false, long)
            }
            Phase::Break => {
                self.session_count += 1;
                self.total_time = self.settings.focus_seconds();
                (Phase::Focus, true, false)
            }
        };

        self.phase = entered;
        self.time_left = self.total_time;

        PhaseChange {
            entered,
            completed_cycle,
            long_break,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn time_left(&self) -> u32 {
        self.time_left
    }

    #[must_use]
    pub const fn total_time(&self) -> u32 {
        self.total_time
    }

    #[must_use]
    pub const fn session_count(&self) -> u32 {
        self.session_count
    }

    #[must_use]
    pub const fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// Progress through the current interval (0.0 - 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.total_time == 0 {
            return 1.0;
        }
        1.0 - (f64::from(self.time_left) / f64::from(self.total_time))
    }
}
