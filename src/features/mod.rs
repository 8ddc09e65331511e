//! Feature implementations for momentum.
//!
//! This module contains the two core logic units and what derives from them:
//! - Token ledger (task completion, streak bonuses, redemptions, history)
//! - Focus timer (Pomodoro-style countdown state machine)
//! - Progress statistics computed from the ledger

pub mod ledger;
pub mod stats;
pub mod timer;
