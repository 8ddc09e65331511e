//! momentum - A token-economy task and focus CLI
//!
//! This crate implements a small reward economy (complete assigned tasks,
//! earn tokens, keep daily streaks, redeem rewards) and a Pomodoro-style
//! focus timer, behind a command-line interface.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod output;
pub mod storage;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::MomentumError;
pub use features::ledger::Ledger;
