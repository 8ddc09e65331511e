//! Command-line interface for momentum.

pub mod args;
pub mod commands;
