//! Configuration management for momentum.
//!
//! This module handles loading and saving configuration from `~/.momentum/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{Config, FocusConfig, GeneralConfig, LedgerSettings};
