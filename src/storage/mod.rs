//! Storage layer for momentum.
//!
//! This module provides SQLite-based persistence for the token economy:
//! user profiles, task/reward catalogs, per-day assignments, redemptions,
//! and the append-only transaction log.

mod database;
mod migrations;

pub use database::Database;
