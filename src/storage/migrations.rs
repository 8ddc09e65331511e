//! Database migrations for momentum.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;

use crate::error::MomentumError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, MomentumError> {
    // Try to read from user_version pragma
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| MomentumError::Database(format!("Failed to get schema version: {e}")))?;

    Ok(version)
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), MomentumError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| MomentumError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), MomentumError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    // Run migrations in order
    for version in (current + 1)..=CURRENT_VERSION {
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), MomentumError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(MomentumError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: Initial schema.
///
/// Creates tables for:
/// - `users`: profiles with token balance and streak state
/// - `tasks` / `rewards`: the static catalogs
/// - `assignments`: per-day task bindings, one per (user, task, day)
/// - `redemptions`: reward purchase records
/// - `transactions`: the append-only token ledger
fn migrate_v1(conn: &Connection) -> Result<(), MomentumError> {
    conn.execute_batch(
        r"
        -- User profiles
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            token_balance INTEGER NOT NULL DEFAULT 0,
            streak_days INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 1,
            last_streak_date TEXT
        );

        -- Task catalog
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            token_reward INTEGER NOT NULL,
            category TEXT NOT NULL DEFAULT 'daily',
            difficulty TEXT NOT NULL DEFAULT 'easy'
        );

        -- Per-day task assignments
        CREATE TABLE IF NOT EXISTS assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            task_id INTEGER NOT NULL REFERENCES tasks(id),
            status TEXT NOT NULL DEFAULT 'pending',
            assigned_date TEXT NOT NULL,
            completion_date TEXT,
            UNIQUE (user_id, task_id, assigned_date)
        );

        CREATE INDEX IF NOT EXISTS idx_assignments_user_date
        ON assignments(user_id, assigned_date);

        -- Reward catalog
        CREATE TABLE IF NOT EXISTS rewards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            token_cost INTEGER NOT NULL,
            category TEXT NOT NULL DEFAULT 'discount',
            available INTEGER NOT NULL DEFAULT 1
        );

        -- Reward purchases
        CREATE TABLE IF NOT EXISTS redemptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            reward_id INTEGER NOT NULL REFERENCES rewards(id),
            tokens_spent INTEGER NOT NULL,
            date TEXT NOT NULL
        );

        -- Token ledger
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            kind TEXT NOT NULL,
            amount INTEGER NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            related_task_id INTEGER,
            related_reward_id INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_user_date
        ON transactions(user_id, date);
        ",
    )
    .map_err(|e| MomentumError::Database(format!("Migration v1 failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_v1() {
        let conn = Connection::open_in_memory().unwrap();

        // Run migration
        run(&conn).unwrap();

        // Verify version
        assert_eq!(get_version(&conn).unwrap(), CURRENT_VERSION);

        // Verify tables exist by inserting data
        conn.execute(
            "INSERT INTO users (name, email, token_balance) VALUES ('John Doe', 'john@example.com', 25)",
            [],
        )
        .unwrap();

        conn.execute(
            "INSERT INTO tasks (title, token_reward, category, difficulty)
             VALUES ('Take morning medication', 5, 'daily', 'easy')",
            [],
        )
        .unwrap();

        conn.execute(
            "INSERT INTO assignments (user_id, task_id, status, assigned_date)
             VALUES (1, 1, 'pending', '2025-01-14')",
            [],
        )
        .unwrap();

        conn.execute(
            "INSERT INTO transactions (user_id, kind, amount, description, date)
             VALUES (1, 'earn', 5, 'Completed Task: Take morning medication', '2025-01-14T08:30:00Z')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_migration_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Run migrations twice
        run(&conn).unwrap();
        run(&conn).unwrap();

        // Should still be at current version
        assert_eq!(get_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_get_version_new_database() {
        let conn = Connection::open_in_memory().unwrap();

        // New database should have version 0
        assert_eq!(get_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_assignment_uniqueness_per_day() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();

        conn.execute(
            "INSERT INTO users (name, email) VALUES ('John Doe', 'john@example.com')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO tasks (title, token_reward) VALUES ('Read', 7)",
            [],
        )
        .unwrap();

        conn.execute(
            "INSERT INTO assignments (user_id, task_id, assigned_date) VALUES (1, 1, '2025-01-14')",
            [],
        )
        .unwrap();

        // Same (user, task, day) must be rejected
        let dup = conn.execute(
            "INSERT INTO assignments (user_id, task_id, assigned_date) VALUES (1, 1, '2025-01-14')",
            [],
        );
        assert!(dup.is_err());

        // A different day is fine
        conn.execute(
            "INSERT INTO assignments (user_id, task_id, assigned_date) VALUES (1, 1, '2025-01-15')",
            [],
        )
        .unwrap();
    }
}
