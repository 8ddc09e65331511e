//! SQLite-backed ledger store.
//!
//! Persists the token economy to the local database. Each
//! [`LedgerStore::commit`] applies its whole write set inside one SQL
//! transaction, which is what makes the ledger's check-then-mutate
//! operations atomic on disk.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Row};

use crate::core::{
    Assignment, AssignmentStatus, Difficulty, Redemption, Reward, RewardCategory, Task,
    TaskCategory, TokenTransaction, TransactionKind, User,
};
use crate::error::MomentumError;
use crate::storage::Database;

use super::store::{LedgerStore, LedgerUpdate};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Ledger store over the local SQLite database.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the store at the default database location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, MomentumError> {
        let db = Database::open()?;
        Ok(Self { db })
    }

    /// Create a store with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }
}

impl LedgerStore for SqliteStore {
    fn users(&self) -> Result<Vec<User>, MomentumError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, name, email, token_balance, streak_days, level, last_streak_date
                  FROM users ORDER BY id",
            )
            .map_err(|e| MomentumError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], row_to_user)
            .map_err(|e| MomentumError::Database(format!("Failed to query users: {e}")))?;

        collect_rows(rows)
    }

    fn user(&self, id: i64) -> Result<Option<User>, MomentumError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, name, email, token_balance, streak_days, level, last_streak_date
                  FROM users WHERE id = ?1",
            )
            .map_err(|e| MomentumError::Database(format!("Failed to prepare query: {e}")))?;

        stmt.query_row([id], row_to_user)
            .optional()
            .map_err(|e| MomentumError::Database(format!("Failed to query user: {e}")))
    }

    fn task(&self, id: i64) -> Result<Option<Task>, MomentumError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, title, description, token_reward, category, difficulty
                  FROM tasks WHERE id = ?1",
            )
            .map_err(|e| MomentumError::Database(format!("Failed to prepare query: {e}")))?;

        stmt.query_row([id], row_to_task)
            .optional()
            .map_err(|e| MomentumError::Database(format!("Failed to query task: {e}")))
    }

    fn tasks(&self) -> Result<Vec<Task>, MomentumError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, title, description, token_reward, category, difficulty
                  FROM tasks ORDER BY id",
            )
            .map_err(|e| MomentumError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], row_to_task)
            .map_err(|e| MomentumError::Database(format!("Failed to query tasks: {e}")))?;

        collect_rows(rows)
    }

    fn reward(&self, id: i64) -> Result<Option<Reward>, MomentumError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, name, description, token_cost, category, available
                  FROM rewards WHERE id = ?1",
            )
            .map_err(|e| MomentumError::Database(format!("Failed to prepare query: {e}")))?;

        stmt.query_row([id], row_to_reward)
            .optional()
            .map_err(|e| MomentumError::Database(format!("Failed to query reward: {e}")))
    }

    fn rewards(&self) -> Result<Vec<Reward>, MomentumError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, name, description, token_cost, category, available
                  FROM rewards ORDER BY id",
            )
            .map_err(|e| MomentumError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], row_to_reward)
            .map_err(|e| MomentumError::Database(format!("Failed to query rewards: {e}")))?;

        collect_rows(rows)
    }

    fn assignment(
        &self,
        user_id: i64,
        task_id: i64,
        day: NaiveDate,
    ) -> Result<Option<Assignment>, MomentumError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, user_id, task_id, status, assigned_date, completion_date
                  FROM assignments
                  WHERE user_id = ?1 AND task_id = ?2 AND assigned_date = ?3",
            )
            .map_err(|e| MomentumError::Database(format!("Failed to prepare query: {e}")))?;

        stmt.query_row(
            params![user_id, task_id, day.format(DAY_FORMAT).to_string()],
            row_to_assignment,
        )
        .optional()
        .map_err(|e| MomentumError::Database(format!("Failed to query assignment: {e}")))
    }

    fn assignments_on(
        &self,
        user_id: i64,
        day: NaiveDate,
    ) -> Result<Vec<Assignment>, MomentumError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, user_id, task_id, status, assigned_date, completion_date
                  FROM assignments
                  WHERE user_id = ?1 AND assigned_date = ?2
                  ORDER BY id",
            )
            .map_err(|e| MomentumError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(
                params![user_id, day.format(DAY_FORMAT).to_string()],
                row_to_assignment,
            )
            .map_err(|e| MomentumError::Database(format!("Failed to query assignments: {e}")))?;

        collect_rows(rows)
    }

    fn transactions(&self, user_id: i64) -> Result<Vec<TokenTransaction>, MomentumError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, user_id, kind, amount, description, date,
                         related_task_id, related_reward_id
                  FROM transactions
                  WHERE user_id = ?1
                  ORDER BY date DESC, id DESC",
            )
            .map_err(|e| MomentumError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([user_id], row_to_transaction)
            .map_err(|e| MomentumError::Database(format!("Failed to query transactions: {e}")))?;

        collect_rows(rows)
    }

    fn redemptions(&self, user_id: i64) -> Result<Vec<Redemption>, MomentumError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, user_id, reward_id, tokens_spent, date
                  FROM redemptions
                  WHERE user_id = ?1
                  ORDER BY date DESC, id DESC",
            )
            .map_err(|e| MomentumError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([user_id], row_to_redemption)
            .map_err(|e| MomentumError::Database(format!("Failed to query redemptions: {e}")))?;

        collect_rows(rows)
    }

    fn insert_user(&mut self, user: &mut User) -> Result<(), MomentumError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO users (name, email, token_balance, streak_days, level, last_streak_date)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.name,
                user.email,
                user.token_balance,
                user.streak_days,
                user.level,
                user.last_streak_date.map(|d| d.format(DAY_FORMAT).to_string()),
            ],
        )
        .map_err(|e| MomentumError::Database(format!("Failed to insert user: {e}")))?;

        user.id = conn.last_insert_rowid();
        Ok(())
    }

    fn insert_task(&mut self, task: &mut Task) -> Result<(), MomentumError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO tasks (title, description, token_reward, category, difficulty)
              VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                task.title,
                task.description,
                task.token_reward,
                task.category.as_str(),
                task.difficulty.as_str(),
            ],
        )
        .map_err(|e| MomentumError::Database(format!("Failed to insert task: {e}")))?;

        task.id = conn.last_insert_rowid();
        Ok(())
    }

    fn insert_reward(&mut self, reward: &mut Reward) -> Result<(), MomentumError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO rewards (name, description, token_cost, category, available)
              VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                reward.name,
                reward.description,
                reward.token_cost,
                reward.category.as_str(),
                reward.available,
            ],
        )
        .map_err(|e| MomentumError::Database(format!("Failed to insert reward: {e}")))?;

        reward.id = conn.last_insert_rowid();
        Ok(())
    }

    fn insert_assignment(&mut self, assignment: &mut Assignment) -> Result<(), MomentumError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO assignments (user_id, task_id, status, assigned_date, completion_date)
              VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                assignment.user_id,
                assignment.task_id,
                assignment.status.to_string(),
                assignment.assigned_date.format(DAY_FORMAT).to_string(),
                assignment.completion_date.map(|t| t.to_rfc3339()),
            ],
        )
        .map_err(|e| MomentumError::Database(format!("Failed to insert assignment: {e}")))?;

        assignment.id = conn.last_insert_rowid();
        Ok(())
    }

    fn commit(&mut self, update: LedgerUpdate) -> Result<(), MomentumError> {
        let tx = self
            .db
            .connection_mut()
            .transaction()
            .map_err(|e| MomentumError::Database(format!("Failed to begin transaction: {e}")))?;

        if let Some(user) = &update.user {
            let changed = tx
                .execute(
                    r"UPDATE users SET
                      token_balance = ?1,
                      streak_days = ?2,
                      level = ?3,
                      last_streak_date = ?4
                      WHERE id = ?5",
                    params![
                        user.token_balance,
                        user.streak_days,
                        user.level,
                        user.last_streak_date.map(|d| d.format(DAY_FORMAT).to_string()),
                        user.id,
                    ],
                )
                .map_err(|e| MomentumError::Database(format!("Failed to update user: {e}")))?;

            if changed == 0 {
                return Err(MomentumError::Database(format!(
                    "Cannot update unknown user {}",
                    user.id
                )));
            }
        }

        if let Some(assignment) = &update.assignment {
            let changed = tx
                .execute(
                    r"UPDATE assignments SET
                      status = ?1,
                      completion_date = ?2
                      WHERE id = ?3",
                    params![
                        assignment.status.to_string(),
                        assignment.completion_date.map(|t| t.to_rfc3339()),
                        assignment.id,
                    ],
                )
                .map_err(|e| {
                    MomentumError::Database(format!("Failed to update assignment: {e}"))
                })?;

            if changed == 0 {
                return Err(MomentumError::Database(format!(
                    "Cannot update unknown assignment {}",
                    assignment.id
                )));
            }
        }

        for transaction in &update.transactions {
            tx.execute(
                r"INSERT INTO transactions
                  (user_id, kind, amount, description, date, related_task_id, related_reward_id)
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    transaction.user_id,
                    transaction.kind.as_str(),
                    transaction.amount,
                    transaction.description,
                    transaction.date.to_rfc3339(),
                    transaction.related_task_id,
                    transaction.related_reward_id,
                ],
            )
            .map_err(|e| MomentumError::Database(format!("Failed to insert transaction: {e}")))?;
        }

        if let Some(redemption) = &update.redemption {
            tx.execute(
                r"INSERT INTO redemptions (user_id, reward_id, tokens_spent, date)
                  VALUES (?1, ?2, ?3, ?4)",
                params![
                    redemption.user_id,
                    redemption.reward_id,
                    redemption.tokens_spent,
                    redemption.date.to_rfc3339(),
                ],
            )
            .map_err(|e| MomentumError::Database(format!("Failed to insert redemption: {e}")))?;
        }

        tx.commit()
            .map_err(|e| MomentumError::Database(format!("Failed to commit transaction: {e}")))
    }

    fn clear(&mut self) -> Result<(), MomentumError> {
        self.db
            .connection()
            .execute_batch(
                r"
                DELETE FROM transactions;
                DELETE FROM redemptions;
                DELETE FROM assignments;
                DELETE FROM rewards;
                DELETE FROM tasks;
                DELETE FROM users;
                ",
            )
            .map_err(|e| MomentumError::Database(format!("Failed to clear database: {e}")))
    }
}

fn row_to_user(row: &Row<'_>) -> Result<User, rusqlite::Error> {
    let last_streak_date: Option<String> = row.get(6)?;

    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        token_balance: row.get(3)?,
        streak_days: row.get(4)?,
        level: row.get(5)?,
        last_streak_date: last_streak_date
            .and_then(|s| NaiveDate::parse_from_str(&s, DAY_FORMAT).ok()),
    })
}

fn row_to_task(row: &Row<'_>) -> Result<Task, rusqlite::Error> {
    let category: String = row.get(4)?;
    let difficulty: String = row.get(5)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        token_reward: row.get(3)?,
        category: TaskCategory::parse(&category),
        difficulty: Difficulty::parse(&difficulty),
    })
}

fn row_to_reward(row: &Row<'_>) -> Result<Reward, rusqlite::Error> {
    let category: String = row.get(4)?;

    Ok(Reward {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        token_cost: row.get(3)?,
        category: RewardCategory::parse(&category),
        available: row.get(5)?,
    })
}

fn row_to_assignment(row: &Row<'_>) -> Result<Assignment, rusqlite::Error> {
    let status: String = row.get(3)?;
    let assigned_date: String = row.get(4)?;
    let completion_date: Option<String> = row.get(5)?;

    Ok(Assignment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        task_id: row.get(2)?,
        status: if status == "completed" {
            AssignmentStatus::Completed
        } else {
            AssignmentStatus::Pending
        },
        assigned_date: NaiveDate::parse_from_str(&assigned_date, DAY_FORMAT)
            .unwrap_or_else(|_| Utc::now().date_naive()),
        completion_date: completion_date.and_then(|s| parse_timestamp(&s)),
    })
}

fn row_to_transaction(row: &Row<'_>) -> Result<TokenTransaction, rusqlite::Error> {
    let kind: String = row.get(2)?;
    let date: String = row.get(5)?;

    Ok(TokenTransaction {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        kind: TransactionKind::parse(&kind),
        amount: row.get(3)?,
        description: row.get(4)?,
        date: parse_timestamp(&date).unwrap_or_else(Utc::now),
        related_task_id: row.get(6)?,
        related_reward_id: row.get(7)?,
    })
}

fn row_to_redemption(row: &Row<'_>) -> Result<Redemption, rusqlite::Error> {
    let date: String = row.get(4)?;

    Ok(Redemption {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        reward_id: row.get(2)?,
        tokens_spent: row.get(3)?,
        date: parse_timestamp(&date).unwrap_or_else(Utc::now),
    })
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

fn collect_rows<T>(
    rows: impl Iterator<Item = Result<T, rusqlite::Error>>,
) -> Result<Vec<T>, MomentumError> {
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| MomentumError::Database(e.to_string()))?);
    }
    Ok(out)
}

// Add optional() extension for rusqlite
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
