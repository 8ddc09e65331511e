//! Storage abstraction for the token ledger.
//!
//! The ledger never touches a concrete database; it reads through
//! [`LedgerStore`] and publishes each operation's full write set through a
//! single [`LedgerStore::commit`] call. A commit is atomic: either the whole
//! update lands or none of it does, so no caller can observe a debited
//! balance without its transaction, or a completed assignment without its
//! payout.

use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;

use crate::core::{Assignment, Redemption, Reward, Task, TokenTransaction, User};
use crate::error::MomentumError;

/// The write set of one ledger operation.
#[derive(Debug, Clone, Default)]
pub struct LedgerUpdate {
    /// Updated user state (balance, streak).
    pub user: Option<User>,
    /// Assignment flipped to completed.
    pub assignment: Option<Assignment>,
    /// Ledger entries to append. IDs are assigned on insert.
    pub transactions: Vec<TokenTransaction>,
    /// Redemption record to append, if the operation was a redemption.
    pub redemption: Option<Redemption>,
}

/// Entity reads plus atomic commit for the ledger.
///
/// Insert methods assign the entity's database ID in place, mirroring how
/// rows get their rowid on insert.
#[cfg_attr(test, automock)]
pub trait LedgerStore {
    /// All user profiles.
    fn users(&self) -> Result<Vec<User>, MomentumError>;

    /// A single user by ID.
    fn user(&self, id: i64) -> Result<Option<User>, MomentumError>;

    /// A single catalog task by ID.
    fn task(&self, id: i64) -> Result<Option<Task>, MomentumError>;

    /// The full task catalog.
    fn tasks(&self) -> Result<Vec<Task>, MomentumError>;

    /// A single reward by ID.
    fn reward(&self, id: i64) -> Result<Option<Reward>, MomentumError>;

    /// The full reward catalog.
    fn rewards(&self) -> Result<Vec<Reward>, MomentumError>;

    /// The assignment binding (user, task) for one day, if any.
    fn assignment(
        &self,
        user_id: i64,
        task_id: i64,
        day: NaiveDate,
    ) -> Result<Option<Assignment>, MomentumError>;

    /// All of a user's assignments for one day.
    fn assignments_on(
        &self,
        user_id: i64,
        day: NaiveDate,
    ) -> Result<Vec<Assignment>, MomentumError>;

    /// A user's transaction log, most recent first.
    fn transactions(&self, user_id: i64) -> Result<Vec<TokenTransaction>, MomentumError>;

    /// A user's redemptions, most recent first.
    fn redemptions(&self, user_id: i64) -> Result<Vec<Redemption>, MomentumError>;

    /// Insert a new user and assign its ID.
    fn insert_user(&mut self, user: &mut User) -> Result<(), MomentumError>;

    /// Insert a new catalog task and assign its ID.
    fn insert_task(&mut self, task: &mut Task) -> Result<(), MomentumError>;

    /// Insert a new catalog reward and assign its ID.
    fn insert_reward(&mut self, reward: &mut Reward) -> Result<(), MomentumError>;

    /// Insert a new assignment and assign its ID.
    fn insert_assignment(&mut self, assignment: &mut Assignment) -> Result<(), MomentumError>;

    /// Apply one operation's write set atomically.
    fn commit(&mut self, update: LedgerUpdate) -> Result<(), MomentumError>;

    /// Delete everything. Used by reseeding.
    fn clear(&mut self) -> Result<(), MomentumError>;
}

/// In-memory store. Backs the ledger tests and doubles as the reference
/// semantics for [`SqliteStore`](super::SqliteStore).
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Vec<User>,
    tasks: Vec<Task>,
    rewards: Vec<Reward>,
    assignments: Vec<Assignment>,
    transactions: Vec<TokenTransaction>,
    redemptions: Vec<Redemption>,
    next_id: i64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl LedgerStore for MemoryStore {
    fn users(&self) -> Result<Vec<User>, MomentumError> {
        Ok(self.users.clone())
    }

    fn user(&self, id: i64) -> Result<Option<User>, MomentumError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    fn task(&self, id: i64) -> Result<Option<Task>, MomentumError> {
        Ok(self.tasks.iter().find(|t| t.id == id).cloned())
    }

    fn tasks(&self) -> Result<Vec<Task>, MomentumError> {
        Ok(self.tasks.clone())
    }

    fn reward(&self, id: i64) -> Result<Option<Reward>, MomentumError> {
        Ok(self.rewards.iter().find(|r| r.id == id).cloned())
    }

    fn rewards(&self) -> Result<Vec<Reward>, MomentumError> {
        Ok(self.rewards.clone())
    }

    fn assignment(
        &self,
        user_id: i64,
        task_id: i64,
        day: NaiveDate,
    ) -> Result<Option<Assignment>, MomentumError> {
        Ok(self
            .assignments
            .iter()
            .find(|a| a.user_id == user_id && a.task_id == task_id && a.assigned_date == day)
            .cloned())
    }

    fn assignments_on(
        &self,
        user_id: i64,
        day: NaiveDate,
    ) -> Result<Vec<Assignment>, MomentumError> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.user_id == user_id && a.assigned_date == day)
            .cloned()
            .collect())
    }

    fn transactions(&self, user_id: i64) -> Result<Vec<TokenTransaction>, MomentumError> {
        // Insertion order is chronological; reverse for most-recent-first.
        Ok(self
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .rev()
            .cloned()
            .collect())
    }

    fn redemptions(&self, user_id: i64) -> Result<Vec<Redemption>, MomentumError> {
        Ok(self
            .redemptions
            .iter()
            .filter(|r| r.user_id == user_id)
            .rev()
            .cloned()
            .collect())
    }

    fn insert_user(&mut self, user: &mut User) -> Result<(), MomentumError> {
        user.id = self.next_id();
        self.users.push(user.clone());
        Ok(())
    }

    fn insert_task(&mut self, task: &mut Task) -> Result<(), MomentumError> {
        task.id = self.next_id();
        self.tasks.push(task.clone());
        Ok(())
    }

    fn insert_reward(&mut self, reward: &mut Reward) -> Result<(), MomentumError> {
        reward.id = self.next_id();
        self.rewards.push(reward.clone());
        Ok(())
    }

    fn insert_assignment(&mut self, assignment: &mut Assignment) -> Result<(), MomentumError> {
        assignment.id = self.next_id();
        self.assignments.push(assignment.clone());
        Ok(())
    }

    fn commit(&mut self, update: LedgerUpdate) -> Result<(), MomentumError> {
        if let Some(user) = update.user {
            match self.users.iter_mut().find(|u| u.id == user.id) {
                Some(slot) => *slot = user,
                None => {
                    return Err(MomentumError::Database(format!(
                        "Cannot update unknown user {}",
                        user.id
                    )))
                }
            }
        }

        if let Some(assignment) = update.assignment {
            match self.assignments.iter_mut().find(|a| a.id == assignment.id) {
                Some(slot) => *slot = assignment,
                None => {
                    return Err(MomentumError::Database(format!(
                        "Cannot update unknown assignment {}",
                        assignment.id
                    )))
                }
            }
        }

        for mut transaction in update.transactions {
            transaction.id = Some(self.next_id());
            self.transactions.push(transaction);
        }

        if let Some(mut redemption) = update.redemption {
            redemption.id = Some(self.next_id());
            self.redemptions.push(redemption);
        }

        Ok(())
    }

    fn clear(&mut self) -> Result<(), MomentumError> {
        *self = Self::default();
        Ok(())
    }
}
