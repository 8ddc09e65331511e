//! The token ledger.
//!
//! Owns the reward economy: task completion pays out tokens, closing out a
//! full day of assignments grants a streak bonus, redemptions debit the
//! balance. Every mutation appends to the transaction log, so the signed sum
//! of a user's log always equals their balance.

use serde::Serialize;

use crate::core::{
    Clock, Redemption, TokenTransaction, TransactionKind, User,
};
use crate::error::MomentumError;

use super::store::{LedgerStore, LedgerUpdate};

/// Tunables for the ledger.
#[derive(Debug, Clone, Copy)]
pub struct LedgerConfig {
    /// Tokens granted when all of a day's assignments are completed.
    pub streak_bonus_tokens: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            streak_bonus_tokens: 3,
        }
    }
}

/// Result of a successful task completion.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionReceipt {
    pub tokens_earned: u32,
    pub new_balance: u32,
    /// Streak bonus granted by this completion, if it closed out the day.
    pub streak_bonus: Option<u32>,
    pub streak_days: u32,
}

/// Result of a successful reward redemption.
#[derive(Debug, Clone, Serialize)]
pub struct RedemptionReceipt {
    pub tokens_spent: u32,
    pub new_balance: u32,
}

/// Balance plus the full transaction log, most recent first.
#[derive(Debug, Clone, Serialize)]
pub struct WalletHistory {
    pub current_balance: u32,
    pub transactions: Vec<TokenTransaction>,
    pub user: User,
}

/// A task joined with its assignment state for one day.
#[derive(Debug, Clone, Serialize)]
pub struct AssignedTask {
    #[serde(flatten)]
    pub task: crate::core::Task,
    pub status: crate::core::AssignmentStatus,
    pub completion_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// The reward catalog as presented to a user.
#[derive(Debug, Clone, Serialize)]
pub struct RewardsView {
    /// Rewards currently available for redemption.
    pub rewards: Vec<crate::core::Reward>,
    pub user_balance: u32,
}

/// The ledger engine.
///
/// Mutating operations read current state, decide, and publish the whole
/// write set through one atomic [`LedgerStore::commit`]. Rejections
/// (`NotFound`, `AlreadyCompleted`, `Unavailable`, `InsufficientBalance`)
/// leave the store untouched.
pub struct Ledger<S, C> {
    store: S,
    clock: C,
    config: LedgerConfig,
}

impl<S: LedgerStore, C: Clock> Ledger<S, C> {
    /// Create a ledger with default tunables.
    pub fn new(store: S, clock: C) -> Self {
        Self::with_config(store, clock, LedgerConfig::default())
    }

    /// Create a ledger with explicit tunables.
    pub const fn with_config(store: S, clock: C, config: LedgerConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store (seeding, scheduling).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The ledger's current calendar day.
    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    /// Complete today's assignment of a task and credit its reward.
    ///
    /// Completing an already-completed assignment is rejected without any
    /// mutation; there is never a second payout. If this completion closes
    /// out the day's full assignment set, a streak bonus is credited and the
    /// streak counter advances, at most once per calendar day.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user, task, or today's assignment is
    /// missing, `AlreadyCompleted` on a repeat completion, or `Database` if
    /// the store fails.
    pub fn complete_task(
        &mut self,
        user_id: i64,
        task_id: i64,
    ) -> Result<CompletionReceipt, MomentumError> {
        let now = self.clock.now();
        let today = self.clock.today();

        let mut user = self
            .store
            .user(user_id)?
            .ok_or_else(|| MomentumError::NotFound("Profile not found".to_string()))?;

        let task = self
            .store
            .task(task_id)?
            .ok_or_else(|| MomentumError::NotFound("Task not found".to_string()))?;

        let mut assignment = self
            .store
            .assignment(user_id, task_id, today)?
            .ok_or_else(|| MomentumError::NotFound("Task not found".to_string()))?;

        if assignment.is_completed() {
            return Err(MomentumError::AlreadyCompleted);
        }

        assignment.status = crate::core::AssignmentStatus::Completed;
        assignment.completion_date = Some(now);

        user.token_balance += task.token_reward;

        let mut transactions = vec![TokenTransaction {
            id: None,
            user_id,
            kind: TransactionKind::Earn,
            amount: task.token_reward,
            description: format!("Completed Task: {}", task.title),
            date: now,
            related_task_id: Some(task_id),
            related_reward_id: None,
        }];

        // Streak check: does this completion close out the day? The store
        // still holds the pre-completion status for this assignment, so it
        // is counted as completed explicitly. The last_streak_date guard
        // keeps the bonus to one per calendar day even if more tasks get
        // assigned and completed later.
        let todays = self.store.assignments_on(user_id, today)?;
        let all_completed = !todays.is_empty()
            && todays
                .iter()
                .all(|a| a.id == assignment.id || a.is_completed());

        let mut streak_bonus = None;
        if all_completed && user.last_streak_date != Some(today) {
            let bonus = self.config.streak_bonus_tokens;
            user.token_balance += bonus;
            user.streak_days += 1;
            user.last_streak_date = Some(today);
            streak_bonus = Some(bonus);

            transactions.push(TokenTransaction {
                id: None,
                user_id,
                kind: TransactionKind::Bonus,
                amount: bonus,
                description: format!("Daily streak bonus ({} days)", user.streak_days),
                date: now,
                related_task_id: None,
                related_reward_id: None,
            });
        }

        let receipt = CompletionReceipt {
            tokens_earned: task.token_reward,
            new_balance: user.token_balance,
            streak_bonus,
            streak_days: user.streak_days,
        };

        self.store.commit(LedgerUpdate {
            user: Some(user),
            assignment: Some(assignment),
            transactions,
            redemption: None,
        })?;

        Ok(receipt)
    }

    /// Redeem a reward, debiting its cost from the balance.
    ///
    /// The balance check and the debit commit as one unit; a rejected
    /// redemption leaves balance and transaction log untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown reward, `Unavailable` for a
    /// disabled one, `InsufficientBalance` when the balance does not cover
    /// the cost, or `Database` if the store fails.
    pub fn redeem_reward(
        &mut self,
        user_id: i64,
        reward_id: i64,
    ) -> Result<RedemptionReceipt, MomentumError> {
        let now = self.clock.now();

        let mut user = self
            .store
            .user(user_id)?
            .ok_or_else(|| MomentumError::NotFound("Profile not found".to_string()))?;

        let reward = self
            .store
            .reward(reward_id)?
            .ok_or_else(|| MomentumError::NotFound("Reward not found".to_string()))?;

        if !reward.available {
            return Err(MomentumError::Unavailable);
        }

        if user.token_balance < reward.token_cost {
            return Err(MomentumError::InsufficientBalance {
                required: reward.token_cost,
                available: user.token_balance,
            });
        }

        user.token_balance -= reward.token_cost;

        let receipt = RedemptionReceipt {
            tokens_spent: reward.token_cost,
            new_balance: user.token_balance,
        };

        self.store.commit(LedgerUpdate {
            user: Some(user),
            assignment: None,
            transactions: vec![TokenTransaction {
                id: None,
                user_id,
                kind: TransactionKind::Spend,
                amount: reward.token_cost,
                description: format!("Redeemed: {}", reward.name),
                date: now,
                related_task_id: None,
                related_reward_id: Some(reward_id),
            }],
            redemption: Some(Redemption {
                id: None,
                user_id,
                reward_id,
                tokens_spent: reward.token_cost,
                date: now,
            }),
        })?;

        Ok(receipt)
    }

    /// Today's assignments joined with their tasks.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the store fails.
    pub fn today_tasks(&self, user_id: i64) -> Result<Vec<AssignedTask>, MomentumError> {
        let today = self.clock.today();
        let mut out = Vec::new();

        for assignment in self.store.assignments_on(user_id, today)? {
            let Some(task) = self.store.task(assignment.task_id)? else {
                continue;
            };
            out.push(AssignedTask {
                task,
                status: assignment.status,
                completion_date: assignment.completion_date,
            });
        }

        Ok(out)
    }

    /// The available rewards plus the user's balance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown user or `Database` if the store
    /// fails.
    pub fn available_rewards(&self, user_id: i64) -> Result<RewardsView, MomentumError> {
        let user = self
            .store
            .user(user_id)?
            .ok_or_else(|| MomentumError::NotFound("Profile not found".to_string()))?;

        let rewards = self
            .store
            .rewards()?
            .into_iter()
            .filter(|r| r.available)
            .collect();

        Ok(RewardsView {
            rewards,
            user_balance: user.token_balance,
        })
    }

    /// Current balance plus the full transaction log, most recent first.
    ///
    /// Pure read; no side effects.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown user or `Database` if the store
    /// fails.
    pub fn wallet_history(&self, user_id: i64) -> Result<WalletHistory, MomentumError> {
        let user = self
            .store
            .user(user_id)?
            .ok_or_else(|| MomentumError::NotFound("Profile not found".to_string()))?;

        let transactions = self.store.transactions(user_id)?;

        Ok(WalletHistory {
            current_balance: user.token_balance,
            transactions,
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Assignment, Difficulty, FixedClock, Reward, RewardCategory, Task, TaskCategory,
    };
    use crate::features::ledger::store::{MemoryStore, MockLedgerStore};
    use chrono::{TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 14, 9, 0, 0).unwrap())
    }

    fn make_task(title: &str, reward: u32) -> Task {
        Task {
            id: 0,
            title: title.to_string(),
            description: String::new(),
            token_reward: reward,
            category: TaskCategory::Daily,
            difficulty: Difficulty::Easy,
        }
    }

    fn make_reward(name: &str, cost: u32, available: bool) -> Reward {
        Reward {
            id: 0,
            name: name.to_string(),
            description: String::new(),
            token_cost: cost,
            category: RewardCategory::Content,
            available,
        }
    }

    /// Ledger over a memory store with one user (starting balance via an
    /// earn transaction so the log matches the balance), plus the given
    /// tasks assigned for today.
    fn make_ledger(
        starting_balance: u32,
        tasks: &[(&str, u32)],
    ) -> (Ledger<MemoryStore, FixedClock>, i64, Vec<i64>) {
        let clock = clock();
        let today = clock.today();
        let mut store = MemoryStore::new();

        let mut user = User::new("John Doe", "john@example.com");
        store.insert_user(&mut user).unwrap();

        if starting_balance > 0 {
            user.token_balance = starting_balance;
            store
                .commit(LedgerUpdate {
                    user: Some(user.clone()),
                    transactions: vec![TokenTransaction {
                        id: None,
                        user_id: user.id,
                        kind: TransactionKind::Earn,
                        amount: starting_balance,
                        description: "Opening balance".to_string(),
                        date: clock.now(),
                        related_task_id: None,
                        related_reward_id: None,
                    }],
                    ..Default::default()
                })
                .unwrap();
        }

        let mut task_ids = Vec::new();
        for (title, reward) in tasks {
            let mut task = make_task(title, *reward);
            store.insert_task(&mut task).unwrap();
            let mut assignment = Assignment::pending(user.id, task.id, today);
            store.insert_assignment(&mut assignment).unwrap();
            task_ids.push(task.id);
        }

        (Ledger::new(store, clock), user.id, task_ids)
    }

    /// The §8 invariant: balance equals the signed sum of the log.
    fn assert_balance_matches_log(ledger: &Ledger<MemoryStore, FixedClock>, user_id: i64) {
        let history = ledger.wallet_history(user_id).unwrap();
        let signed: i64 = history
            .transactions
            .iter()
            .map(TokenTransaction::signed_amount)
            .sum();
        assert_eq!(i64::from(history.current_balance), signed);
    }

    #[test]
    fn test_complete_task_credits_reward() {
        let (mut ledger, user_id, task_ids) =
            make_ledger(10, &[("Take morning medication", 5), ("Exercise", 10)]);

        let receipt = ledger.complete_task(user_id, task_ids[0]).unwrap();

        assert_eq!(receipt.tokens_earned, 5);
        assert_eq!(receipt.new_balance, 15);
        assert!(receipt.streak_bonus.is_none());
        assert_balance_matches_log(&ledger, user_id);

        let history = ledger.wallet_history(user_id).unwrap();
        assert_eq!(
            history.transactions[0].description,
            "Completed Task: Take morning medication"
        );
        assert_eq!(history.transactions[0].related_task_id, Some(task_ids[0]));
    }

    #[test]
    fn test_complete_task_twice_is_rejected() {
        let (mut ledger, user_id, task_ids) = make_ledger(0, &[("Read", 7), ("Exercise", 10)]);

        ledger.complete_task(user_id, task_ids[0]).unwrap();
        let balance_after_first = ledger.wallet_history(user_id).unwrap().current_balance;

        let second = ledger.complete_task(user_id, task_ids[0]);
        assert!(matches!(second, Err(MomentumError::AlreadyCompleted)));

        let history = ledger.wallet_history(user_id).unwrap();
        assert_eq!(history.current_balance, balance_after_first);
        assert_eq!(history.transactions.len(), 1);
        assert_balance_matches_log(&ledger, user_id);
    }

    #[test]
    fn test_complete_unknown_task_is_rejected() {
        let (mut ledger, user_id, _) = make_ledger(0, &[("Read", 7)]);

        let result = ledger.complete_task(user_id, 999);
        assert!(matches!(result, Err(MomentumError::NotFound(_))));
    }

    #[test]
    fn test_completing_last_task_grants_streak_bonus_once() {
        let (mut ledger, user_id, task_ids) =
            make_ledger(0, &[("Medication", 5), ("Mindfulness", 8)]);

        let first = ledger.complete_task(user_id, task_ids[0]).unwrap();
        assert!(first.streak_bonus.is_none());
        assert_eq!(first.streak_days, 0);

        let second = ledger.complete_task(user_id, task_ids[1]).unwrap();
        assert_eq!(second.streak_bonus, Some(3));
        assert_eq!(second.streak_days, 1);
        assert_eq!(second.new_balance, 5 + 8 + 3);

        let history = ledger.wallet_history(user_id).unwrap();
        let bonuses: Vec<_> = history
            .transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Bonus)
            .collect();
        assert_eq!(bonuses.len(), 1);
        assert_eq!(bonuses[0].description, "Daily streak bonus (1 days)");
        assert_balance_matches_log(&ledger, user_id);
    }

    #[test]
    fn test_streak_bonus_not_regranted_for_late_assignment() {
        // Close out the day, then assign one more task for the same day:
        // completing it must not grant a second bonus.
        let (mut ledger, user_id, task_ids) = make_ledger(0, &[("Medication", 5)]);

        let receipt = ledger.complete_task(user_id, task_ids[0]).unwrap();
        assert_eq!(receipt.streak_bonus, Some(3));

        let today = clock().today();
        let mut late_task = make_task("Surprise task", 4);
        ledger.store_mut().insert_task(&mut late_task).unwrap();
        let mut late_assignment = Assignment::pending(user_id, late_task.id, today);
        ledger
            .store_mut()
            .insert_assignment(&mut late_assignment)
            .unwrap();

        let late = ledger.complete_task(user_id, late_task.id).unwrap();
        assert!(late.streak_bonus.is_none());
        assert_eq!(late.streak_days, 1);
        assert_balance_matches_log(&ledger, user_id);
    }

    #[test]
    fn test_streak_bonus_granted_again_next_day() {
        let (mut ledger, user_id, task_ids) = make_ledger(0, &[("Medication", 5)]);

        assert_eq!(
            ledger.complete_task(user_id, task_ids[0]).unwrap().streak_bonus,
            Some(3)
        );

        // Next day: a fresh assignment of the same task.
        let next_day = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
        ledger.clock.set(next_day);
        let mut assignment = Assignment::pending(user_id, task_ids[0], next_day.date_naive());
        ledger
            .store_mut()
            .insert_assignment(&mut assignment)
            .unwrap();

        let receipt = ledger.complete_task(user_id, task_ids[0]).unwrap();
        assert_eq!(receipt.streak_bonus, Some(3));
        assert_eq!(receipt.streak_days, 2);
        assert_balance_matches_log(&ledger, user_id);
    }

    #[test]
    fn test_redeem_reward_debits_balance() {
        let (mut ledger, user_id, _) = make_ledger(25, &[]);
        let mut reward = make_reward("Premium Video Content", 15, true);
        ledger.store_mut().insert_reward(&mut reward).unwrap();

        let receipt = ledger.redeem_reward(user_id, reward.id).unwrap();

        assert_eq!(receipt.tokens_spent, 15);
        assert_eq!(receipt.new_balance, 10);

        let history = ledger.wallet_history(user_id).unwrap();
        assert_eq!(history.transactions[0].kind, TransactionKind::Spend);
        assert_eq!(
            history.transactions[0].description,
            "Redeemed: Premium Video Content"
        );

        let redemptions = ledger.store().redemptions(user_id).unwrap();
        assert_eq!(redemptions.len(), 1);
        assert_eq!(redemptions[0].tokens_spent, 15);
        assert_balance_matches_log(&ledger, user_id);
    }

    #[test]
    fn test_redeem_with_insufficient_balance_is_rejected() {
        // The §8 scenario: balance 15, cost 20.
        let (mut ledger, user_id, _) = make_ledger(15, &[]);
        let mut reward = make_reward("Therapy Session Discount", 20, true);
        ledger.store_mut().insert_reward(&mut reward).unwrap();

        let result = ledger.redeem_reward(user_id, reward.id);
        assert!(matches!(
            result,
            Err(MomentumError::InsufficientBalance {
                required: 20,
                available: 15
            })
        ));

        let history = ledger.wallet_history(user_id).unwrap();
        assert_eq!(history.current_balance, 15);
        assert_eq!(history.transactions.len(), 1);
        assert!(ledger.store().redemptions(user_id).unwrap().is_empty());
    }

    #[test]
    fn test_redeem_unavailable_reward_is_rejected() {
        let (mut ledger, user_id, _) = make_ledger(100, &[]);
        let mut reward = make_reward("ADHD Workbook", 50, false);
        ledger.store_mut().insert_reward(&mut reward).unwrap();

        let result = ledger.redeem_reward(user_id, reward.id);
        assert!(matches!(result, Err(MomentumError::Unavailable)));
        assert_eq!(
            ledger.wallet_history(user_id).unwrap().current_balance,
            100
        );
    }

    #[test]
    fn test_redeem_unknown_reward_is_rejected() {
        let (mut ledger, user_id, _) = make_ledger(100, &[]);

        let result = ledger.redeem_reward(user_id, 404);
        assert!(matches!(result, Err(MomentumError::NotFound(_))));
    }

    #[test]
    fn test_wallet_history_is_most_recent_first() {
        let (mut ledger, user_id, task_ids) = make_ledger(0, &[("A", 1), ("B", 2), ("C", 4)]);

        for id in &task_ids {
            ledger.complete_task(user_id, *id).unwrap();
        }

        let history = ledger.wallet_history(user_id).unwrap();
        // Last completion closed the day, so the bonus entry leads.
        assert_eq!(history.transactions[0].kind, TransactionKind::Bonus);
        assert_eq!(history.transactions[1].description, "Completed Task: C");
        assert_eq!(
            history.transactions.last().unwrap().description,
            "Completed Task: A"
        );
        assert_balance_matches_log(&ledger, user_id);
    }

    #[test]
    fn test_today_tasks_joins_status() {
        let (mut ledger, user_id, task_ids) = make_ledger(0, &[("Medication", 5), ("Read", 7)]);
        ledger.complete_task(user_id, task_ids[0]).unwrap();

        let today = ledger.today_tasks(user_id).unwrap();
        assert_eq!(today.len(), 2);

        let done = today.iter().find(|t| t.task.id == task_ids[0]).unwrap();
        assert_eq!(done.status, crate::core::AssignmentStatus::Completed);
        assert!(done.completion_date.is_some());

        let pending = today.iter().find(|t| t.task.id == task_ids[1]).unwrap();
        assert_eq!(pending.status, crate::core::AssignmentStatus::Pending);
        assert!(pending.completion_date.is_none());
    }

    #[test]
    fn test_available_rewards_filters_disabled() {
        let (mut ledger, user_id, _) = make_ledger(25, &[]);
        let mut enabled = make_reward("Premium Video Content", 15, true);
        let mut disabled = make_reward("Retired Reward", 5, false);
        ledger.store_mut().insert_reward(&mut enabled).unwrap();
        ledger.store_mut().insert_reward(&mut disabled).unwrap();

        let view = ledger.available_rewards(user_id).unwrap();
        assert_eq!(view.user_balance, 25);
        assert_eq!(view.rewards.len(), 1);
        assert_eq!(view.rewards[0].name, "Premium Video Content");
    }

    #[test]
    fn test_store_failure_surfaces_as_database_error() {
        let mut store = MockLedgerStore::new();
        store
            .expect_user()
            .returning(|_| Err(MomentumError::Database("connection lost".to_string())));

        let mut ledger = Ledger::new(store, clock());
        let result = ledger.complete_task(1, 1);

        match result {
            Err(MomentumError::Database(msg)) => assert!(msg.contains("connection lost")),
            other => panic!("expected database error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_commits_nothing() {
        let mut store = MockLedgerStore::new();
        let user = {
            let mut u = User::new("John Doe", "john@example.com");
            u.id = 1;
            u.token_balance = 5;
            u
        };
        store.expect_user().returning(move |_| Ok(Some(user.clone())));
        store.expect_reward().returning(|_| {
            Ok(Some(Reward {
                id: 9,
                name: "Costly".to_string(),
                description: String::new(),
                token_cost: 50,
                category: RewardCategory::Premium,
                available: true,
            }))
        });
        // No expect_commit: a commit call would panic the test.

        let mut ledger = Ledger::new(store, clock());
        let result = ledger.redeem_reward(1, 9);
        assert!(matches!(
            result,
            Err(MomentumError::InsufficientBalance { .. })
        ));
    }
}
