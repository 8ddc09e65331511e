use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A user profile with its token economy state.
///
/// `token_balance` is mutated only by the ledger; at all times it equals the
/// signed sum of the user's transaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub token_balance: u32,
    pub streak_days: u32,
    /// Display-only level.
    #[serde(default = "default_level")]
    pub level: u32,
    /// Last calendar day a streak bonus was granted. Guards the bonus
    /// against firing twice on the same day.
    #[serde(default)]
    pub last_streak_date: Option<NaiveDate>,
}

const fn default_level() -> u32 {
    1
}

impl User {
    /// Create a fresh profile with an empty wallet.
    #[must_use]
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            email: email.to_string(),
            token_balance: 0,
            streak_days: 0,
            level: default_level(),
            last_streak_date: None,
        }
    }
}

/// How often a task is meant to recur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Daily,
    Weekly,
    Special,
}

impl TaskCategory {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Special => "special",
        }
    }

    /// Parse from the stored string form. Unknown values fall back to daily.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "weekly" => Self::Weekly,
            "special" => Self::Special,
            _ => Self::Daily,
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subjective effort rating for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Easy,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalog task. Immutable once defined; the per-day binding to a user
/// lives in [`Assignment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub token_reward: u32,
    pub category: TaskCategory,
    pub difficulty: Difficulty,
}

/// Completion state of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Pending,
    Completed,
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Binds a task to a user for one calendar day.
///
/// Exactly one assignment exists per (user, task, day); it transitions from
/// pending to completed at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub user_id: i64,
    pub task_id: i64,
    pub status: AssignmentStatus,
    pub assigned_date: NaiveDate,
    #[serde(default)]
    pub completion_date: Option<DateTime<Utc>>,
}

impl Assignment {
    /// Create a pending assignment for the given day.
    #[must_use]
    pub const fn pending(user_id: i64, task_id: i64, day: NaiveDate) -> Self {
        Self {
            id: 0,
            user_id,
            task_id,
            status: AssignmentStatus::Pending,
            assigned_date: day,
            completion_date: None,
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == AssignmentStatus::Completed
    }
}

/// What kind of thing a reward is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardCategory {
    Discount,
    Content,
    Premium,
    Physical,
}

impl RewardCategory {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Discount => "discount",
            Self::Content => "content",
            Self::Premium => "premium",
            Self::Physical => "physical",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "content" => Self::Content,
            "premium" => Self::Premium,
            "physical" => Self::Physical,
            _ => Self::Discount,
        }
    }
}

impl std::fmt::Display for RewardCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A redeemable catalog reward. `available` is toggled externally; everything
/// else is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub token_cost: u32,
    pub category: RewardCategory,
    pub available: bool,
}

/// Record of a reward purchase. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redemption {
    /// Database ID (None until persisted).
    pub id: Option<i64>,
    pub user_id: i64,
    pub reward_id: i64,
    /// The reward's cost at redemption time.
    pub tokens_spent: u32,
    pub date: DateTime<Utc>,
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Task completion payout.
    Earn,
    /// Reward redemption.
    Spend,
    /// Daily streak bonus.
    Bonus,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Earn => "earn",
            Self::Spend => "spend",
            Self::Bonus => "bonus",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "spend" => Self::Spend,
            "bonus" => Self::Bonus,
            _ => Self::Earn,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One append-only ledger entry.
///
/// The signed sum of a user's entries always equals their balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenTransaction {
    /// Database ID (None until persisted).
    pub id: Option<i64>,
    pub user_id: i64,
    pub kind: TransactionKind,
    pub amount: u32,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub related_task_id: Option<i64>,
    #[serde(default)]
    pub related_reward_id: Option<i64>,
}

impl TokenTransaction {
    /// Amount with its ledger sign: earn/bonus positive, spend negative.
    #[must_use]
    pub const fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionKind::Earn | TransactionKind::Bonus => self.amount as i64,
            TransactionKind::Spend => -(self.amount as i64),
        }
    }
}
