//! Core abstractions for momentum.
//!
//! This module provides the domain entities and the injectable clock used
//! across features.

mod clock;
mod models;

pub use clock::{Clock, FixedClock, SystemClock};
pub use models::{
    Assignment, AssignmentStatus, Difficulty, Redemption, Reward, RewardCategory, Task,
    TaskCategory, TokenTransaction, TransactionKind, User,
};
