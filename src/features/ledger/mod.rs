//! The token ledger.
//!
//! Maintains an auditable record of token earnings and expenditures:
//! - Task completion payouts and daily streak bonuses
//! - Reward redemptions
//! - Balance plus full transaction history
//!
//! The engine is storage-agnostic; stores implement [`LedgerStore`].

mod engine;
mod sqlite;
pub mod store;

pub use engine::{
    AssignedTask, CompletionReceipt, Ledger, LedgerConfig, RedemptionReceipt, RewardsView,
    WalletHistory,
};
pub use sqlite::SqliteStore;
pub use store::{LedgerStore, LedgerUpdate, MemoryStore};
