//! Divvy engine: groups, expenses and the split/balance/settlement logic
//! behind them.
//!
//! The pure parts ([`compute_splits`], [`compute_balances`],
//! [`compute_user_summary`] and the [`SplitStatus`] transition) never touch
//! the database. [`Engine`] wraps them with persistence and membership
//! checks.

pub use balance::{
    Balance, GroupBalances, UserSummary, compute_balances, compute_user_summary,
    sorted_by_balance,
};
pub use calculator::{SplitInput, SplitType, compute_splits};
pub use error::EngineError;
pub use expenses::Expense;
pub use groups::{Group, GroupMember};
pub use money::{Money, Percentage};
pub use ops::{Engine, EngineBuilder, NewExpense};
pub use settlement::{SettleOutcome, SplitStatus};
pub use splits::Split;

mod balance;
mod calculator;
mod error;
mod expenses;
mod group_members;
mod groups;
mod money;
mod ops;
mod settlement;
mod splits;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
