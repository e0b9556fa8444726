//! JSON bodies exchanged with the Divvy HTTP API.
//!
//! Amounts are integer minor units (`*_minor`, cents) and percentages are
//! basis points (`*_bp`, `10000` = 100%).

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub description: Option<String>,
        /// Usernames joining besides the creator.
        #[serde(default)]
        pub members: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersAdd {
        pub members: Vec<String>,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MemberView {
        pub username: String,
        pub is_admin: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: String,
        pub name: String,
        pub description: Option<String>,
        pub creator: String,
        pub created_at: DateTime<Utc>,
        pub members: Vec<MemberView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupsResponse {
        pub groups: Vec<GroupView>,
    }

    /// A group together with its expenses, newest first.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupDetailResponse {
        pub group: GroupView,
        pub expenses: Vec<super::expense::ExpenseView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SplitType {
        #[default]
        Equal,
        Percentage,
        Exact,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SplitStatus {
        Pending,
        Settled,
    }

    /// One participant of a new expense.
    ///
    /// `percentage_bp` is read for `percentage` splits, `amount_minor` for
    /// `exact` ones; both are ignored for `equal`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitNew {
        pub user: String,
        pub percentage_bp: Option<i64>,
        pub amount_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub group_id: String,
        pub description: String,
        pub amount_minor: i64,
        #[serde(default)]
        pub split_type: SplitType,
        /// Defaults to every group member.
        pub splits: Option<Vec<SplitNew>>,
        pub notes: Option<String>,
        /// RFC3339 timestamp; defaults to now.
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SplitView {
        pub user: String,
        pub amount_minor: i64,
        pub percentage_bp: i64,
        pub status: SplitStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: String,
        pub group_id: String,
        pub description: String,
        pub amount_minor: i64,
        pub paid_by: String,
        pub occurred_at: DateTime<Utc>,
        pub split_type: SplitType,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub splits: Vec<SplitView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettleSplit {
        pub expense_id: String,
        /// Participant whose split gets settled.
        pub user: String,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BalanceView {
        pub user: String,
        pub paid_minor: i64,
        pub owed_minor: i64,
        pub balance_minor: i64,
    }

    /// Per-member balances, highest first.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalancesResponse {
        pub group_id: String,
        pub balances: Vec<BalanceView>,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserSummaryView {
        pub paid_minor: i64,
        pub owed_minor: i64,
        pub owed_to_me_minor: i64,
        pub balance_minor: i64,
    }
}
