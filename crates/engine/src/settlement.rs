//! Settlement state of a split.
//!
//! A split starts `pending` and can only move to `settled`. There is no way
//! back, so settling twice is a no-op.

use serde::{Deserialize, Serialize};

use crate::{EngineError, Expense, ResultEngine, Split};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStatus {
    #[default]
    Pending,
    Settled,
}

impl SplitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Settled => "settled",
        }
    }

    pub fn is_settled(self) -> bool {
        self == Self::Settled
    }
}

impl TryFrom<&str> for SplitStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "settled" => Ok(Self::Settled),
            other => Err(EngineError::InvalidData(format!("split status {other:?}"))),
        }
    }
}

/// What a settle request did to the split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The split moved from `pending` to `settled`.
    Settled,
    /// The split was already settled and was left untouched.
    AlreadySettled,
}

impl SettleOutcome {
    /// Whether the status changed and has to be persisted.
    pub fn changed(self) -> bool {
        self == Self::Settled
    }
}

impl Split {
    pub fn settle(&mut self) -> SettleOutcome {
        match self.status {
            SplitStatus::Pending => {
                self.status = SplitStatus::Settled;
                SettleOutcome::Settled
            }
            SplitStatus::Settled => SettleOutcome::AlreadySettled,
        }
    }
}

impl Expense {
    /// Settles the split owed by `user`.
    pub fn settle_split(&mut self, user: &str) -> ResultEngine<SettleOutcome> {
        let split = self
            .splits
            .iter_mut()
            .find(|split| split.user == user)
            .ok_or_else(|| EngineError::ParticipantNotFound(user.to_string()))?;
        Ok(split.settle())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{Money, Percentage, SplitType};

    fn split(user: &str) -> Split {
        Split {
            user: user.to_string(),
            amount: Money::new(10_00),
            percentage: Percentage::new(50_00),
            status: SplitStatus::Pending,
        }
    }

    fn expense() -> Expense {
        Expense {
            id: "e1".to_string(),
            group_id: "g1".to_string(),
            description: "Dinner".to_string(),
            amount: Money::new(20_00),
            paid_by: "alice".to_string(),
            occurred_at: Utc::now(),
            split_type: SplitType::Equal,
            notes: None,
            created_at: Utc::now(),
            splits: vec![split("alice"), split("bob")],
        }
    }

    #[test]
    fn pending_moves_to_settled() {
        let mut split = split("bob");
        assert_eq!(split.settle(), SettleOutcome::Settled);
        assert_eq!(split.status, SplitStatus::Settled);
    }

    #[test]
    fn settling_twice_is_a_no_op() {
        let mut split = split("bob");
        split.settle();
        assert_eq!(split.settle(), SettleOutcome::AlreadySettled);
        assert_eq!(split.status, SplitStatus::Settled);
        assert!(!SettleOutcome::AlreadySettled.changed());
    }

    #[test]
    fn settle_split_targets_one_participant() {
        let mut expense = expense();
        assert_eq!(expense.settle_split("bob").unwrap(), SettleOutcome::Settled);
        assert_eq!(expense.splits[0].status, SplitStatus::Pending);
        assert_eq!(expense.splits[1].status, SplitStatus::Settled);
    }

    #[test]
    fn unknown_stored_status_is_a_data_error() {
        assert_eq!(SplitStatus::try_from("settled").unwrap(), SplitStatus::Settled);
        assert_eq!(
            SplitStatus::try_from("paid").unwrap_err(),
            EngineError::InvalidData("split status \"paid\"".to_string())
        );
    }

    #[test]
    fn settle_split_rejects_unknown_participant() {
        let mut expense = expense();
        assert_eq!(
            expense.settle_split("carol").unwrap_err(),
            EngineError::ParticipantNotFound("carol".to_string())
        );
    }
}
