//! Split calculation.
//!
//! Turns an expense total and a participant list into the per-participant
//! [`Split`]s stored with the expense.
//!
//! Rounding is to the cent, half away from zero. Residual cents left over by
//! an `equal` split are not redistributed, and `percentage`/`exact` inputs are
//! trusted as given: nothing checks that percentages add up to 100% or that
//! exact amounts add up to the total.

use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Money, Percentage, ResultEngine, Split, SplitStatus, money::div_round,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    #[default]
    Equal,
    Percentage,
    Exact,
}

impl SplitType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Percentage => "percentage",
            Self::Exact => "exact",
        }
    }
}

impl TryFrom<&str> for SplitType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            "percentage" => Ok(Self::Percentage),
            "exact" => Ok(Self::Exact),
            other => Err(EngineError::InvalidSplitType(other.to_string())),
        }
    }
}

/// A participant as submitted by the client.
///
/// `percentage` is only read for [`SplitType::Percentage`] and `amount` only
/// for [`SplitType::Exact`]; a missing value counts as zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitInput {
    pub user: String,
    pub percentage: Option<Percentage>,
    pub amount: Option<Money>,
}

impl SplitInput {
    /// A participant with no explicit share, as used by `equal` splits.
    pub fn user(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            percentage: None,
            amount: None,
        }
    }

    pub fn with_percentage(user: impl Into<String>, percentage: Percentage) -> Self {
        Self {
            user: user.into(),
            percentage: Some(percentage),
            amount: None,
        }
    }

    pub fn with_amount(user: impl Into<String>, amount: Money) -> Self {
        Self {
            user: user.into(),
            percentage: None,
            amount: Some(amount),
        }
    }
}

/// Computes the splits of `total` among `participants`, preserving their
/// order. Every returned split is [`SplitStatus::Pending`].
pub fn compute_splits(
    total: Money,
    split_type: SplitType,
    participants: &[SplitInput],
) -> ResultEngine<Vec<Split>> {
    if !total.is_positive() {
        return Err(EngineError::InvalidAmount(
            "expense amount must be > 0".to_string(),
        ));
    }
    if participants.is_empty() {
        return Err(EngineError::EmptyParticipants);
    }

    let total_cents = i128::from(total.cents());
    let full = i128::from(Percentage::FULL.basis_points());

    let splits: Vec<Split> = match split_type {
        SplitType::Equal => {
            let count = participants.len() as i128;
            let amount = Money::new(div_round(total_cents, count).ok_or_else(too_large)?);
            let percentage = Percentage::new(div_round(full, count).ok_or_else(too_large)?);
            participants
                .iter()
                .map(|p| pending(&p.user, amount, percentage))
                .collect()
        }
        SplitType::Percentage => participants
            .iter()
            .map(|p| {
                let percentage = p.percentage.unwrap_or(Percentage::ZERO);
                if percentage.is_negative() {
                    return Err(EngineError::InvalidAmount(format!(
                        "negative percentage for {}",
                        p.user
                    )));
                }
                let amount = div_round(
                    i128::from(percentage.basis_points()) * total_cents,
                    full,
                )
                .ok_or_else(too_large)?;
                Ok(pending(&p.user, Money::new(amount), percentage))
            })
            .collect::<ResultEngine<Vec<_>>>()?,
        SplitType::Exact => participants
            .iter()
            .map(|p| {
                let amount = p.amount.unwrap_or(Money::ZERO);
                if amount.is_negative() {
                    return Err(EngineError::InvalidAmount(format!(
                        "negative amount for {}",
                        p.user
                    )));
                }
                let percentage = div_round(i128::from(amount.cents()) * full, total_cents)
                    .ok_or_else(too_large)?;
                Ok(pending(&p.user, amount, Percentage::new(percentage)))
            })
            .collect::<ResultEngine<Vec<_>>>()?,
    };

    Ok(splits)
}

fn too_large() -> EngineError {
    EngineError::InvalidAmount("split value out of range".to_string())
}

fn pending(user: &str, amount: Money, percentage: Percentage) -> Split {
    Split {
        user: user.to_string(),
        amount,
        percentage,
        status: SplitStatus::Pending,
    }
}
