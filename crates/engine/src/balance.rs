//! Balance aggregation.
//!
//! Balances are derived from expenses on every read and never stored. Both
//! functions are order-independent: they only add into accumulators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EngineError, Expense, Money, ResultEngine};

/// Net position of one participant over a set of expenses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub paid: Money,
    pub owed: Money,
    pub balance: Money,
}

/// Computes paid/owed/balance for every member.
///
/// A payer gets the full expense amount credited; every other participant
/// owes their split amount. The payer's own split never counts as owed.
/// Payers and participants outside `members` are ignored. Fails with
/// [`EngineError::InvalidAmount`] if a total no longer fits in cents.
pub fn compute_balances<'m, 'e, M, E>(
    members: M,
    expenses: E,
) -> ResultEngine<BTreeMap<String, Balance>>
where
    M: IntoIterator<Item = &'m str>,
    E: IntoIterator<Item = &'e Expense>,
{
    let mut balances: BTreeMap<String, Balance> = members
        .into_iter()
        .map(|member| (member.to_string(), Balance::default()))
        .collect();

    for expense in expenses {
        if let Some(payer) = balances.get_mut(&expense.paid_by) {
            payer.paid = accumulate(payer.paid, expense.amount)?;
        }
        for split in &expense.splits {
            if split.user == expense.paid_by {
                continue;
            }
            if let Some(participant) = balances.get_mut(&split.user) {
                participant.owed = accumulate(participant.owed, split.amount)?;
            }
        }
    }

    for balance in balances.values_mut() {
        balance.balance = difference(balance.paid, balance.owed)?;
    }

    Ok(balances)
}

fn accumulate(total: Money, amount: Money) -> ResultEngine<Money> {
    total.checked_add(amount).ok_or_else(overflow)
}

fn difference(a: Money, b: Money) -> ResultEngine<Money> {
    a.checked_sub(b).ok_or_else(overflow)
}

fn overflow() -> EngineError {
    EngineError::InvalidAmount("total out of range".to_string())
}

/// Balances of one group in presentation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBalances {
    /// Canonical id of the group.
    pub group_id: String,
    pub balances: Vec<(String, Balance)>,
}

/// Presentation order: highest balance first, ties by username.
pub fn sorted_by_balance(balances: BTreeMap<String, Balance>) -> Vec<(String, Balance)> {
    let mut sorted: Vec<_> = balances.into_iter().collect();
    sorted.sort_by(|(a_user, a), (b_user, b)| {
        b.balance.cmp(&a.balance).then_with(|| a_user.cmp(b_user))
    });
    sorted
}

/// A single user's position across every group they take part in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Total of the expenses the user paid.
    pub paid: Money,
    /// What the user owes on expenses paid by others.
    pub owed: Money,
    /// What others owe on expenses the user paid.
    pub owed_to_me: Money,
    /// `owed_to_me - owed`.
    pub balance: Money,
}

pub fn compute_user_summary<'a, E>(user: &str, expenses: E) -> ResultEngine<UserSummary>
where
    E: IntoIterator<Item = &'a Expense>,
{
    let mut summary = UserSummary::default();

    for expense in expenses {
        if expense.paid_by == user {
            summary.paid = accumulate(summary.paid, expense.amount)?;
            let others = Money::checked_sum(
                expense
                    .splits
                    .iter()
                    .filter(|split| split.user != user)
                    .map(|split| split.amount),
            )
            .ok_or_else(overflow)?;
            summary.owed_to_me = accumulate(summary.owed_to_me, others)?;
        } else if let Some(split) = expense.splits.iter().find(|split| split.user == user) {
            summary.owed = accumulate(summary.owed, split.amount)?;
        }
    }

    summary.balance = difference(summary.owed_to_me, summary.owed)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{Percentage, Split, SplitStatus, SplitType};

    fn expense(paid_by: &str, amount: i64, splits: &[(&str, i64)]) -> Expense {
        Expense {
            id: format!("{paid_by}-{amount}"),
            group_id: "g".to_string(),
            description: "test".to_string(),
            amount: Money::new(amount),
            paid_by: paid_by.to_string(),
            occurred_at: Utc::now(),
            split_type: SplitType::Exact,
            notes: None,
            created_at: Utc::now(),
            splits: splits
                .iter()
                .map(|(user, amount)| Split {
                    user: user.to_string(),
                    amount: Money::new(*amount),
                    percentage: Percentage::ZERO,
                    status: SplitStatus::Pending,
                })
                .collect(),
        }
    }

    const MEMBERS: [&str; 3] = ["a", "b", "c"];

    #[test]
    fn payer_own_split_is_not_owed() {
        let expenses = [expense("a", 200_00, &[("a", 0), ("b", 100_00), ("c", 100_00)])];
        let balances = compute_balances(MEMBERS, &expenses).unwrap();

        assert_eq!(balances["a"].paid, Money::new(200_00));
        assert_eq!(balances["a"].owed, Money::ZERO);
        assert_eq!(balances["a"].balance, Money::new(200_00));
        assert_eq!(balances["b"].owed, Money::new(100_00));
        assert_eq!(balances["b"].balance, Money::new(-100_00));
        assert_eq!(balances["c"].owed, Money::new(100_00));
        assert_eq!(balances["c"].balance, Money::new(-100_00));
    }

    #[test]
    fn payer_share_in_equal_split_is_excluded() {
        let expenses = [expense("a", 90_00, &[("a", 30_00), ("b", 30_00), ("c", 30_00)])];
        let balances = compute_balances(MEMBERS, &expenses).unwrap();
        assert_eq!(balances["a"].owed, Money::ZERO);
        assert_eq!(balances["a"].balance, Money::new(90_00));
        assert_eq!(balances["b"].balance, Money::new(-30_00));
    }

    #[test]
    fn outsiders_are_ignored() {
        let expenses = [expense("z", 50_00, &[("z", 25_00), ("a", 25_00), ("y", 1)])];
        let balances = compute_balances(MEMBERS, &expenses).unwrap();
        assert_eq!(balances.len(), 3);
        assert!(!balances.contains_key("z"));
        assert_eq!(balances["a"].owed, Money::new(25_00));
    }

    #[test]
    fn members_without_expenses_start_at_zero() {
        let balances = compute_balances(MEMBERS, []).unwrap();
        assert!(balances.values().all(|b| *b == Balance::default()));
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense("a", 90_00, &[("a", 30_00), ("b", 30_00), ("c", 30_00)]),
            expense("b", 40_00, &[("a", 20_00), ("b", 20_00)]),
            expense("c", 10_01, &[("a", 3_34), ("b", 3_34), ("c", 3_33)]),
            expense("a", 5_00, &[("c", 5_00)]),
        ]
    }

    #[test]
    fn accounting_identity_holds() {
        let balances = compute_balances(MEMBERS, &sample()).unwrap();
        let paid: Money = balances.values().map(|b| b.paid).sum();
        let owed: Money = balances.values().map(|b| b.owed).sum();
        let net: Money = balances.values().map(|b| b.balance).sum();
        assert_eq!(net, paid - owed);
    }

    #[test]
    fn order_does_not_matter() {
        let expenses = sample();
        let expected = compute_balances(MEMBERS, &expenses).unwrap();

        let n = expenses.len();
        for shift in 0..n {
            let rotated: Vec<_> = (0..n).map(|i| &expenses[(i + shift) % n]).collect();
            assert_eq!(compute_balances(MEMBERS, rotated.iter().copied()).unwrap(), expected);
            let reversed: Vec<_> = rotated.iter().rev().copied().collect();
            assert_eq!(compute_balances(MEMBERS, reversed).unwrap(), expected);
        }
    }

    #[test]
    fn sorted_by_balance_is_descending() {
        let expenses = [expense("a", 200_00, &[("b", 100_00), ("c", 100_00)])];
        let sorted = sorted_by_balance(compute_balances(MEMBERS, &expenses).unwrap());
        let order: Vec<_> = sorted.iter().map(|(user, _)| user.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn user_summary_tracks_owed_to_me() {
        let summary = compute_user_summary("a", &sample()).unwrap();
        assert_eq!(summary.paid, Money::new(95_00));
        assert_eq!(summary.owed_to_me, Money::new(65_00));
        assert_eq!(summary.owed, Money::new(23_34));
        assert_eq!(summary.balance, Money::new(41_66));
    }

    #[test]
    fn overflowing_totals_are_errors() {
        let half = i64::MAX / 2 + 1;
        let expenses = [
            expense("a", half, &[("b", half)]),
            expense("a", half, &[("b", half)]),
        ];
        let err = compute_balances(MEMBERS, &expenses).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
        let err = compute_user_summary("a", &expenses).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));

        let expenses = [expense("c", i64::MAX, &[("a", half), ("b", half)])];
        let err = compute_user_summary("c", &expenses).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn largest_single_expense_still_balances() {
        let expenses = [expense("a", i64::MAX, &[("a", 1), ("b", i64::MAX)])];
        let balances = compute_balances(MEMBERS, &expenses).unwrap();
        assert_eq!(balances["a"].balance, Money::new(i64::MAX));
        assert_eq!(balances["b"].balance, Money::new(-i64::MAX));
    }

    #[test]
    fn user_summary_ignores_unrelated_expenses() {
        let expenses = [expense("b", 10_00, &[("c", 10_00)])];
        assert_eq!(compute_user_summary("a", &expenses).unwrap(), UserSummary::default());
    }
}
