//! Conversions from engine values to API bodies.

use api_types::{
    balance::{BalanceView, BalancesResponse, UserSummaryView},
    expense::{ExpenseView, SplitStatus, SplitType, SplitView},
    group::{GroupView, MemberView},
};
use engine::{
    Balance, Expense, Group, GroupBalances, Money, Percentage, SplitInput, UserSummary,
};

pub fn group_view(group: Group) -> GroupView {
    GroupView {
        id: group.id,
        name: group.name,
        description: group.description,
        creator: group.creator,
        created_at: group.created_at,
        members: group
            .members
            .into_iter()
            .map(|m| MemberView {
                username: m.user,
                is_admin: m.is_admin,
            })
            .collect(),
    }
}

pub fn expense_view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        group_id: expense.group_id,
        description: expense.description,
        amount_minor: expense.amount.cents(),
        paid_by: expense.paid_by,
        occurred_at: expense.occurred_at,
        split_type: split_type_view(expense.split_type),
        notes: expense.notes,
        created_at: expense.created_at,
        splits: expense
            .splits
            .into_iter()
            .map(|split| SplitView {
                user: split.user,
                amount_minor: split.amount.cents(),
                percentage_bp: split.percentage.basis_points(),
                status: if split.status.is_settled() {
                    SplitStatus::Settled
                } else {
                    SplitStatus::Pending
                },
            })
            .collect(),
    }
}

fn balance_view((user, balance): (String, Balance)) -> BalanceView {
    BalanceView {
        user,
        paid_minor: balance.paid.cents(),
        owed_minor: balance.owed.cents(),
        balance_minor: balance.balance.cents(),
    }
}

pub fn balances_response(report: GroupBalances) -> BalancesResponse {
    BalancesResponse {
        group_id: report.group_id,
        balances: report.balances.into_iter().map(balance_view).collect(),
    }
}

pub fn summary_view(summary: UserSummary) -> UserSummaryView {
    UserSummaryView {
        paid_minor: summary.paid.cents(),
        owed_minor: summary.owed.cents(),
        owed_to_me_minor: summary.owed_to_me.cents(),
        balance_minor: summary.balance.cents(),
    }
}

fn split_type_view(split_type: engine::SplitType) -> SplitType {
    match split_type {
        engine::SplitType::Equal => SplitType::Equal,
        engine::SplitType::Percentage => SplitType::Percentage,
        engine::SplitType::Exact => SplitType::Exact,
    }
}

pub fn split_type_input(split_type: SplitType) -> engine::SplitType {
    match split_type {
        SplitType::Equal => engine::SplitType::Equal,
        SplitType::Percentage => engine::SplitType::Percentage,
        SplitType::Exact => engine::SplitType::Exact,
    }
}

pub fn split_input(split: api_types::expense::SplitNew) -> SplitInput {
    SplitInput {
        user: split.user,
        percentage: split.percentage_bp.map(Percentage::new),
        amount: split.amount_minor.map(Money::new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_input_keeps_only_given_values() {
        let input = split_input(api_types::expense::SplitNew {
            user: "bob".to_string(),
            percentage_bp: Some(2500),
            amount_minor: None,
        });
        assert_eq!(input, SplitInput::with_percentage("bob", Percentage::new(2500)));
    }

    #[test]
    fn balances_response_keeps_order_and_group_id() {
        let balance = |paid, owed| Balance {
            paid: Money::new(paid),
            owed: Money::new(owed),
            balance: Money::new(paid - owed),
        };
        let response = balances_response(GroupBalances {
            group_id: "g1".to_string(),
            balances: vec![
                ("bob".to_string(), balance(30_00, 10_00)),
                ("alice".to_string(), balance(0, 20_00)),
            ],
        });
        assert_eq!(response.group_id, "g1");
        let users: Vec<_> = response.balances.iter().map(|b| b.user.as_str()).collect();
        assert_eq!(users, ["bob", "alice"]);
        assert_eq!(response.balances[1].balance_minor, -20_00);
    }

    #[test]
    fn new_group_view_lists_creator_as_admin() {
        let group = Group::new("Trip".to_string(), None, "alice");
        let view = group_view(group);
        assert_eq!(
            view.members,
            [MemberView {
                username: "alice".to_string(),
                is_admin: true,
            }]
        );
    }
}
