use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Expense, ResultEngine, SettleOutcome, SplitInput, SplitStatus, compute_splits,
    expenses, splits, util,
};

use super::{Engine, NewExpense, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Record an expense paid by `user_id` for a group they belong to.
    ///
    /// Splits are computed from `participants` (or every member when none are
    /// given). Participants must be distinct members of the group.
    pub async fn new_expense(&self, input: NewExpense, user_id: &str) -> ResultEngine<Expense> {
        let group_id = util::parse_id(&input.group_id, "group")?;
        let description = normalize_required_name(&input.description, "description")?;
        let notes = normalize_optional_text(input.notes.as_deref());

        with_tx!(self, |db_tx| {
            let group = self.require_group_member(&db_tx, &group_id, user_id).await?;

            let participants: Vec<SplitInput> = match input.participants {
                Some(participants) => participants
                    .into_iter()
                    .map(|p| SplitInput {
                        user: p.user.trim().to_string(),
                        ..p
                    })
                    .collect(),
                None => group.member_ids().map(SplitInput::user).collect(),
            };

            let mut seen = HashSet::new();
            for participant in &participants {
                if !group.is_member(&participant.user) {
                    return Err(EngineError::InvalidMember(format!(
                        "{} is not a member of this group",
                        participant.user
                    )));
                }
                if !seen.insert(participant.user.as_str()) {
                    return Err(EngineError::InvalidMember(format!(
                        "{} appears more than once",
                        participant.user
                    )));
                }
            }

            let splits = compute_splits(input.amount, input.split_type, &participants)?;
            let expense = Expense::new(
                group.id.clone(),
                description,
                input.amount,
                user_id.to_string(),
                input.occurred_at.unwrap_or_else(Utc::now),
                input.split_type,
                notes,
                splits,
            );

            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            for split in expense.split_models() {
                split.insert(&db_tx).await?;
            }

            tracing::debug!(
                "expense {} of {} in group {} split {} ways",
                expense.id,
                expense.amount,
                group.id,
                expense.splits.len()
            );
            Ok(expense)
        })
    }

    /// Expenses of a group, most recent first.
    pub async fn group_expenses(&self, group_id: &str, user_id: &str) -> ResultEngine<Vec<Expense>> {
        let group_id = util::parse_id(group_id, "group")?;
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, &group_id, user_id).await?;
            let models = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group_id.clone()))
                .order_by_desc(expenses::Column::OccurredAt)
                .order_by_desc(expenses::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            self.expenses_with_splits(&db_tx, models).await
        })
    }

    /// A single expense, visible to members of its group.
    pub async fn expense(&self, expense_id: &str, user_id: &str) -> ResultEngine<Expense> {
        let expense_id = util::parse_id(expense_id, "expense")?;
        with_tx!(self, |db_tx| {
            let (expense, _group) = self.require_expense_read(&db_tx, &expense_id, user_id).await?;
            Ok(expense)
        })
    }

    /// Mark the split owed by `participant` as settled.
    ///
    /// Any member of the expense's group may do this for any participant.
    /// Settling an already settled split changes nothing.
    pub async fn settle_split(
        &self,
        expense_id: &str,
        participant: &str,
        user_id: &str,
    ) -> ResultEngine<(Expense, SettleOutcome)> {
        let expense_id = util::parse_id(expense_id, "expense")?;
        let participant = participant.trim();
        with_tx!(self, |db_tx| {
            let (mut expense, _group) =
                self.require_expense_read(&db_tx, &expense_id, user_id).await?;
            let outcome = expense.settle_split(participant)?;

            if outcome.changed() {
                let split = splits::Entity::find()
                    .filter(splits::Column::ExpenseId.eq(expense.id.clone()))
                    .filter(splits::Column::UserId.eq(participant.to_string()))
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::ParticipantNotFound(participant.to_string()))?;
                let mut active: splits::ActiveModel = split.into();
                active.status = ActiveValue::Set(SplitStatus::Settled.as_str().to_string());
                active.update(&db_tx).await?;
                tracing::debug!("settled split of {participant} in expense {}", expense.id);
            }

            Ok((expense, outcome))
        })
    }

    /// Delete an expense. Allowed to its payer and to group admins.
    pub async fn delete_expense(&self, expense_id: &str, user_id: &str) -> ResultEngine<()> {
        let expense_id = util::parse_id(expense_id, "expense")?;
        with_tx!(self, |db_tx| {
            let expense = self
                .find_expense(&db_tx, &expense_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
            let group = self.require_group(&db_tx, &expense.group_id).await?;
            if expense.paid_by != user_id && !group.is_admin(user_id) {
                return Err(EngineError::Forbidden(
                    "only the payer or a group admin can delete an expense".to_string(),
                ));
            }

            splits::Entity::delete_many()
                .filter(splits::Column::ExpenseId.eq(expense.id.clone()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_by_id(expense.id.clone())
                .exec(&db_tx)
                .await?;

            tracing::debug!("deleted expense {} from group {}", expense.id, group.id);
            Ok(())
        })
    }
}
