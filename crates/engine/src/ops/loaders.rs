//! Row loading: joins group members into groups and splits into expenses.

use std::collections::HashMap;

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{Expense, Group, ResultEngine, expenses, group_members, groups, splits};

use super::Engine;

/// Most ids bound into a single `IN (...)` list.
const LOAD_BATCH: usize = 500;

impl Engine {
    pub(super) async fn find_group(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
    ) -> ResultEngine<Option<Group>> {
        let Some(model) = groups::Entity::find_by_id(group_id.to_string())
            .one(db)
            .await?
        else {
            return Ok(None);
        };
        let members = group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group_id.to_string()))
            .order_by_asc(group_members::Column::Position)
            .all(db)
            .await?;
        Ok(Some(Group::from((model, members))))
    }

    /// Loads groups keeping the order of `models`.
    pub(super) async fn groups_with_members(
        &self,
        db: &DatabaseTransaction,
        models: Vec<groups::Model>,
    ) -> ResultEngine<Vec<Group>> {
        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let mut members_by_group: HashMap<String, Vec<group_members::Model>> = HashMap::new();
        for batch in ids.chunks(LOAD_BATCH) {
            for member in group_members::Entity::find()
                .filter(group_members::Column::GroupId.is_in(batch.iter().cloned()))
                .all(db)
                .await?
            {
                members_by_group
                    .entry(member.group_id.clone())
                    .or_default()
                    .push(member);
            }
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let members = members_by_group.remove(&model.id).unwrap_or_default();
                Group::from((model, members))
            })
            .collect())
    }

    pub(super) async fn find_expense(
        &self,
        db: &DatabaseTransaction,
        expense_id: &str,
    ) -> ResultEngine<Option<Expense>> {
        let Some(model) = expenses::Entity::find_by_id(expense_id.to_string())
            .one(db)
            .await?
        else {
            return Ok(None);
        };
        let mut loaded = self.expenses_with_splits(db, vec![model]).await?;
        Ok(loaded.pop())
    }

    /// Loads the splits of every expense in `models`, keeping their order.
    pub(super) async fn expenses_with_splits(
        &self,
        db: &DatabaseTransaction,
        models: Vec<expenses::Model>,
    ) -> ResultEngine<Vec<Expense>> {
        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let mut splits_by_expense: HashMap<String, Vec<splits::Model>> = HashMap::new();
        for batch in ids.chunks(LOAD_BATCH) {
            for split in splits::Entity::find()
                .filter(splits::Column::ExpenseId.is_in(batch.iter().cloned()))
                .all(db)
                .await?
            {
                splits_by_expense
                    .entry(split.expense_id.clone())
                    .or_default()
                    .push(split);
            }
        }

        models
            .into_iter()
            .map(|model| {
                let splits = splits_by_expense.remove(&model.id).unwrap_or_default();
                Expense::try_from((model, splits))
            })
            .collect()
    }
}
