use sea_orm::{Condition, QueryFilter, TransactionTrait, prelude::*, sea_query::Query};

use crate::{
    GroupBalances, ResultEngine, UserSummary, compute_balances, compute_user_summary, expenses,
    sorted_by_balance, splits, util,
};

use super::{Engine, with_tx};

impl Engine {
    /// Per-member balances of a group, highest balance first.
    pub async fn group_balances(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<GroupBalances> {
        let group_id = util::parse_id(group_id, "group")?;
        with_tx!(self, |db_tx| {
            let group = self.require_group_member(&db_tx, &group_id, user_id).await?;
            let models = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group.id.clone()))
                .all(&db_tx)
                .await?;
            let expenses = self.expenses_with_splits(&db_tx, models).await?;

            let balances = compute_balances(group.member_ids(), &expenses)?;
            Ok(GroupBalances {
                group_id: group.id,
                balances: sorted_by_balance(balances),
            })
        })
    }

    /// What `user_id` paid, owes and is owed across every group, including
    /// groups they have since left.
    pub async fn user_summary(&self, user_id: &str) -> ResultEngine<UserSummary> {
        with_tx!(self, |db_tx| {
            let involved = Query::select()
                .column(splits::Column::ExpenseId)
                .from(splits::Entity)
                .and_where(splits::Column::UserId.eq(user_id.to_string()))
                .to_owned();

            let models = expenses::Entity::find()
                .filter(
                    Condition::any()
                        .add(expenses::Column::PaidBy.eq(user_id.to_string()))
                        .add(expenses::Column::Id.in_subquery(involved)),
                )
                .all(&db_tx)
                .await?;
            let expenses = self.expenses_with_splits(&db_tx, models).await?;

            compute_user_summary(user_id, &expenses)
        })
    }
}
