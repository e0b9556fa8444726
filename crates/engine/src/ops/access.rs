use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{EngineError, Expense, Group, ResultEngine, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_group(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
    ) -> ResultEngine<Group> {
        self.find_group(db, group_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))
    }

    /// Returns the group if `user_id` is one of its members.
    pub(super) async fn require_group_member(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Group> {
        let group = self.require_group(db, group_id).await?;
        if !group.is_member(user_id) {
            return Err(EngineError::Forbidden(
                "not a member of this group".to_string(),
            ));
        }
        Ok(group)
    }

    /// Returns the group if `user_id` is one of its admins.
    pub(super) async fn require_group_admin(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Group> {
        let group = self.require_group(db, group_id).await?;
        if !group.is_admin(user_id) {
            return Err(EngineError::Forbidden(
                "only group admins can manage members".to_string(),
            ));
        }
        Ok(group)
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound(format!("user {username}")));
        }
        Ok(())
    }

    /// Returns the expense together with its group, provided `user_id` is a
    /// member of that group.
    pub(super) async fn require_expense_read(
        &self,
        db: &DatabaseTransaction,
        expense_id: &str,
        user_id: &str,
    ) -> ResultEngine<(Expense, Group)> {
        let expense = self
            .find_expense(db, expense_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        let group = self
            .require_group_member(db, &expense.group_id, user_id)
            .await?;
        Ok((expense, group))
    }
}
