use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Query,
};

use crate::{EngineError, Group, ResultEngine, group_members, groups, util};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Create a group. The creator becomes its first member and admin; the
    /// other `members` join as regular members.
    pub async fn new_group(
        &self,
        name: &str,
        description: Option<&str>,
        members: &[String],
        user_id: &str,
    ) -> ResultEngine<Group> {
        let name = normalize_required_name(name, "group name")?;
        let mut group = Group::new(name, normalize_optional_text(description), user_id);

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            for member in util::unique_usernames(members.iter().map(String::as_str)) {
                self.require_user_exists(&db_tx, &member).await?;
                group.add_member(&member);
            }

            groups::ActiveModel::from(&group).insert(&db_tx).await?;
            for member in group.member_models() {
                member.insert(&db_tx).await?;
            }

            tracing::debug!("created group {} ({})", group.name, group.id);
            Ok(group)
        })
    }

    /// Groups `user_id` belongs to, newest first.
    pub async fn groups_for_user(&self, user_id: &str) -> ResultEngine<Vec<Group>> {
        with_tx!(self, |db_tx| {
            let group_ids = Query::select()
                .column(group_members::Column::GroupId)
                .from(group_members::Entity)
                .and_where(group_members::Column::UserId.eq(user_id.to_string()))
                .to_owned();

            let models = groups::Entity::find()
                .filter(groups::Column::Id.in_subquery(group_ids))
                .order_by_desc(groups::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            self.groups_with_members(&db_tx, models).await
        })
    }

    /// A single group, visible to its members only.
    pub async fn group(&self, group_id: &str, user_id: &str) -> ResultEngine<Group> {
        let group_id = util::parse_id(group_id, "group")?;
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, &group_id, user_id).await
        })
    }

    /// Add members to a group (admin-only). Users already in the group are
    /// skipped.
    pub async fn add_group_members(
        &self,
        group_id: &str,
        usernames: &[String],
        user_id: &str,
    ) -> ResultEngine<Group> {
        let group_id = util::parse_id(group_id, "group")?;
        with_tx!(self, |db_tx| {
            let mut group = self.require_group_admin(&db_tx, &group_id, user_id).await?;
            let mut position = group_members::Entity::find()
                .filter(group_members::Column::GroupId.eq(group.id.clone()))
                .order_by_desc(group_members::Column::Position)
                .one(&db_tx)
                .await?
                .map_or(0, |last| last.position + 1);

            for username in util::unique_usernames(usernames.iter().map(String::as_str)) {
                if group.is_member(&username) {
                    continue;
                }
                self.require_user_exists(&db_tx, &username).await?;
                group.add_member(&username);
                group_members::ActiveModel {
                    group_id: ActiveValue::Set(group.id.clone()),
                    user_id: ActiveValue::Set(username.clone()),
                    is_admin: ActiveValue::Set(false),
                    position: ActiveValue::Set(position),
                }
                .insert(&db_tx)
                .await?;
                position += 1;
                tracing::debug!("added {username} to group {}", group.id);
            }

            Ok(group)
        })
    }

    /// Remove a member from a group (admin-only). The creator cannot be
    /// removed.
    pub async fn remove_group_member(
        &self,
        group_id: &str,
        username: &str,
        user_id: &str,
    ) -> ResultEngine<Group> {
        let group_id = util::parse_id(group_id, "group")?;
        with_tx!(self, |db_tx| {
            let mut group = self.require_group_admin(&db_tx, &group_id, user_id).await?;
            if group.creator == username {
                return Err(EngineError::InvalidMember(
                    "cannot remove the group creator".to_string(),
                ));
            }
            if !group.is_member(username) {
                return Err(EngineError::KeyNotFound(format!("member {username}")));
            }

            group_members::Entity::delete_by_id((group.id.clone(), username.to_string()))
                .exec(&db_tx)
                .await?;
            group.members.retain(|m| m.user != username);

            tracing::debug!("removed {username} from group {}", group.id);
            Ok(group)
        })
    }
}
