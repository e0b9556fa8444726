//! The `Group` holds the users sharing expenses. Every expense belongs to
//! exactly one group.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::group_members;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupMember {
    pub user: String,
    pub is_admin: bool,
}

/// A named set of members.
///
/// The creator is always the first member and always an admin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    pub members: Vec<GroupMember>,
}

impl Group {
    pub fn new(name: String, description: Option<String>, creator: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            creator: creator.to_string(),
            created_at: Utc::now(),
            members: vec![GroupMember {
                user: creator.to_string(),
                is_admin: true,
            }],
        }
    }

    /// Appends a regular member. Returns `false` if `user` is already in.
    pub fn add_member(&mut self, user: &str) -> bool {
        if self.is_member(user) {
            return false;
        }
        self.members.push(GroupMember {
            user: user.to_string(),
            is_admin: false,
        });
        true
    }

    pub fn is_member(&self, user: &str) -> bool {
        self.members.iter().any(|m| m.user == user)
    }

    pub fn is_admin(&self, user: &str) -> bool {
        self.members.iter().any(|m| m.user == user && m.is_admin)
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.user.as_str())
    }

    pub(crate) fn member_models(&self) -> Vec<group_members::ActiveModel> {
        self.members
            .iter()
            .enumerate()
            .map(|(position, member)| group_members::ActiveModel {
                group_id: ActiveValue::Set(self.id.clone()),
                user_id: ActiveValue::Set(member.user.clone()),
                is_admin: ActiveValue::Set(member.is_admin),
                position: ActiveValue::Set(position as i32),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub creator: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::group_members::Entity")]
    GroupMembers,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupMembers.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Group> for ActiveModel {
    fn from(group: &Group) -> Self {
        Self {
            id: ActiveValue::Set(group.id.clone()),
            name: ActiveValue::Set(group.name.clone()),
            description: ActiveValue::Set(group.description.clone()),
            creator: ActiveValue::Set(group.creator.clone()),
            created_at: ActiveValue::Set(group.created_at),
        }
    }
}

impl From<(Model, Vec<group_members::Model>)> for Group {
    fn from((model, mut members): (Model, Vec<group_members::Model>)) -> Self {
        members.sort_by_key(|m| m.position);
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            creator: model.creator,
            created_at: model.created_at,
            members: members
                .into_iter()
                .map(|m| GroupMember {
                    user: m.user_id,
                    is_admin: m.is_admin,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creator_is_first_admin() {
        let group = Group::new("Trip".to_string(), None, "alice");
        assert_eq!(group.members.len(), 1);
        assert_eq!(group.members[0].user, "alice");
        assert!(group.is_admin("alice"));
    }

    #[test]
    fn add_member_skips_duplicates() {
        let mut group = Group::new("Trip".to_string(), None, "alice");
        assert!(group.add_member("bob"));
        assert!(!group.add_member("bob"));
        assert!(!group.add_member("alice"));
        assert_eq!(group.member_ids().collect::<Vec<_>>(), vec!["alice", "bob"]);
        assert!(group.is_member("bob"));
        assert!(!group.is_admin("bob"));
    }
}
