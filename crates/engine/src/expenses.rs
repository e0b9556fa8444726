//! Expense primitives.
//!
//! An `Expense` is paid by one member on behalf of the group and divided
//! among participants via its [`Split`]s.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, Split, SplitType, splits};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub group_id: String,
    pub description: String,
    pub amount: Money,
    pub paid_by: String,
    pub occurred_at: DateTime<Utc>,
    pub split_type: SplitType,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub splits: Vec<Split>,
}

impl Expense {
    pub fn new(
        group_id: String,
        description: String,
        amount: Money,
        paid_by: String,
        occurred_at: DateTime<Utc>,
        split_type: SplitType,
        notes: Option<String>,
        splits: Vec<Split>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            group_id,
            description,
            amount,
            paid_by,
            occurred_at,
            split_type,
            notes,
            created_at: Utc::now(),
            splits,
        }
    }

    pub(crate) fn split_models(&self) -> Vec<splits::ActiveModel> {
        self.splits
            .iter()
            .enumerate()
            .map(|(position, split)| splits::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                expense_id: ActiveValue::Set(self.id.clone()),
                user_id: ActiveValue::Set(split.user.clone()),
                amount_minor: ActiveValue::Set(split.amount.cents()),
                percentage_bp: ActiveValue::Set(split.percentage.basis_points()),
                status: ActiveValue::Set(split.status.as_str().to_string()),
                position: ActiveValue::Set(position as i32),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub description: String,
    pub amount_minor: i64,
    pub paid_by: String,
    pub occurred_at: DateTimeUtc,
    pub split_type: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
    #[sea_orm(has_many = "super::splits::Entity")]
    Splits,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.clone()),
            group_id: ActiveValue::Set(expense.group_id.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            paid_by: ActiveValue::Set(expense.paid_by.clone()),
            occurred_at: ActiveValue::Set(expense.occurred_at),
            split_type: ActiveValue::Set(expense.split_type.as_str().to_string()),
            notes: ActiveValue::Set(expense.notes.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<(Model, Vec<splits::Model>)> for Expense {
    type Error = EngineError;

    fn try_from((model, mut split_models): (Model, Vec<splits::Model>)) -> ResultEngine<Self> {
        split_models.sort_by_key(|s| s.position);
        Ok(Self {
            id: model.id,
            group_id: model.group_id,
            description: model.description,
            amount: Money::new(model.amount_minor),
            paid_by: model.paid_by,
            occurred_at: model.occurred_at,
            split_type: SplitType::try_from(model.split_type.as_str()).map_err(|_| {
                EngineError::InvalidData(format!("split type {:?}", model.split_type))
            })?,
            notes: model.notes,
            created_at: model.created_at,
            splits: split_models
                .into_iter()
                .map(Split::try_from)
                .collect::<ResultEngine<Vec<_>>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(split_type: &str) -> Model {
        Model {
            id: "e1".to_string(),
            group_id: "g1".to_string(),
            description: "Taxi".to_string(),
            amount_minor: 12_00,
            paid_by: "alice".to_string(),
            occurred_at: Utc::now(),
            split_type: split_type.to_string(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn split_model(user: &str, position: i32, status: &str) -> splits::Model {
        splits::Model {
            id: format!("s{position}"),
            expense_id: "e1".to_string(),
            user_id: user.to_string(),
            amount_minor: 6_00,
            percentage_bp: 50_00,
            status: status.to_string(),
            position,
        }
    }

    #[test]
    fn rows_load_in_position_order() {
        let expense = Expense::try_from((
            model("equal"),
            vec![split_model("bob", 1, "settled"), split_model("alice", 0, "pending")],
        ))
        .unwrap();
        assert_eq!(expense.split_type, SplitType::Equal);
        let users: Vec<_> = expense.splits.iter().map(|s| s.user.as_str()).collect();
        assert_eq!(users, ["alice", "bob"]);
        assert!(expense.splits[1].status.is_settled());
    }

    #[test]
    fn corrupt_rows_are_data_errors() {
        let err = Expense::try_from((model("shares"), Vec::new())).unwrap_err();
        assert_eq!(err, EngineError::InvalidData("split type \"shares\"".to_string()));

        let err = Expense::try_from((model("exact"), vec![split_model("bob", 0, "paid")]))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidData(_)));
    }
}
