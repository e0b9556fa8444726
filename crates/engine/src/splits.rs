//! Expense splits.
//!
//! A [`Split`] is the portion of an [`Expense`](crate::Expense) a single
//! participant owes. Amounts are integer cents, percentages basis points.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, Percentage, SplitStatus};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub user: String,
    pub amount: Money,
    pub percentage: Percentage,
    pub status: SplitStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_id: String,
    pub user_id: String,
    pub amount_minor: i64,
    pub percentage_bp: i64,
    pub status: String,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Split {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            user: model.user_id,
            amount: Money::new(model.amount_minor),
            percentage: Percentage::new(model.percentage_bp),
            status: SplitStatus::try_from(model.status.as_str())?,
        })
    }
}
