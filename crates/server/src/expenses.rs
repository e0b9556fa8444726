//! Expense endpoints, including settlement.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use api_types::expense::{ExpenseNew, ExpenseView, ExpensesResponse, SettleSplit};
use engine::{Money, NewExpense};

use crate::{ServerError, server::ServerState, user, views};

pub async fn expense_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let input = NewExpense {
        group_id: payload.group_id,
        description: payload.description,
        amount: Money::new(payload.amount_minor),
        split_type: views::split_type_input(payload.split_type),
        participants: payload
            .splits
            .map(|splits| splits.into_iter().map(views::split_input).collect()),
        notes: payload.notes,
        occurred_at: payload.occurred_at.map(|at| at.with_timezone(&Utc)),
    };

    let expense = state.engine.new_expense(input, &user.username).await?;
    Ok((StatusCode::CREATED, Json(views::expense_view(expense))))
}

pub async fn list_for_group(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let expenses = state
        .engine
        .group_expenses(&group_id, &user.username)
        .await?
        .into_iter()
        .map(views::expense_view)
        .collect();
    Ok(Json(ExpensesResponse { expenses }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<String>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(&expense_id, &user.username).await?;
    Ok(Json(views::expense_view(expense)))
}

/// Settling an already settled split answers with the unchanged expense.
pub async fn settle(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SettleSplit>,
) -> Result<Json<ExpenseView>, ServerError> {
    let (expense, outcome) = state
        .engine
        .settle_split(&payload.expense_id, &payload.user, &user.username)
        .await?;
    if !outcome.changed() {
        tracing::debug!(
            "split of {} in expense {} was already settled",
            payload.user,
            expense.id
        );
    }
    Ok(Json(views::expense_view(expense)))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_expense(&expense_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
