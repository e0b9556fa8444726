use axum::{
    Extension, Json,
    extract::{Path, State},
};

use api_types::balance::{BalancesResponse, UserSummaryView};

use crate::{ServerError, server::ServerState, user, views};

pub async fn group_balances(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<BalancesResponse>, ServerError> {
    let report = state
        .engine
        .group_balances(&group_id, &user.username)
        .await?;
    Ok(Json(views::balances_response(report)))
}

/// The caller's position across all of their groups.
pub async fn user_summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<UserSummaryView>, ServerError> {
    let summary = state.engine.user_summary(&user.username).await?;
    Ok(Json(views::summary_view(summary)))
}
