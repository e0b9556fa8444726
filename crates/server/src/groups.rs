//! Group endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use api_types::group::{GroupDetailResponse, GroupNew, GroupView, GroupsResponse, MembersAdd};

use crate::{ServerError, server::ServerState, user, views};

pub async fn group_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let group = state
        .engine
        .new_group(
            &payload.name,
            payload.description.as_deref(),
            &payload.members,
            &user.username,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(views::group_view(group))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GroupsResponse>, ServerError> {
    let groups = state
        .engine
        .groups_for_user(&user.username)
        .await?
        .into_iter()
        .map(views::group_view)
        .collect();
    Ok(Json(GroupsResponse { groups }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupDetailResponse>, ServerError> {
    let group = state.engine.group(&group_id, &user.username).await?;
    let expenses = state
        .engine
        .group_expenses(&group.id, &user.username)
        .await?
        .into_iter()
        .map(views::expense_view)
        .collect();

    Ok(Json(GroupDetailResponse {
        group: views::group_view(group),
        expenses,
    }))
}

pub async fn add_members(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<MembersAdd>,
) -> Result<Json<GroupView>, ServerError> {
    if payload.members.is_empty() {
        return Err(ServerError::Generic("no members given".to_string()));
    }
    let group = state
        .engine
        .add_group_members(&group_id, &payload.members, &user.username)
        .await?;
    Ok(Json(views::group_view(group)))
}

pub async fn remove_member(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((group_id, username)): Path<(String, String)>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state
        .engine
        .remove_group_member(&group_id, &username, &user.username)
        .await?;
    Ok(Json(views::group_view(group)))
}
