use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use recipebox_shared::Relation;
use recipebox_user::RegisterInput;
use serde::Deserialize;

use crate::{error::AppError, middleware::Auth, routes::AppState};

/// POST /api/users
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user.register(input).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecipesLimit {
    pub recipes_limit: Option<usize>,
}

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    auth: Option<Auth>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = auth.as_ref().map(|a| a.user_id.as_str());

    Ok(Json(state.user.list(viewer).await?))
}

/// GET /api/users/me
pub async fn me(State(state): State<AppState>, auth: Auth) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user
        .view(Some(&auth.user_id), &auth.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(user))
}

/// GET /api/users/{id}
pub async fn detail(
    State(state): State<AppState>,
    auth: Option<Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = auth.as_ref().map(|a| a.user_id.as_str());
    let user = state
        .user
        .view(viewer, id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user))
}

/// GET /api/users/subscriptions
pub async fn subscriptions(
    State(state): State<AppState>,
    auth: Auth,
    Query(params): Query<RecipesLimit>,
) -> Result<impl IntoResponse, AppError> {
    let authors = state
        .user
        .subscriptions()
        .list(&auth.user_id, params.recipes_limit)
        .await?;

    Ok(Json(authors))
}

/// POST /api/users/{id}/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    auth: Auth,
    Path(author_id): Path<String>,
    Query(params): Query<RecipesLimit>,
) -> Result<impl IntoResponse, AppError> {
    let subscriptions = state.user.subscriptions();
    subscriptions.add(&auth.user_id, &author_id).await?;

    let author = subscriptions
        .author(&auth.user_id, &author_id, params.recipes_limit)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok((StatusCode::CREATED, Json(author)))
}

/// DELETE /api/users/{id}/subscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    auth: Auth,
    Path(author_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state
        .user
        .subscriptions()
        .remove(&auth.user_id, &author_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
