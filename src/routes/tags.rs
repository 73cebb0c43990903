use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, routes::AppState};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.recipe.tag.list().await?))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tag = state
        .recipe
        .tag
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("Tag not found"))?;

    Ok(Json(tag))
}
