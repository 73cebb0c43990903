use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use recipebox_shared::Relation;

use crate::{error::AppError, middleware::Auth, routes::AppState};

/// POST /api/recipes/{id}/shopping_cart
pub async fn add(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.shopping.cart.add(&auth.user_id, &id).await?;

    let recipe = state
        .recipe
        .find(Some(&auth.user_id), &id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe not found"))?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// DELETE /api/recipes/{id}/shopping_cart
pub async fn remove(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.shopping.cart.remove(&auth.user_id, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recipes/download_shopping_cart
pub async fn download(
    State(state): State<AppState>,
    auth: Auth,
) -> Result<impl IntoResponse, AppError> {
    let body = state.shopping.download(&auth.user_id).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.config.shopping.filename
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
