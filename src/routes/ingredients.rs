use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{error::AppError, routes::AppState};

#[derive(Deserialize)]
pub struct ListQuery {
    name: Option<String>,
}

/// GET /api/ingredients?name=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ingredients = state.recipe.ingredient.list(query.name.as_deref()).await?;

    Ok(Json(ingredients))
}

/// GET /api/ingredients/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let ingredient = state
        .recipe
        .ingredient
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("Ingredient not found"))?;

    Ok(Json(ingredient))
}
