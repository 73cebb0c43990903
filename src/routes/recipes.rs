use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::Query;
use recipebox_recipe::{RecipeFilter, RecipeInput, RecipeView};
use recipebox_shared::Relation;

use crate::{error::AppError, middleware::Auth, routes::AppState};

async fn load(state: &AppState, viewer: &str, id: &str) -> Result<RecipeView, AppError> {
    state
        .recipe
        .find(Some(viewer), id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe not found"))
}

/// GET /api/recipes
pub async fn list(
    State(state): State<AppState>,
    auth: Option<Auth>,
    Query(filter): Query<RecipeFilter>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = auth.as_ref().map(|a| a.user_id.as_str());
    let recipes = state.recipe.list(viewer, filter).await?;

    Ok(Json(recipes))
}

/// POST /api/recipes
pub async fn create(
    State(state): State<AppState>,
    auth: Auth,
    Json(input): Json<RecipeInput>,
) -> Result<impl IntoResponse, AppError> {
    let id = state.recipe.create(&auth.user_id, input).await?;

    Ok((StatusCode::CREATED, Json(load(&state, &auth.user_id, &id).await?)))
}

/// GET /api/recipes/{id}
pub async fn detail(
    State(state): State<AppState>,
    auth: Option<Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = auth.as_ref().map(|a| a.user_id.as_str());
    let recipe = state
        .recipe
        .find(viewer, id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe not found"))?;

    Ok(Json(recipe))
}

/// PATCH /api/recipes/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<String>,
    Json(input): Json<RecipeInput>,
) -> Result<impl IntoResponse, AppError> {
    state.recipe.update(&auth.user_id, &id, input).await?;

    Ok(Json(load(&state, &auth.user_id, &id).await?))
}

/// DELETE /api/recipes/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.recipe.delete(&auth.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/{id}/favorite
pub async fn favorite(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.recipe.favorite.add(&auth.user_id, &id).await?;

    Ok((StatusCode::CREATED, Json(load(&state, &auth.user_id, &id).await?)))
}

/// DELETE /api/recipes/{id}/favorite
pub async fn unfavorite(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.recipe.favorite.remove(&auth.user_id, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
