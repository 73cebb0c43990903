use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use sqlx::SqlitePool;

mod health;
mod ingredients;
mod recipes;
mod shopping;
mod tags;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub user: recipebox_user::Command,
    pub recipe: recipebox_recipe::Command,
    pub shopping: recipebox_shopping::Command,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: crate::config::Config, state: recipebox_shared::State) -> Self {
        Self {
            user: recipebox_user::Command::new(state.clone()),
            recipe: recipebox_recipe::Command::with_limits(state.clone(), config.recipe.limits()),
            shopping: recipebox_shopping::Command::new(state.clone()),
            pool: state.read_db,
            config,
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/users", get(users::list).post(users::register))
        .route("/users/me", get(users::me))
        .route("/users/subscriptions", get(users::subscriptions))
        .route("/users/{id}", get(users::detail))
        .route(
            "/users/{id}/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        )
        .route("/ingredients", get(ingredients::list))
        .route("/ingredients/{id}", get(ingredients::detail))
        .route("/tags", get(tags::list))
        .route("/tags/{id}", get(tags::detail))
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/download_shopping_cart",
            get(shopping::download),
        )
        .route(
            "/recipes/{id}",
            get(recipes::detail)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .route(
            "/recipes/{id}/favorite",
            post(recipes::favorite).delete(recipes::unfavorite),
        )
        .route(
            "/recipes/{id}/shopping_cart",
            post(shopping::add).delete(shopping::remove),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            crate::middleware::auth_middleware,
        ))
        .with_state(app_state.clone());

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .nest("/api", api)
}
