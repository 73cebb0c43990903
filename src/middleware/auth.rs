use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, routes::AppState};

/// Header set by the upstream authentication gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Auth extension containing the caller's user id
#[derive(Clone, Debug)]
pub struct Auth {
    pub user_id: String,
}

/// Resolves the caller from the gateway header
///
/// Requests without the header pass through anonymously. A header naming an
/// unknown user is rejected with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(value) = req.headers().get(USER_ID_HEADER) else {
        return next.run(req).await;
    };

    let Ok(user_id) = value.to_str().map(str::to_owned) else {
        tracing::warn!("Malformed {USER_ID_HEADER} header");
        return AppError::Unauthorized.into_response();
    };

    match state.user.find(&user_id).await {
        Ok(Some(_)) => {
            req.extensions_mut().insert(Auth { user_id });
            next.run(req).await
        }
        Ok(None) => {
            tracing::warn!("User {} not found", user_id);
            AppError::Unauthorized.into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Auth>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for Auth {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Auth>().cloned())
    }
}
