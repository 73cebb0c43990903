use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] recipebox_shared::Error),

    #[error("Authentication credentials were not provided")]
    Unauthorized,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.into())
    }
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::Domain(recipebox_shared::Error::NotFound(msg.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        use recipebox_shared::Error;

        let (status_code, message) = match self {
            AppError::Domain(Error::Validate(e)) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Domain(Error::Invalid(msg)) => (StatusCode::BAD_REQUEST, msg),
            AppError::Domain(Error::NotFound(msg)) => (StatusCode::NOT_FOUND, msg),
            AppError::Domain(Error::Forbidden(msg)) => (StatusCode::FORBIDDEN, msg),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided".to_string(),
            ),
            AppError::Domain(Error::Unknown(e)) | AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred. Please try again later.".to_string(),
                )
            }
        };

        (status_code, Json(json!({ "errors": message }))).into_response()
    }
}
