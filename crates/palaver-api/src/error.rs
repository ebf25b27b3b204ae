use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use palaver_types::api::ApiResponse;

/// Every way a request can fail. Absence of data (no contacts yet, no
/// conversation yet) is never an error — those endpoints return empty lists.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("username is already taken")]
    AlreadyExists,

    #[error("no such user")]
    UnknownUser,

    #[error("you cannot add yourself as a contact")]
    SelfReference,

    #[error("message text must not be empty")]
    EmptyText,

    #[error("recipient does not exist")]
    UnknownRecipient,

    /// Unknown username and wrong password share one message so login
    /// does not leak which usernames exist.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("not logged in")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::SelfReference | ApiError::EmptyText => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::UnknownUser | ApiError::UnknownRecipient => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(e) => {
                error!("internal error: {e:#}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (self.status(), Json(ApiResponse::fail(message))).into_response()
    }
}
