use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the non-auth endpoints.
///
/// Validation problems carry their message to the client; database failures
/// are logged and surfaced generically. Notification failures never appear
/// here at all: email and PDF problems are swallowed by design.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("User ID is required for booking")]
    MissingUserId,
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingUserId | ApiError::Validation(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Database(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}
