use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Shift {shift_id} is already canceled")]
    AlreadyCanceled { shift_id: Uuid },

    #[error("Shift {shift_id} cannot be booked in its current status")]
    CannotBook { shift_id: Uuid },

    #[error("Shift {shift_id} is the last active shift of its job and cannot be canceled")]
    LastShiftProtected { shift_id: Uuid },

    #[error("No shifts found for talent {talent_id}")]
    ShiftsForTalentNotFound { talent_id: Uuid },

    #[error("Talent {talent_id} has no active shifts")]
    NoAvailableShift { talent_id: Uuid },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::ShiftsForTalentNotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Error::AlreadyCanceled { .. }
            | Error::CannotBook { .. }
            | Error::LastShiftProtected { .. }
            | Error::NoAvailableShift { .. } => (StatusCode::CONFLICT, self.to_string()),
            Error::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
