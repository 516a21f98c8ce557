//! Error types for the todo service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;
use crate::store::StoreError;

// == Todo Error Enum ==
/// Errors surfaced by the todo service to HTTP callers.
#[derive(Error, Debug)]
pub enum TodoError {
    /// Missing or invalid input
    #[error("{0}")]
    Validation(String),

    /// No record with the given id
    #[error("Todo {0} not found")]
    NotFound(i64),

    /// Path segment that cannot name a record
    #[error("Todo not found: {0}")]
    InvalidId(String),

    /// Mid-run store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            TodoError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            TodoError::NotFound(_) | TodoError::InvalidId(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            TodoError::Store(err) => {
                error!(error = %err, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Startup Error Enum ==
/// Failures that abort process startup.
#[derive(Error, Debug)]
pub enum StartupError {
    /// The store never became reachable within the retry budget
    #[error("store unavailable after {attempts} attempts: {last_error}")]
    StoreUnavailable { attempts: u32, last_error: String },
}

// == Result Type Alias ==
/// Convenience Result type for the todo service.
pub type Result<T> = std::result::Result<T, TodoError>;
