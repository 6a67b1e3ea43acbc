pub mod catalog;
pub mod events;
pub mod handlers;
pub mod middleware;
pub mod print;
pub mod routes;
pub mod selection;

pub use routes::create_router;

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// JSON error body shared by every handler.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// Status plus JSON body, usable as the `Err` side of a handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(code, message)))
}
