//! UI event endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use qbank_core::{dispatch, EventError, EventOutcome, UiEvent};

use super::{error, ApiError};
use crate::state::AppState;

/// POST /api/v1/events
///
/// Apply one UI event to the session.
pub async fn post_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<UiEvent>,
) -> Result<Json<EventOutcome>, ApiError> {
    let mut session = state.session().lock().await;
    match dispatch(&mut session, event).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e @ EventError::InvalidDifficulty(_)) => {
            warn!(error = %e, "Rejected UI event");
            Err(error(StatusCode::BAD_REQUEST, "invalid_difficulty", e.to_string()))
        }
    }
}
