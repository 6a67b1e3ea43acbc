//! Print API handler.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use qbank_core::{PrintError, PrintReceipt, PrintRequest, PrintType};

use super::{error, ApiError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PrintParams {
    /// `html` returns the document itself instead of a JSON summary.
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PrintResponse {
    pub title: String,
    pub item_count: usize,
    pub print_type: PrintType,
    pub generated_at: DateTime<Utc>,
    pub html: String,
    pub receipt: Option<PrintReceipt>,
}

/// POST /api/v1/print
///
/// Render the selected questions. When a print directory is configured
/// the document is also written there.
pub async fn print(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PrintParams>,
    Json(request): Json<PrintRequest>,
) -> Result<Response, ApiError> {
    let session = state.session().lock().await;
    let outcome = session
        .print(&request, state.print_target())
        .await
        .map_err(print_error)?;

    if params.format.as_deref() == Some("html") {
        return Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            outcome.document.html,
        )
            .into_response());
    }

    Ok(Json(PrintResponse {
        title: outcome.document.title,
        item_count: outcome.document.item_count,
        print_type: outcome.document.print_type,
        generated_at: outcome.document.generated_at,
        html: outcome.document.html,
        receipt: outcome.receipt,
    })
    .into_response())
}

fn print_error(e: PrintError) -> ApiError {
    let status = match e {
        PrintError::SelectionEmpty | PrintError::NoPrintType => StatusCode::BAD_REQUEST,
        PrintError::TargetUnavailable(_) => {
            warn!(error = %e, "Print target unavailable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    error(status, e.code(), e.to_string())
}
