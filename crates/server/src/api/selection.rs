//! Selection API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use qbank_core::Session;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SelectRequest {
    /// Question paths to add.
    #[serde(default)]
    pub paths: Vec<String>,
    /// Also add everything in the current view.
    #[serde(default)]
    pub visible: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeselectParams {
    /// Only drop items in the current view instead of clearing everything.
    #[serde(default)]
    pub visible: bool,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub paths: Vec<String>,
    pub count: usize,
    /// Selected paths that resolve to a catalog item.
    pub resolved: usize,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub path: String,
    pub selected: bool,
    pub count: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/selection
pub async fn get_selection(State(state): State<Arc<AppState>>) -> Json<SelectionResponse> {
    let session = state.session().lock().await;
    Json(selection_response(&session))
}

/// POST /api/v1/selection
pub async fn add_selection(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectRequest>,
) -> Json<SelectionResponse> {
    let mut session = state.session().lock().await;
    for path in &request.paths {
        session.select(path);
    }
    if request.visible {
        session.select_all_visible();
    }
    Json(selection_response(&session))
}

/// DELETE /api/v1/selection[?visible=true]
pub async fn remove_selection(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeselectParams>,
) -> Json<SelectionResponse> {
    let mut session = state.session().lock().await;
    if params.visible {
        session.deselect_all_visible();
    } else {
        session.clear_selection();
    }
    Json(selection_response(&session))
}

/// POST /api/v1/selection/toggle
pub async fn toggle_selection(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToggleRequest>,
) -> Json<ToggleResponse> {
    let mut session = state.session().lock().await;
    let selected = session.toggle_selection(&request.path);
    Json(ToggleResponse {
        path: request.path,
        selected,
        count: session.selection().size(),
    })
}

fn selection_response(session: &Session) -> SelectionResponse {
    SelectionResponse {
        paths: session.selection().ids().map(str::to_string).collect(),
        count: session.selection().size(),
        resolved: session.selected_items().len(),
    }
}
