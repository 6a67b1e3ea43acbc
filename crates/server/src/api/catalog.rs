//! Catalog API handlers: filters, the filtered view, stats, cache control
//! and the image viewer.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use qbank_core::{Difficulty, FilterState, Item, LoadOutcome, Session, SessionStats};

use super::{error, ApiError, SuccessResponse};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Filter update. Missing or blank fields clear that filter.
#[derive(Debug, Default, Deserialize)]
pub struct FilterUpdate {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub filters: FilterState,
    /// Topic choices for the selected subject.
    pub topics: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub item: Item,
    pub selected: bool,
    pub question_url: String,
    pub mark_scheme_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogViewResponse {
    pub filters: FilterState,
    pub items: Vec<CatalogEntry>,
    pub visible: usize,
    pub total: usize,
    pub selected: usize,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub load: LoadOutcome,
    #[serde(flatten)]
    pub view: CatalogViewResponse,
}

#[derive(Debug, Serialize)]
pub struct ViewerResponse {
    pub path: Option<String>,
    pub url: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/filters
pub async fn get_filters(State(state): State<Arc<AppState>>) -> Json<FiltersResponse> {
    let session = state.session().lock().await;
    Json(filters_response(&session))
}

/// PUT /api/v1/filters
///
/// Replace the filters and load the catalog for them.
pub async fn put_filters(
    State(state): State<Arc<AppState>>,
    Json(update): Json<FilterUpdate>,
) -> Result<Json<LoadResponse>, ApiError> {
    let difficulty = parse_difficulty(update.difficulty.as_deref())?;
    let filters = FilterState {
        subject: update.subject,
        year: update.year,
        topic: update.topic,
        difficulty,
    };

    let mut session = state.session().lock().await;
    session.set_filters(filters);
    let load = session.load_for_current_filters().await;

    Ok(Json(LoadResponse {
        load,
        view: view_response(&session),
    }))
}

/// GET /api/v1/catalog
///
/// Items matching the current filters.
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogViewResponse> {
    let session = state.session().lock().await;
    Json(view_response(&session))
}

/// GET /api/v1/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<SessionStats> {
    let session = state.session().lock().await;
    Json(session.stats())
}

/// POST /api/v1/cache/clear
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    state.session().lock().await.clear_cache();
    Json(SuccessResponse {
        message: "Cache cleared - next load will scan".to_string(),
    })
}

/// POST /api/v1/refresh
///
/// Forget discovered questions and scan the current filters again.
pub async fn refresh(State(state): State<Arc<AppState>>) -> Json<LoadResponse> {
    let mut session = state.session().lock().await;
    let load = session.force_refresh().await;
    info!(outcome = ?load, "Refresh completed");
    Json(LoadResponse {
        load,
        view: view_response(&session),
    })
}

/// GET /api/v1/viewer
pub async fn get_viewer(State(state): State<Arc<AppState>>) -> Json<ViewerResponse> {
    let session = state.session().lock().await;
    let path = session.viewer().map(str::to_string);
    Json(ViewerResponse {
        url: path.as_deref().map(|p| session.asset_url(p)),
        path,
    })
}

// ============================================================================
// Helpers
// ============================================================================

pub(crate) fn parse_difficulty(raw: Option<&str>) -> Result<Option<Difficulty>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<Difficulty>().map(Some).map_err(|_| {
            error(
                StatusCode::BAD_REQUEST,
                "invalid_difficulty",
                format!("Unknown difficulty: {}", value),
            )
        }),
    }
}

pub(crate) fn filters_response(session: &Session) -> FiltersResponse {
    FiltersResponse {
        filters: session.filters().clone(),
        topics: session.topics_for_current_subject().to_vec(),
    }
}

pub(crate) fn view_response(session: &Session) -> CatalogViewResponse {
    let view = session.view();
    let items: Vec<CatalogEntry> = view
        .into_iter()
        .map(|item| CatalogEntry {
            selected: session.selection().contains(&item.question_path),
            question_url: session.asset_url(&item.question_path),
            mark_scheme_url: item
                .has_mark_scheme
                .then(|| session.asset_url(&item.mark_scheme_path)),
            item,
        })
        .collect();

    CatalogViewResponse {
        filters: session.filters().clone(),
        visible: items.len(),
        total: session.catalog().len(),
        selected: session.selection().size(),
        items,
    }
}
