use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use qbank_core::{topics_for_subject, Difficulty, SanitizedConfig, SUBJECTS, YEARS};

use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// Choices offered by the four filter selectors.
#[derive(Serialize)]
pub struct TaxonomyResponse {
    pub subjects: Vec<&'static str>,
    pub years: Vec<&'static str>,
    pub difficulties: Vec<Difficulty>,
    pub topics: BTreeMap<&'static str, Vec<&'static str>>,
}

pub async fn get_taxonomy() -> Json<TaxonomyResponse> {
    Json(TaxonomyResponse {
        subjects: SUBJECTS.to_vec(),
        years: YEARS.to_vec(),
        difficulties: Difficulty::ALL.to_vec(),
        topics: SUBJECTS
            .iter()
            .map(|subject| (*subject, topics_for_subject(subject).to_vec()))
            .collect(),
    })
}

/// GET /api/v1/metrics
///
/// Prometheus text exposition.
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state).await;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
