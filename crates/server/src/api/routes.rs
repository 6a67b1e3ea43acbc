use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::{catalog, events, handlers, middleware::metrics_middleware, print, selection};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let asset_root = state.asset_root().map(|p| p.to_path_buf());

    // API routes
    let api_routes = Router::new()
        // Health, config and observability
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/taxonomy", get(handlers::get_taxonomy))
        .route("/metrics", get(handlers::get_metrics))
        // Filters and catalog view
        .route(
            "/filters",
            get(catalog::get_filters).put(catalog::put_filters),
        )
        .route("/catalog", get(catalog::get_catalog))
        .route("/stats", get(catalog::get_stats))
        .route("/cache/clear", post(catalog::clear_cache))
        .route("/refresh", post(catalog::refresh))
        .route("/viewer", get(catalog::get_viewer))
        // Selection
        .route(
            "/selection",
            get(selection::get_selection)
                .post(selection::add_selection)
                .delete(selection::remove_selection),
        )
        .route("/selection/toggle", post(selection::toggle_selection))
        // UI events
        .route("/events", post(events::post_event))
        // Print
        .route("/print", post(print::print))
        .with_state(state);

    let router = Router::new().nest("/api/v1", api_routes);

    // Serve the asset tree (questions/, mark-schemes/, index.html) when local
    let router = match asset_root {
        Some(root) => router.fallback_service(ServeDir::new(root)),
        None => router,
    };

    router
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
