//! HTTP surface tests against an in-process router with mock dependencies.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tempfile::TempDir;

use common::{fixtures, TestConfig, TestFixture};
use qbank_core::Difficulty;

const OPTICS_EASY_1: &str = "questions/Physics/2021/Optics/Easy/q1.jpeg";
const OPTICS_EASY_2: &str = "questions/Physics/2021/Optics/Easy/q2.jpeg";

/// `assets.base_url` when nothing overrides it.
const DEFAULT_ASSET_HOST: &str = "http://127.0.0.1:8000";

/// Fixture where two Physics 2021 questions exist, loaded through the filters.
async fn loaded_fixture(config: TestConfig) -> TestFixture {
    let fixture = TestFixture::with_config(config);
    fixture.prober.add_existing(OPTICS_EASY_1);
    fixture.prober.add_existing(OPTICS_EASY_2);

    let response = fixture
        .put(
            "/api/v1/filters",
            json!({ "subject": "Physics", "year": "2021" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    fixture
}

// ============================================================================
// Health, config, taxonomy
// ============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/config").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["server"]["host"], "127.0.0.1");
    assert_eq!(response.body["assets"]["serving_local_assets"], false);
    assert!(response.body["assets"].get("root_dir").is_none());
}

#[tokio::test]
async fn test_taxonomy_lists_filter_choices() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/taxonomy").await;

    assert_eq!(response.status, StatusCode::OK);
    let subjects = response.body["subjects"].as_array().unwrap();
    assert!(subjects.contains(&json!("Physics")));
    assert_eq!(response.body["years"][0], "2020");
    assert_eq!(response.body["difficulties"], json!(["Easy", "Medium", "Hard"]));
    let optics = response.body["topics"]["Physics"].as_array().unwrap();
    assert!(optics.contains(&json!("Optics")));
}

// ============================================================================
// Filters and catalog
// ============================================================================

#[tokio::test]
async fn test_filters_without_year_require_selection() {
    let fixture = TestFixture::new();
    let response = fixture
        .put("/api/v1/filters", json!({ "subject": "Physics" }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["load"]["outcome"], "selection_required");
    assert_eq!(response.body["visible"], 0);
    assert_eq!(fixture.prober.probe_count(), 0);
}

#[tokio::test]
async fn test_filters_scan_then_serve_from_cache() {
    let fixture = loaded_fixture(TestConfig::default()).await;
    let probes_after_scan = fixture.prober.probe_count();
    assert!(probes_after_scan > 0);

    let catalog = fixture.get("/api/v1/catalog").await;
    assert_eq!(catalog.body["visible"], 2);
    assert_eq!(catalog.body["total"], 2);
    assert_eq!(catalog.body["items"][0]["question_path"], OPTICS_EASY_1);
    assert_eq!(
        catalog.body["items"][0]["question_url"],
        format!("{}/{}", DEFAULT_ASSET_HOST, OPTICS_EASY_1)
    );
    assert!(catalog.body["items"][0]["mark_scheme_url"].is_null());

    let again = fixture
        .put(
            "/api/v1/filters",
            json!({ "subject": "Physics", "year": "2021" }),
        )
        .await;
    assert_eq!(again.body["load"]["outcome"], "from_cache");
    assert_eq!(again.body["load"]["count"], 2);
    assert_eq!(fixture.prober.probe_count(), probes_after_scan);
}

#[tokio::test]
async fn test_filters_narrowing_uses_scanned_pair() {
    let fixture = loaded_fixture(TestConfig::default()).await;
    let probes = fixture.prober.probe_count();

    let response = fixture
        .put(
            "/api/v1/filters",
            json!({ "subject": "Physics", "year": "2021", "difficulty": "Hard" }),
        )
        .await;

    assert_eq!(response.body["load"]["outcome"], "already_scanned");
    assert_eq!(response.body["visible"], 0);
    assert_eq!(response.body["total"], 2);
    assert_eq!(fixture.prober.probe_count(), probes);
}

#[tokio::test]
async fn test_filters_invalid_difficulty() {
    let fixture = TestFixture::new();
    let response = fixture
        .put(
            "/api/v1/filters",
            json!({ "subject": "Physics", "year": "2021", "difficulty": "Impossible" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "invalid_difficulty");
}

#[tokio::test]
async fn test_get_filters_lists_topics_for_subject() {
    let fixture = TestFixture::new();
    fixture
        .put("/api/v1/filters", json!({ "subject": "Physics" }))
        .await;

    let response = fixture.get("/api/v1/filters").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["filters"]["subject"], "Physics");
    let topics = response.body["topics"].as_array().unwrap();
    assert!(topics.contains(&json!("Optics")));
}

#[tokio::test]
async fn test_companion_probe_sets_mark_scheme_url() {
    let fixture = TestFixture::with_config(TestConfig {
        probe_companions: true,
        ..Default::default()
    });
    let item = fixtures::item("Physics", "2021", "Optics", Difficulty::Easy, 1);
    fixture.prober.add_existing(&item.question_path);
    fixture.prober.add_existing(&item.mark_scheme_path);

    let response = fixture
        .put(
            "/api/v1/filters",
            json!({ "subject": "Physics", "year": "2021" }),
        )
        .await;

    assert_eq!(response.body["items"][0]["has_mark_scheme"], true);
    assert_eq!(
        response.body["items"][0]["mark_scheme_url"],
        format!("{}/{}", DEFAULT_ASSET_HOST, item.mark_scheme_path)
    );
}

#[tokio::test]
async fn test_stats_reports_cache() {
    let fixture = loaded_fixture(TestConfig::default()).await;
    let response = fixture.get("/api/v1/stats").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_items"], 2);
    assert_eq!(response.body["cache"]["entries"], 1);
    assert_eq!(response.body["cache"]["scanned_combinations"], 1);
}

#[tokio::test]
async fn test_clear_cache_forces_next_scan() {
    let fixture = loaded_fixture(TestConfig::default()).await;
    let probes = fixture.prober.probe_count();

    let cleared = fixture.post("/api/v1/cache/clear", json!({})).await;
    assert_eq!(cleared.status, StatusCode::OK);

    let response = fixture
        .put(
            "/api/v1/filters",
            json!({ "subject": "Physics", "year": "2021" }),
        )
        .await;
    assert_eq!(response.body["load"]["outcome"], "scanned");
    assert_eq!(fixture.prober.probe_count(), probes * 2);
}

#[tokio::test]
async fn test_refresh_drops_vanished_items() {
    let fixture = loaded_fixture(TestConfig::default()).await;
    fixture.prober.remove_existing(OPTICS_EASY_2);

    let response = fixture.post("/api/v1/refresh", json!({})).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["load"]["outcome"], "scanned");
    assert_eq!(response.body["load"]["found"], 1);
    assert_eq!(response.body["total"], 1);
}

// ============================================================================
// Selection
// ============================================================================

#[tokio::test]
async fn test_selection_add_toggle_and_clear() {
    let fixture = loaded_fixture(TestConfig::default()).await;

    let added = fixture
        .post("/api/v1/selection", json!({ "paths": [OPTICS_EASY_1] }))
        .await;
    assert_eq!(added.body["count"], 1);
    assert_eq!(added.body["resolved"], 1);

    let catalog = fixture.get("/api/v1/catalog").await;
    assert_eq!(catalog.body["items"][0]["selected"], true);
    assert_eq!(catalog.body["items"][1]["selected"], false);
    assert_eq!(catalog.body["selected"], 1);

    let toggled = fixture
        .post("/api/v1/selection/toggle", json!({ "path": OPTICS_EASY_1 }))
        .await;
    assert_eq!(toggled.body["selected"], false);
    assert_eq!(toggled.body["count"], 0);

    fixture
        .post("/api/v1/selection", json!({ "visible": true }))
        .await;
    let cleared = fixture.delete("/api/v1/selection").await;
    assert_eq!(cleared.body["count"], 0);
}

#[tokio::test]
async fn test_deselect_visible_keeps_hidden_selection() {
    let fixture = loaded_fixture(TestConfig::default()).await;
    fixture
        .post("/api/v1/selection", json!({ "visible": true }))
        .await;

    // Narrow the view to nothing; deselecting it leaves hidden picks alone.
    fixture
        .put(
            "/api/v1/filters",
            json!({ "subject": "Physics", "year": "2021", "difficulty": "Hard" }),
        )
        .await;
    let response = fixture.delete("/api/v1/selection?visible=true").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 2);
}

#[tokio::test]
async fn test_selection_counts_unresolved_paths() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/selection",
            json!({ "paths": ["questions/Nowhere/2020/General/Easy/q1.jpeg"] }),
        )
        .await;

    assert_eq!(response.body["count"], 1);
    assert_eq!(response.body["resolved"], 0);
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn test_events_drive_the_session() {
    let fixture = TestFixture::new();
    fixture.prober.add_existing(OPTICS_EASY_1);

    let subject = fixture
        .post(
            "/api/v1/events",
            json!({ "type": "subject_changed", "value": "Physics" }),
        )
        .await;
    assert_eq!(subject.status, StatusCode::OK);
    assert_eq!(subject.body["kind"], "loaded");
    assert_eq!(subject.body["load"]["outcome"], "selection_required");

    let year = fixture
        .post(
            "/api/v1/events",
            json!({ "type": "year_changed", "value": "2021" }),
        )
        .await;
    assert_eq!(year.body["load"]["outcome"], "scanned");
    assert_eq!(year.body["visible"], 1);

    let selected = fixture
        .post("/api/v1/events", json!({ "type": "select_all_visible" }))
        .await;
    assert_eq!(selected.body["kind"], "selection_changed");
    assert_eq!(selected.body["selected"], 1);

    let viewer = fixture
        .post(
            "/api/v1/events",
            json!({ "type": "open_viewer", "path": OPTICS_EASY_1 }),
        )
        .await;
    assert_eq!(viewer.body["kind"], "viewer_changed");

    let current = fixture.get("/api/v1/viewer").await;
    assert_eq!(current.body["path"], OPTICS_EASY_1);
    assert_eq!(current.body["url"], format!("{}/{}", DEFAULT_ASSET_HOST, OPTICS_EASY_1));

    fixture
        .post("/api/v1/events", json!({ "type": "close_viewer" }))
        .await;
    let closed = fixture.get("/api/v1/viewer").await;
    assert!(closed.body["path"].is_null());
}

#[tokio::test]
async fn test_events_reject_invalid_difficulty() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/events",
            json!({ "type": "difficulty_changed", "value": "Brutal" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "invalid_difficulty");
}

#[tokio::test]
async fn test_events_reject_malformed_json() {
    let fixture = TestFixture::new();
    let response = fixture.post_raw("/api/v1/events", "{not json").await;

    assert!(response.status.is_client_error());
}

// ============================================================================
// Print
// ============================================================================

#[tokio::test]
async fn test_print_with_empty_selection() {
    let fixture = TestFixture::new();
    let response = fixture
        .post("/api/v1/print", json!({ "print_type": "questions" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "selection_empty");
}

#[tokio::test]
async fn test_print_without_print_type() {
    let fixture = loaded_fixture(TestConfig::default()).await;
    fixture
        .post("/api/v1/selection", json!({ "visible": true }))
        .await;

    let response = fixture.post("/api/v1/print", json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "no_print_type");
}

#[tokio::test]
async fn test_print_inline_without_target() {
    let fixture = loaded_fixture(TestConfig::default()).await;
    fixture
        .post("/api/v1/selection", json!({ "visible": true }))
        .await;

    let response = fixture
        .post("/api/v1/print", json!({ "print_type": "both" }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["item_count"], 2);
    assert_eq!(response.body["print_type"], "both");
    assert_eq!(response.body["title"], "Question Bank - Print (2 questions)");
    assert!(response.body["receipt"].is_null());
    assert!(response.body["generated_at"].is_string());
    let html = response.body["html"].as_str().unwrap();
    assert_eq!(
        html.matches("No mark scheme available for this question").count(),
        2
    );
}

#[tokio::test]
async fn test_print_opens_target() {
    let fixture = loaded_fixture(TestConfig {
        with_print_target: true,
        ..Default::default()
    })
    .await;
    fixture
        .post("/api/v1/selection", json!({ "paths": [OPTICS_EASY_2] }))
        .await;

    let response = fixture
        .post(
            "/api/v1/print",
            json!({ "print_type": "questions", "include_metadata": false }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["receipt"]["target"], "mock");
    assert_eq!(response.body["receipt"]["location"], "mock://print/1");

    let target = fixture.print_target.as_ref().unwrap();
    assert_eq!(target.open_count(), 1);
    let document = &target.opened()[0];
    assert_eq!(document.item_count, 1);
    assert!(!document.html.contains("Subject: Physics"));
}

#[tokio::test]
async fn test_print_target_unavailable() {
    let fixture = loaded_fixture(TestConfig {
        with_print_target: true,
        ..Default::default()
    })
    .await;
    fixture
        .print_target
        .as_ref()
        .unwrap()
        .set_blocked(Some("popup blocked"));
    fixture
        .post("/api/v1/selection", json!({ "visible": true }))
        .await;

    let response = fixture
        .post("/api/v1/print", json!({ "print_type": "markschemes" }))
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["code"], "target_unavailable");
}

#[tokio::test]
async fn test_print_html_format() {
    let fixture = loaded_fixture(TestConfig::default()).await;
    fixture
        .post("/api/v1/selection", json!({ "visible": true }))
        .await;

    let response = fixture
        .request_text(
            "POST",
            "/api/v1/print?format=html",
            Some(json!({ "print_type": "questions" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .content_type
        .as_deref()
        .unwrap()
        .starts_with("text/html"));
    assert!(response.body.contains("Total Questions: 2 | Print Type: questions"));
    assert!(response.body.contains(&format!(
        "src=\"{}/{}\"",
        DEFAULT_ASSET_HOST, OPTICS_EASY_1
    )));
}

// ============================================================================
// Metrics and static assets
// ============================================================================

#[tokio::test]
async fn test_metrics_exposition() {
    let fixture = loaded_fixture(TestConfig::default()).await;
    let response = fixture.request_text("GET", "/api/v1/metrics", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("qbank_catalog_items"));
    assert!(response.body.contains("qbank_scans_total"));
    assert!(response.body.contains("qbank_http_requests_total"));
}

#[tokio::test]
async fn test_serves_local_asset_tree() {
    let root = TempDir::new().unwrap();
    let relative = "questions/Physics/2021/Optics/Easy/q1.jpeg";
    let path = root.path().join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"jpeg-bytes").unwrap();

    let fixture = TestFixture::with_config(TestConfig {
        asset_root: Some(root.path().to_path_buf()),
        ..Default::default()
    });

    let found = fixture
        .request_text("GET", &format!("/{}", relative), None)
        .await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body, "jpeg-bytes");

    let missing = fixture
        .request_text("GET", "/questions/Physics/2021/Optics/Easy/q9.jpeg", None)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let config = fixture.get("/api/v1/config").await;
    assert_eq!(config.body["assets"]["serving_local_assets"], true);
}

#[tokio::test]
async fn test_printed_images_resolve_on_local_asset_tree() {
    let root = TempDir::new().unwrap();
    for relative in [OPTICS_EASY_1, OPTICS_EASY_2] {
        let path = root.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"jpeg-bytes").unwrap();
    }
    let fixture = loaded_fixture(TestConfig {
        asset_root: Some(root.path().to_path_buf()),
        ..Default::default()
    })
    .await;
    fixture
        .post("/api/v1/selection", json!({ "visible": true }))
        .await;

    let page = fixture
        .request_text(
            "POST",
            "/api/v1/print?format=html",
            Some(json!({ "print_type": "questions" })),
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);

    let sources: Vec<&str> = page
        .body
        .split("<img src=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .collect();
    assert_eq!(sources.len(), 2);

    for src in sources {
        // Origin-relative, so the page resolves it no matter where it is served from.
        assert!(src.starts_with('/'), "relative image source {}", src);
        let image = fixture.request_text("GET", src, None).await;
        assert_eq!(image.status, StatusCode::OK, "GET {}", src);
        assert_eq!(image.body, "jpeg-bytes");
    }

    let catalog = fixture.get("/api/v1/catalog").await;
    assert_eq!(
        catalog.body["items"][0]["question_url"],
        format!("/{}", OPTICS_EASY_1)
    );
}

#[tokio::test]
async fn test_remote_asset_host_urls() {
    let fixture = loaded_fixture(TestConfig {
        base_url: Some("https://assets.example.org/bank".to_string()),
        ..Default::default()
    })
    .await;
    fixture
        .post("/api/v1/selection", json!({ "paths": [OPTICS_EASY_1] }))
        .await;

    let catalog = fixture.get("/api/v1/catalog").await;
    assert_eq!(
        catalog.body["items"][0]["question_url"],
        format!("https://assets.example.org/bank/{}", OPTICS_EASY_1)
    );

    fixture
        .post(
            "/api/v1/events",
            json!({ "type": "open_viewer", "path": OPTICS_EASY_2 }),
        )
        .await;
    let viewer = fixture.get("/api/v1/viewer").await;
    assert_eq!(
        viewer.body["url"],
        format!("https://assets.example.org/bank/{}", OPTICS_EASY_2)
    );

    let printed = fixture
        .post("/api/v1/print", json!({ "print_type": "questions" }))
        .await;
    let html = printed.body["html"].as_str().unwrap();
    assert!(html.contains(&format!(
        "src=\"https://assets.example.org/bank/{}\"",
        OPTICS_EASY_1
    )));
}
