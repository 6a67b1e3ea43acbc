//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with a mock prober and print target injected, so every endpoint can be
//! exercised without an asset server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use qbank_core::{
    testing::{MockPrintTarget, MockProber},
    BatchProber, Config, PrintTarget, Session,
};
use qbank_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
#[allow(unused_imports)]
pub use qbank_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_scan() {
///     let fixture = TestFixture::new();
///     fixture.prober.add_existing("questions/Physics/2021/Optics/Easy/q1.jpeg");
///
///     let response = fixture.put("/api/v1/filters", json!({
///         "subject": "Physics", "year": "2021"
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock prober - configure which assets exist
    pub prober: Arc<MockProber>,
    /// Mock print target, if one was wired in
    pub print_target: Option<Arc<MockPrintTarget>>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Response with the body kept as text
#[derive(Debug)]
#[allow(dead_code)]
pub struct TextResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Wire a MockPrintTarget into the state
    pub with_print_target: bool,
    /// Probe mark schemes of found questions
    pub probe_companions: bool,
    /// Serve this directory as the asset root
    pub asset_root: Option<PathBuf>,
    /// Remote asset host used when no root is served
    pub base_url: Option<String>,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Create a test fixture with custom configuration.
    pub fn with_config(test_config: TestConfig) -> Self {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".parse().unwrap();
        config.assets.root_dir = test_config.asset_root.clone();
        if let Some(base_url) = &test_config.base_url {
            config.assets.base_url = base_url.clone();
        }
        config.prober.probe_companions = test_config.probe_companions;

        let prober = Arc::new(MockProber::new());
        let session = Session::new(
            BatchProber::new(prober.clone(), 16),
            Duration::from_secs(config.cache.ttl_secs),
            test_config.probe_companions,
        )
        .with_asset_base(config.assets.public_base());

        let mock_target = test_config
            .with_print_target
            .then(|| Arc::new(MockPrintTarget::new()));
        let print_target = mock_target
            .clone()
            .map(|t| t as Arc<dyn PrintTarget>);

        let state = Arc::new(AppState::new(config, session, print_target));
        let router = create_router(state);

        Self {
            router,
            prober,
            print_target: mock_target,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, _, bytes) = self.send(request).await;
        TestResponse {
            status,
            body: parse_json(&bytes),
        }
    }

    /// Send a request and keep the body as text.
    pub async fn request_text(&self, method: &str, path: &str, body: Option<Value>) -> TextResponse {
        let request = build_request(method, path, body);
        let (status, content_type, bytes) = self.send(request).await;
        TextResponse {
            status,
            content_type,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let request = build_request(method, path, body);
        let (status, _, bytes) = self.send(request).await;
        TestResponse {
            status,
            body: parse_json(&bytes),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, content_type, body_bytes.to_vec())
    }
}

fn build_request(method: &str, path: &str, body: Option<Value>) -> Request<Body> {
    let mut request_builder = Request::builder().method(method).uri(path);

    let body = if let Some(json_body) = body {
        request_builder = request_builder.header("Content-Type", "application/json");
        Body::from(serde_json::to_vec(&json_body).unwrap())
    } else {
        Body::empty()
    };

    request_builder.body(body).unwrap()
}

fn parse_json(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes).unwrap_or(Value::Null)
    }
}
