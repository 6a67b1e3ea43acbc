//! HTTP existence prober.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::trace;

use crate::candidates::encode_path;
use crate::config::ProbeMethod;
use crate::metrics::PROBES_TOTAL;

use super::{is_safe_locator, AssetProber, ProbeError};

/// Probes assets with HTTP requests against a base URL.
///
/// A success status means the asset exists. The time budget is enforced
/// around the whole request; when it runs out the request future is
/// dropped, which aborts the connection.
pub struct HttpProber {
    client: Client,
    base_url: String,
    method: ProbeMethod,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(base_url: &str, method: ProbeMethod, timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| ProbeError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            method,
            timeout,
        })
    }

    /// Full URL for a locator, percent-encoding each path segment.
    pub fn url_for(&self, locator: &str) -> String {
        format!("{}/{}", self.base_url, encode_path(locator))
    }
}

#[async_trait]
impl AssetProber for HttpProber {
    fn name(&self) -> &str {
        "http"
    }

    async fn exists(&self, locator: &str) -> bool {
        if !is_safe_locator(locator) {
            PROBES_TOTAL.with_label_values(&["rejected"]).inc();
            return false;
        }

        let url = self.url_for(locator);
        let request = match self.method {
            ProbeMethod::Head => self.client.head(&url),
            ProbeMethod::Get => self.client.get(&url),
        };

        match tokio::time::timeout(self.timeout, request.send()).await {
            Ok(Ok(response)) => {
                let found = response.status().is_success();
                trace!(url = %url, status = %response.status(), "Probe answered");
                PROBES_TOTAL
                    .with_label_values(&[if found { "found" } else { "not_found" }])
                    .inc();
                found
            }
            Ok(Err(e)) => {
                trace!(url = %url, error = %e, "Probe request failed");
                PROBES_TOTAL.with_label_values(&["error"]).inc();
                false
            }
            Err(_) => {
                trace!(url = %url, timeout_ms = self.timeout.as_millis() as u64, "Probe timed out");
                PROBES_TOTAL.with_label_values(&["timeout"]).inc();
                false
            }
        }
    }
}
