//! Asset existence probing.
//!
//! This module provides an `AssetProber` trait that answers "does this
//! asset exist?" within a bounded wait, plus a `BatchProber` that fans a
//! list of locators out over a prober with a cap on in-flight probes.

mod batch;
mod fs;
mod http;

pub use batch::{BatchProber, ProbeOutcome};
pub use fs::FsProber;
pub use http::HttpProber;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{Config, ProberBackend};

/// Errors raised while constructing a prober.
///
/// Probing itself never fails; every problem collapses to "not found".
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Prober misconfigured: {0}")]
    Config(String),
}

/// Trait for asset existence backends.
#[async_trait]
pub trait AssetProber: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Whether the asset at `locator` (relative to the asset root) exists.
    ///
    /// Returns `false` on a missing asset, any transport or I/O error, and
    /// on timeout. These cases are not distinguished. No retry.
    async fn exists(&self, locator: &str) -> bool;
}

/// Reject locators that could escape the asset root.
pub(crate) fn is_safe_locator(locator: &str) -> bool {
    !locator.is_empty()
        && !locator.starts_with('/')
        && !locator.contains('\\')
        && locator
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// Create the prober selected by the configuration.
pub fn create_prober(config: &Config) -> Result<Arc<dyn AssetProber>, ProbeError> {
    let timeout = Duration::from_millis(config.prober.timeout_ms);
    match config.prober.backend {
        ProberBackend::Http => Ok(Arc::new(HttpProber::new(
            &config.assets.base_url,
            config.prober.method,
            timeout,
        )?)),
        ProberBackend::Filesystem => {
            let root = config.assets.root_dir.clone().ok_or_else(|| {
                ProbeError::Config("filesystem backend requires assets.root_dir".to_string())
            })?;
            Ok(Arc::new(FsProber::new(root, timeout)))
        }
    }
}
