//! Local filesystem existence prober.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::trace;

use crate::metrics::PROBES_TOTAL;

use super::{is_safe_locator, AssetProber};

/// Checks for regular files under a local asset root.
pub struct FsProber {
    root: PathBuf,
    timeout: Duration,
}

impl FsProber {
    pub fn new(root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            root: root.into(),
            timeout,
        }
    }
}

#[async_trait]
impl AssetProber for FsProber {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn exists(&self, locator: &str) -> bool {
        if !is_safe_locator(locator) {
            PROBES_TOTAL.with_label_values(&["rejected"]).inc();
            return false;
        }

        let path = self.root.join(locator);
        let found = match tokio::time::timeout(self.timeout, tokio::fs::metadata(&path)).await {
            Ok(Ok(meta)) => meta.is_file(),
            Ok(Err(_)) => false,
            Err(_) => {
                trace!(path = %path.display(), "Probe timed out");
                PROBES_TOTAL.with_label_values(&["timeout"]).inc();
                return false;
            }
        };

        PROBES_TOTAL
            .with_label_values(&[if found { "found" } else { "not_found" }])
            .inc();
        found
    }
}
