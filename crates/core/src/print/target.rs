//! Output surfaces for print documents.

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use super::{PrintDocument, PrintError};

/// Where a document went once opened.
#[derive(Debug, Clone, Serialize)]
pub struct PrintReceipt {
    pub target: String,
    pub location: String,
    pub item_count: usize,
}

/// A surface that accepts a finished print document.
#[async_trait]
pub trait PrintTarget: Send + Sync {
    fn name(&self) -> &str;

    /// Asset base for documents opened here, when it differs from the one
    /// the API hands to browsers (e.g. a `file://` root for files on disk).
    fn asset_base(&self) -> Option<&str> {
        None
    }

    /// Hand the document over. Fails with `PrintError::TargetUnavailable`
    /// when the surface cannot be opened.
    async fn open(&self, document: &PrintDocument) -> Result<PrintReceipt, PrintError>;
}

/// Writes each document as an HTML file into a directory.
pub struct DirectoryTarget {
    dir: PathBuf,
    asset_base: Option<String>,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            asset_base: None,
        }
    }

    /// Resolve images in written files against `base`.
    pub fn with_asset_base(mut self, base: impl Into<String>) -> Self {
        self.asset_base = Some(base.into());
        self
    }
}

#[async_trait]
impl PrintTarget for DirectoryTarget {
    fn name(&self) -> &str {
        "directory"
    }

    fn asset_base(&self) -> Option<&str> {
        self.asset_base.as_deref()
    }

    async fn open(&self, document: &PrintDocument) -> Result<PrintReceipt, PrintError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            warn!(dir = %self.dir.display(), error = %e, "Print directory unavailable");
            PrintError::TargetUnavailable(format!("{}: {}", self.dir.display(), e))
        })?;

        let file_name = format!(
            "qbank-print-{}.html",
            document.generated_at.format("%Y%m%d-%H%M%S%.3f")
        );
        let path = self.dir.join(file_name);

        tokio::fs::write(&path, document.html.as_bytes())
            .await
            .map_err(|e| {
                warn!(path = %path.display(), error = %e, "Failed to write print document");
                PrintError::TargetUnavailable(format!("{}: {}", path.display(), e))
            })?;

        info!(
            path = %path.display(),
            items = document.item_count,
            "Print document written"
        );

        Ok(PrintReceipt {
            target: self.name().to_string(),
            location: path.display().to_string(),
            item_count: document.item_count,
        })
    }
}
