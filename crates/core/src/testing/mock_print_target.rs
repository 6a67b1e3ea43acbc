//! Mock print target for testing.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::print::{PrintDocument, PrintError, PrintReceipt, PrintTarget};

/// Mock implementation of the PrintTarget trait.
///
/// Keeps every opened document in memory and can be switched into a
/// blocked state where opening fails with `TargetUnavailable`.
#[derive(Debug, Default)]
pub struct MockPrintTarget {
    opened: Mutex<Vec<PrintDocument>>,
    blocked: Mutex<Option<String>>,
    asset_base: Option<String>,
}

impl MockPrintTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// A target that refuses every document with `reason`.
    pub fn blocked(reason: &str) -> Self {
        let target = Self::new();
        target.set_blocked(Some(reason));
        target
    }

    /// Ask for documents rendered against `base`.
    pub fn with_asset_base(mut self, base: &str) -> Self {
        self.asset_base = Some(base.to_string());
        self
    }

    pub fn set_blocked(&self, reason: Option<&str>) {
        *self.blocked.lock().unwrap() = reason.map(str::to_string);
    }

    /// Documents successfully opened so far.
    pub fn opened(&self) -> Vec<PrintDocument> {
        self.opened.lock().unwrap().clone()
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }
}

#[async_trait]
impl PrintTarget for MockPrintTarget {
    fn name(&self) -> &str {
        "mock"
    }

    fn asset_base(&self) -> Option<&str> {
        self.asset_base.as_deref()
    }

    async fn open(&self, document: &PrintDocument) -> Result<PrintReceipt, PrintError> {
        if let Some(reason) = self.blocked.lock().unwrap().clone() {
            return Err(PrintError::TargetUnavailable(reason));
        }

        let mut opened = self.opened.lock().unwrap();
        opened.push(document.clone());
        Ok(PrintReceipt {
            target: "mock".to_string(),
            location: format!("mock://print/{}", opened.len()),
            item_count: document.item_count,
        })
    }
}
