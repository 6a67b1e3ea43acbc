//! Printable document generation.
//!
//! `build_print_document` renders a list of catalog items into one
//! standalone HTML page. A `PrintTarget` is the surface the page is
//! handed to; opening it is a separate step that can fail on its own.

mod builder;
mod target;

pub use builder::build_print_document;
pub use target::{DirectoryTarget, PrintReceipt, PrintTarget};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which image blocks each section carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintType {
    Questions,
    Markschemes,
    Both,
}

impl PrintType {
    pub fn includes_questions(&self) -> bool {
        matches!(self, PrintType::Questions | PrintType::Both)
    }

    pub fn includes_mark_schemes(&self) -> bool {
        matches!(self, PrintType::Markschemes | PrintType::Both)
    }
}

impl fmt::Display for PrintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrintType::Questions => "questions",
            PrintType::Markschemes => "markschemes",
            PrintType::Both => "both",
        })
    }
}

/// Options chosen in the print dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintRequest {
    #[serde(default)]
    pub print_type: Option<PrintType>,
    #[serde(default = "default_include_metadata")]
    pub include_metadata: bool,
}

fn default_include_metadata() -> bool {
    true
}

impl Default for PrintRequest {
    fn default() -> Self {
        Self {
            print_type: None,
            include_metadata: default_include_metadata(),
        }
    }
}

/// A rendered print document.
#[derive(Debug, Clone, Serialize)]
pub struct PrintDocument {
    pub title: String,
    pub html: String,
    pub item_count: usize,
    pub print_type: PrintType,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("No questions selected")]
    SelectionEmpty,

    #[error("No print type chosen")]
    NoPrintType,

    #[error("Print target unavailable: {0}")]
    TargetUnavailable(String),
}

impl PrintError {
    /// Stable code for API responses and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            PrintError::SelectionEmpty => "selection_empty",
            PrintError::NoPrintType => "no_print_type",
            PrintError::TargetUnavailable(_) => "target_unavailable",
        }
    }
}
