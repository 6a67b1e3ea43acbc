//! Testing utilities and mock implementations.
//!
//! Mocks for the prober and print target seams, so sessions and the HTTP
//! surface can be exercised without an asset server.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use qbank_core::testing::{fixtures, MockProber};
//!
//! let item = fixtures::item("Physics", "2021", "Optics", Difficulty::Easy, 1);
//! let prober = Arc::new(MockProber::with_existing([item.question_path.clone()]));
//! ```

mod mock_print_target;
mod mock_prober;

pub use mock_print_target::MockPrintTarget;
pub use mock_prober::MockProber;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::candidates::{mark_scheme_path, question_path};
    use crate::catalog::Item;
    use crate::taxonomy::Difficulty;

    /// Build a catalog item with the canonical asset paths and no mark scheme.
    pub fn item(subject: &str, year: &str, topic: &str, difficulty: Difficulty, number: u8) -> Item {
        Item {
            subject: subject.to_string(),
            year: year.to_string(),
            topic: topic.to_string(),
            difficulty,
            number,
            question_path: question_path(subject, year, topic, difficulty, number),
            mark_scheme_path: mark_scheme_path(subject, year, topic, difficulty, number),
            has_mark_scheme: false,
            title: format!("Question {}", number),
        }
    }

    /// Question paths for numbers `1..=count` in one topic/difficulty folder.
    pub fn question_paths(
        subject: &str,
        year: &str,
        topic: &str,
        difficulty: Difficulty,
        count: u8,
    ) -> Vec<String> {
        (1..=count)
            .map(|n| question_path(subject, year, topic, difficulty, n))
            .collect()
    }
}
