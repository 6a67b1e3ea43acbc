//! User selection of questions, independent of the active filter.

use std::collections::BTreeSet;

use crate::catalog::Item;

/// Set of selected question paths.
///
/// Entries survive filter changes. Paths that no longer resolve to a
/// catalog item stay in the set and are skipped when printing.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the id was not already selected.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    /// Returns true if the id was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Flip an id. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Select every item in a view.
    pub fn select_all(&mut self, view: &[Item]) {
        for item in view {
            self.ids.insert(item.question_path.clone());
        }
    }

    /// Deselect every item in a view, leaving selections outside it alone.
    pub fn deselect_all(&mut self, view: &[Item]) {
        for item in view {
            self.ids.remove(&item.question_path);
        }
    }

    pub fn size(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
