use std::collections::HashSet;

use super::{FilterState, Item, ItemKey};

/// In-memory accumulated set of discovered items.
///
/// Items keep discovery order. Merging is keyed by [`ItemKey`], so the same
/// question found by two scans is stored once.
#[derive(Debug, Default)]
pub struct CatalogStore {
    items: Vec<Item>,
    keys: HashSet<ItemKey>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append items whose key is not already present.
    ///
    /// Returns the number of items added.
    pub fn merge<I>(&mut self, new_items: I) -> usize
    where
        I: IntoIterator<Item = Item>,
    {
        let mut added = 0;
        for item in new_items {
            if self.keys.insert(item.key()) {
                self.items.push(item);
                added += 1;
            }
        }
        added
    }

    /// Recompute the filtered view over the whole catalog.
    pub fn apply_filter(&self, filter: &FilterState) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect()
    }

    pub fn find_by_path(&self, question_path: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.question_path == question_path)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.keys.clear();
    }
}
