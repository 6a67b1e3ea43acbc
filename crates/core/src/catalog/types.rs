//! Types for the question catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::taxonomy::Difficulty;

/// A discovered question asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub subject: String,
    pub year: String,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Question number within its topic/difficulty folder (1..=10).
    pub number: u8,
    /// Path of the question image, relative to the asset root.
    /// Also the identifier used by the selection set.
    pub question_path: String,
    /// Path of the paired mark scheme image.
    pub mark_scheme_path: String,
    /// Whether the mark scheme was confirmed to exist.
    #[serde(default)]
    pub has_mark_scheme: bool,
    pub title: String,
}

impl Item {
    /// Identity key; no two catalog items share one.
    pub fn key(&self) -> ItemKey {
        ItemKey {
            subject: self.subject.clone(),
            year: self.year.clone(),
            topic: self.topic.clone(),
            difficulty: self.difficulty,
            number: self.number,
        }
    }

    /// Copy of this item with the mark scheme flag set.
    pub fn with_mark_scheme(&self, present: bool) -> Item {
        Item {
            has_mark_scheme: present,
            ..self.clone()
        }
    }
}

/// Composite identity of an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub subject: String,
    pub year: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub number: u8,
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}",
            self.subject, self.year, self.topic, self.difficulty, self.number
        )
    }
}

/// Current filter selection. Unset fields act as wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl FilterState {
    /// Empty strings are treated as "not set".
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        Self {
            subject: clean(self.subject),
            year: clean(self.year),
            topic: clean(self.topic),
            difficulty: self.difficulty,
        }
    }

    /// The (subject, year) pair, available only once both are set.
    pub fn subject_year(&self) -> Option<SubjectYear> {
        match (&self.subject, &self.year) {
            (Some(subject), Some(year)) => Some(SubjectYear {
                subject: subject.clone(),
                year: year.clone(),
            }),
            _ => None,
        }
    }

    pub fn signature(&self) -> FilterSignature {
        FilterSignature {
            subject: self.subject.clone().unwrap_or_default(),
            year: self.year.clone().unwrap_or_default(),
            topic: self.topic.clone().unwrap_or_default(),
            difficulty: self
                .difficulty
                .map(|d| d.as_str().to_string())
                .unwrap_or_default(),
        }
    }

    /// Exact match on every set field.
    pub fn matches(&self, item: &Item) -> bool {
        self.subject.as_ref().is_none_or(|s| &item.subject == s)
            && self.year.as_ref().is_none_or(|y| &item.year == y)
            && self.topic.as_ref().is_none_or(|t| &item.topic == t)
            && self.difficulty.is_none_or(|d| item.difficulty == d)
    }
}

/// Full 4-tuple cache key. Unset fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSignature {
    pub subject: String,
    pub year: String,
    pub topic: String,
    pub difficulty: String,
}

impl fmt::Display for FilterSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.subject, self.year, self.topic, self.difficulty
        )
    }
}

/// Coarse (subject, year) key recording that a full sweep was done.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectYear {
    pub subject: String,
    pub year: String,
}

impl fmt::Display for SubjectYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.subject, self.year)
    }
}
