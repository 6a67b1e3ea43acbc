//! Memoized scan results with time-based expiry.
//!
//! Entries are keyed by the full filter signature. Separately, a set of
//! (subject, year) markers records which pairs have already been swept so
//! they are never probed twice in a session. Expiry of an entry does not
//! clear its marker; only [`ScanCache::clear`] does.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::catalog::{FilterSignature, Item, SubjectYear};
use crate::metrics::CACHE_LOOKUPS;

/// Default freshness window (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

#[derive(Debug, Clone)]
struct CacheEntry {
    items: Vec<Item>,
    stored_at: DateTime<Utc>,
}

/// State of a signature in the cache at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheStatus {
    Fresh(Vec<Item>),
    Expired,
    Missing,
}

/// Cache statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub scanned_combinations: usize,
    pub ttl_secs: u64,
    /// Signature and store time of every entry, oldest first.
    pub last_scans: Vec<(String, DateTime<Utc>)>,
}

#[derive(Debug)]
pub struct ScanCache {
    ttl: Duration,
    entries: HashMap<FilterSignature, CacheEntry>,
    scanned: HashSet<SubjectYear>,
}

impl Default for ScanCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ScanCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            scanned: HashSet::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached items for `signature` if stored less than one TTL before `now`.
    pub fn lookup(&self, signature: &FilterSignature, now: DateTime<Utc>) -> Option<Vec<Item>> {
        match self.status(signature, now) {
            CacheStatus::Fresh(items) => Some(items),
            CacheStatus::Expired | CacheStatus::Missing => None,
        }
    }

    /// Like [`lookup`](Self::lookup) but tells an expired entry from a missing one.
    pub fn status(&self, signature: &FilterSignature, now: DateTime<Utc>) -> CacheStatus {
        let Some(entry) = self.entries.get(signature) else {
            CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
            return CacheStatus::Missing;
        };

        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        if now.signed_duration_since(entry.stored_at) < ttl {
            CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
            CacheStatus::Fresh(entry.items.clone())
        } else {
            CACHE_LOOKUPS.with_label_values(&["expired"]).inc();
            CacheStatus::Expired
        }
    }

    /// Store (or replace) the item list for a signature.
    pub fn store(&mut self, signature: FilterSignature, items: Vec<Item>, timestamp: DateTime<Utc>) {
        self.entries.insert(
            signature,
            CacheEntry {
                items,
                stored_at: timestamp,
            },
        );
    }

    pub fn has_been_scanned(&self, key: &SubjectYear) -> bool {
        self.scanned.contains(key)
    }

    /// Returns false if the pair was already marked.
    pub fn mark_scanned(&mut self, key: SubjectYear) -> bool {
        self.scanned.insert(key)
    }

    /// Drop every entry and every scanned marker.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.scanned.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let mut last_scans: Vec<(String, DateTime<Utc>)> = self
            .entries
            .iter()
            .map(|(sig, entry)| (sig.to_string(), entry.stored_at))
            .collect();
        last_scans.sort_by_key(|(_, at)| *at);

        CacheStats {
            entries: self.entries.len(),
            scanned_combinations: self.scanned.len(),
            ttl_secs: self.ttl.as_secs(),
            last_scans,
        }
    }
}
