//! Browsing session state and the load pipeline.
//!
//! A `Session` owns everything one user interacts with: the filter
//! selection, the accumulated catalog, the scan cache, the selection set
//! and the image viewer. Loading goes cache → scanned marker → probe:
//!
//! 1. Without both subject and year nothing is probed.
//! 2. A fresh cache entry for the full filter signature is served as is.
//! 3. If the (subject, year) pair was already swept, the catalog is
//!    re-filtered; an expired entry additionally re-validates its items.
//! 4. Otherwise the candidate space is probed and the hits are merged.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::candidates::{asset_url, generate_candidates};
use crate::catalog::{CatalogStore, FilterSignature, FilterState, Item};
use crate::config::Config;
use crate::metrics::{PRINT_DOCUMENTS, SCANS_TOTAL};
use crate::print::{
    build_print_document, PrintDocument, PrintError, PrintReceipt, PrintRequest, PrintTarget,
};
use crate::prober::{AssetProber, BatchProber};
use crate::scan_cache::{CacheStats, CacheStatus, ScanCache};
use crate::selection::SelectionSet;
use crate::taxonomy::{topics_for_subject, Difficulty};

/// What a load request ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Subject or year missing; nothing was probed.
    SelectionRequired,
    /// Served from a fresh cache entry.
    FromCache { count: usize },
    /// The candidate space was probed.
    Scanned {
        probed: usize,
        found: usize,
        added: usize,
    },
    /// The pair was swept before; the catalog was re-filtered without probing.
    AlreadyScanned { count: usize },
    /// An expired entry's items were probed again.
    Revalidated { checked: usize, missing: usize },
}

impl LoadOutcome {
    fn label(&self) -> &'static str {
        match self {
            LoadOutcome::SelectionRequired => "selection_required",
            LoadOutcome::FromCache { .. } => "from_cache",
            LoadOutcome::Scanned { .. } => "scanned",
            LoadOutcome::AlreadyScanned { .. } => "already_scanned",
            LoadOutcome::Revalidated { .. } => "revalidated",
        }
    }
}

/// Counters shown alongside the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub total_items: usize,
    pub visible_items: usize,
    pub selected_items: usize,
    pub filters: FilterState,
    pub cache: CacheStats,
}

/// A printed document and, if a target was given, where it went.
#[derive(Debug, Clone, Serialize)]
pub struct PrintOutcome {
    pub document: PrintDocument,
    pub receipt: Option<PrintReceipt>,
}

pub struct Session {
    filters: FilterState,
    catalog: CatalogStore,
    cache: ScanCache,
    selection: SelectionSet,
    viewer: Option<String>,
    batch: BatchProber,
    probe_companions: bool,
    asset_base: String,
}

impl Session {
    pub fn new(batch: BatchProber, cache_ttl: Duration, probe_companions: bool) -> Self {
        Self {
            filters: FilterState::default(),
            catalog: CatalogStore::new(),
            cache: ScanCache::new(cache_ttl),
            selection: SelectionSet::new(),
            viewer: None,
            batch,
            probe_companions,
            asset_base: "/".to_string(),
        }
    }

    /// Where clients load assets from. Defaults to this server's root.
    pub fn with_asset_base(mut self, base: impl Into<String>) -> Self {
        self.asset_base = base.into();
        self
    }

    /// Session wired from the prober and cache sections of a config.
    pub fn from_config(config: &Config, prober: Arc<dyn AssetProber>) -> Self {
        Self::new(
            BatchProber::new(prober, config.prober.max_concurrent_probes),
            Duration::from_secs(config.cache.ttl_secs),
            config.prober.probe_companions,
        )
        .with_asset_base(config.assets.public_base())
    }

    pub fn asset_base(&self) -> &str {
        &self.asset_base
    }

    /// URL a client should use for an asset path.
    pub fn asset_url(&self, path: &str) -> String {
        asset_url(&self.asset_base, path)
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Changing the subject drops a topic that the new subject doesn't have.
    pub fn set_subject(&mut self, subject: Option<String>) {
        self.filters.subject = non_blank(subject);
        if let (Some(subject), Some(topic)) = (&self.filters.subject, &self.filters.topic) {
            if !topics_for_subject(subject).contains(&topic.as_str()) {
                debug!(subject = %subject, topic = %topic, "Dropping topic not offered for subject");
                self.filters.topic = None;
            }
        }
    }

    pub fn set_year(&mut self, year: Option<String>) {
        self.filters.year = non_blank(year);
    }

    pub fn set_topic(&mut self, topic: Option<String>) {
        self.filters.topic = non_blank(topic);
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.filters.difficulty = difficulty;
    }

    /// Replace all four filters at once.
    pub fn set_filters(&mut self, filters: FilterState) {
        let filters = filters.normalized();
        self.filters.topic = filters.topic;
        self.filters.difficulty = filters.difficulty;
        self.filters.year = filters.year;
        self.set_subject(filters.subject);
    }

    /// Topic choices for the current subject.
    pub fn topics_for_current_subject(&self) -> &'static [&'static str] {
        match &self.filters.subject {
            Some(subject) => topics_for_subject(subject),
            None => &[],
        }
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    pub async fn load_for_current_filters(&mut self) -> LoadOutcome {
        self.load_at(Utc::now()).await
    }

    /// Load against an explicit clock.
    pub async fn load_at(&mut self, now: DateTime<Utc>) -> LoadOutcome {
        let Some(pair) = self.filters.subject_year() else {
            debug!("Subject and year required before scanning");
            return LoadOutcome::SelectionRequired;
        };
        let signature = self.filters.signature();

        let outcome = match self.cache.status(&signature, now) {
            CacheStatus::Fresh(items) => {
                debug!(signature = %signature, count = items.len(), "Serving from cache");
                LoadOutcome::FromCache { count: items.len() }
            }
            CacheStatus::Expired if self.cache.has_been_scanned(&pair) => {
                self.revalidate(signature, now).await
            }
            CacheStatus::Missing if self.cache.has_been_scanned(&pair) => {
                let view = self.view();
                let count = view.len();
                debug!(signature = %signature, count, "Pair already swept, re-filtering");
                self.cache.store(signature, view, now);
                LoadOutcome::AlreadyScanned { count }
            }
            _ => {
                self.cache.mark_scanned(pair);
                self.scan(signature, now).await
            }
        };

        SCANS_TOTAL.with_label_values(&[outcome.label()]).inc();
        outcome
    }

    async fn scan(
        &mut self,
        signature: FilterSignature,
        now: DateTime<Utc>,
    ) -> LoadOutcome {
        let (subject, year) = match (&self.filters.subject, &self.filters.year) {
            (Some(s), Some(y)) => (s.clone(), y.clone()),
            _ => return LoadOutcome::SelectionRequired,
        };

        let candidates = generate_candidates(
            &subject,
            &year,
            self.filters.topic.as_deref(),
            self.filters.difficulty,
        );
        let probed = candidates.len();
        info!(subject = %subject, year = %year, candidates = probed, "Scanning for questions");

        let outcomes = self
            .batch
            .probe_all(candidates.iter().map(|c| c.question_path.clone()).collect())
            .await;

        let found: Vec<Item> = candidates
            .into_iter()
            .zip(outcomes)
            .filter(|(_, outcome)| outcome.found)
            .map(|(candidate, _)| candidate)
            .collect();

        let found = if self.probe_companions && !found.is_empty() {
            self.confirm_mark_schemes(found).await
        } else {
            found
        };

        let found_count = found.len();
        let added = self.catalog.merge(found);
        let view = self.view();
        self.cache.store(signature, view, now);

        info!(
            subject = %subject,
            year = %year,
            probed,
            found = found_count,
            added,
            "Scan complete"
        );

        LoadOutcome::Scanned {
            probed,
            found: found_count,
            added,
        }
    }

    async fn confirm_mark_schemes(&self, items: Vec<Item>) -> Vec<Item> {
        let outcomes = self
            .batch
            .probe_all(items.iter().map(|i| i.mark_scheme_path.clone()).collect())
            .await;
        items
            .iter()
            .zip(outcomes)
            .map(|(item, outcome)| item.with_mark_scheme(outcome.found))
            .collect()
    }

    /// Probe the current view again. Items that no longer resolve are
    /// reported but kept; only an explicit refresh drops them.
    async fn revalidate(
        &mut self,
        signature: FilterSignature,
        now: DateTime<Utc>,
    ) -> LoadOutcome {
        let view = self.view();
        let checked = view.len();

        let outcomes = self
            .batch
            .probe_all(view.iter().map(|i| i.question_path.clone()).collect())
            .await;
        let missing = outcomes.iter().filter(|o| !o.found).count();

        if missing > 0 {
            warn!(
                signature = %signature,
                checked,
                missing,
                "Cached questions no longer resolve; keeping them until refresh"
            );
        } else {
            debug!(signature = %signature, checked, "Cache entry revalidated");
        }

        self.cache.store(signature, view, now);
        LoadOutcome::Revalidated { checked, missing }
    }

    // -------------------------------------------------------------------------
    // Views and stats
    // -------------------------------------------------------------------------

    /// Catalog items matching the current filters, in catalog order.
    pub fn view(&self) -> Vec<Item> {
        self.catalog.apply_filter(&self.filters)
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total_items: self.catalog.len(),
            visible_items: self.view().len(),
            selected_items: self.selection.size(),
            filters: self.filters.clone(),
            cache: self.cache.stats(),
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn select(&mut self, path: &str) -> bool {
        self.selection.add(path)
    }

    pub fn deselect(&mut self, path: &str) -> bool {
        self.selection.remove(path)
    }

    pub fn toggle_selection(&mut self, path: &str) -> bool {
        self.selection.toggle(path)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all_visible(&mut self) -> usize {
        let view = self.view();
        self.selection.select_all(&view);
        view.len()
    }

    pub fn deselect_all_visible(&mut self) -> usize {
        let view = self.view();
        self.selection.deselect_all(&view);
        view.len()
    }

    /// Catalog items whose question path is selected, in catalog order.
    /// Selected paths that match no catalog item are skipped.
    pub fn selected_items(&self) -> Vec<Item> {
        self.catalog
            .items()
            .iter()
            .filter(|item| self.selection.contains(&item.question_path))
            .cloned()
            .collect()
    }

    // -------------------------------------------------------------------------
    // Print
    // -------------------------------------------------------------------------

    /// Build a print document from the selection and hand it to `target`.
    ///
    /// An empty selection fails before any target is touched.
    pub async fn print(
        &self,
        request: &PrintRequest,
        target: Option<&dyn PrintTarget>,
    ) -> Result<PrintOutcome, PrintError> {
        let result = self.print_inner(request, target).await;
        let label = match &result {
            Ok(_) => "ok",
            Err(e) => e.code(),
        };
        PRINT_DOCUMENTS.with_label_values(&[label]).inc();
        result
    }

    async fn print_inner(
        &self,
        request: &PrintRequest,
        target: Option<&dyn PrintTarget>,
    ) -> Result<PrintOutcome, PrintError> {
        let items = self.selected_items();
        let now = Utc::now();
        let render = |base: &str| {
            build_print_document(&items, request.print_type, request.include_metadata, base, now)
        };
        let document = render(self.asset_base.as_str())?;

        let receipt = match target {
            Some(target) => match target.asset_base() {
                Some(base) if base != self.asset_base => {
                    Some(target.open(&render(base)?).await?)
                }
                _ => Some(target.open(&document).await?),
            },
            None => None,
        };

        info!(
            items = document.item_count,
            print_type = %document.print_type,
            target = target.map(|t| t.name()).unwrap_or("none"),
            "Print document generated"
        );

        Ok(PrintOutcome { document, receipt })
    }

    // -------------------------------------------------------------------------
    // Viewer
    // -------------------------------------------------------------------------

    /// Show an image full screen. An empty path is ignored.
    pub fn open_viewer(&mut self, path: &str) -> bool {
        if path.trim().is_empty() {
            return false;
        }
        self.viewer = Some(path.to_string());
        true
    }

    pub fn close_viewer(&mut self) {
        self.viewer = None;
    }

    pub fn viewer(&self) -> Option<&str> {
        self.viewer.as_deref()
    }

    // -------------------------------------------------------------------------
    // Cache control
    // -------------------------------------------------------------------------

    /// Drop cache entries and scanned markers. The catalog is kept.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        info!("Scan cache cleared; next load will probe");
    }

    /// Forget everything discovered and scan the current filters again.
    /// The selection is kept.
    pub async fn force_refresh(&mut self) -> LoadOutcome {
        info!("Force refresh");
        self.cache.clear();
        self.catalog.clear();
        self.load_for_current_filters().await
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
