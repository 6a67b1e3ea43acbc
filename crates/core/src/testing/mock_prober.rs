//! Mock asset prober for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::prober::AssetProber;

/// Mock implementation of the AssetProber trait.
///
/// Provides controllable behavior for testing:
/// - Configure which locators exist
/// - Record every probed locator for assertions
/// - Simulate slow probes and observe peak concurrency
///
/// # Example
///
/// ```rust,ignore
/// use qbank_core::testing::MockProber;
///
/// let prober = MockProber::with_existing(["questions/Physics/2021/Optics/Easy/q1.jpeg"]);
/// assert!(prober.exists("questions/Physics/2021/Optics/Easy/q1.jpeg").await);
/// assert_eq!(prober.probe_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockProber {
    /// Locators that report as existing.
    existing: Mutex<HashSet<String>>,
    /// Every locator probed, in call order.
    probes: Mutex<Vec<String>>,
    /// Artificial latency per probe.
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockProber {
    /// Create a mock where nothing exists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock where exactly the given locators exist.
    pub fn with_existing<I, S>(locators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prober = Self::new();
        prober.set_existing(locators);
        prober
    }

    /// Delay every probe by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the set of existing locators.
    pub fn set_existing<I, S>(&self, locators: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut existing = self.existing.lock().unwrap();
        existing.clear();
        existing.extend(locators.into_iter().map(Into::into));
    }

    pub fn add_existing(&self, locator: impl Into<String>) {
        self.existing.lock().unwrap().insert(locator.into());
    }

    pub fn remove_existing(&self, locator: &str) {
        self.existing.lock().unwrap().remove(locator);
    }

    /// Locators probed so far, in call order.
    pub fn recorded_probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }

    pub fn probe_count(&self) -> usize {
        self.probes.lock().unwrap().len()
    }

    pub fn clear_recorded(&self) {
        self.probes.lock().unwrap().clear();
    }

    /// Highest number of probes observed running at once.
    pub fn max_observed_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetProber for MockProber {
    fn name(&self) -> &str {
        "mock"
    }

    async fn exists(&self, locator: &str) -> bool {
        self.probes.lock().unwrap().push(locator.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let found = self.existing.lock().unwrap().contains(locator);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        found
    }
}
