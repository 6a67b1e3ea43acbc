use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::metrics::{PROBE_BATCH_DURATION, PROBE_BATCH_SIZE};

use super::AssetProber;

/// Settled result of probing one locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub locator: String,
    pub found: bool,
}

/// Fans locators out over a prober with a bounded number in flight.
///
/// Every locator settles; one outcome per input, in input order.
pub struct BatchProber {
    prober: Arc<dyn AssetProber>,
    max_in_flight: usize,
}

impl BatchProber {
    pub fn new(prober: Arc<dyn AssetProber>, max_in_flight: usize) -> Self {
        Self {
            prober,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn prober(&self) -> &Arc<dyn AssetProber> {
        &self.prober
    }

    pub async fn probe_all(&self, locators: Vec<String>) -> Vec<ProbeOutcome> {
        let start = Instant::now();
        let total = locators.len();
        let prober = self.prober.as_ref();

        // `buffered` keeps output order equal to input order.
        let outcomes: Vec<ProbeOutcome> = stream::iter(locators)
            .map(move |locator| async move {
                let found = prober.exists(&locator).await;
                ProbeOutcome { locator, found }
            })
            .buffered(self.max_in_flight)
            .collect()
            .await;

        let found = outcomes.iter().filter(|o| o.found).count();
        let elapsed = start.elapsed();
        PROBE_BATCH_DURATION
            .with_label_values(&[self.prober.name()])
            .observe(elapsed.as_secs_f64());
        PROBE_BATCH_SIZE.observe(total as f64);

        debug!(
            backend = self.prober.name(),
            total,
            found,
            max_in_flight = self.max_in_flight,
            duration_ms = elapsed.as_millis() as u64,
            "Probe batch settled"
        );

        outcomes
    }
}
