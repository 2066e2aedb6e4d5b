use std::time::Duration;

use log::{debug, info, warn};

use super::{NotificationSink, TextNotification};
use crate::cache::SensorCache;
use crate::config::{MetricsConfig, RotationConfig};
use crate::domain::{Metric, SensorSnapshot};

/// Metric whose absence means no data has arrived at all.
pub const LIVENESS_METRIC: Metric = Metric::Temperature;

/// One slot of the rotation, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationEntry {
    pub metric: Metric,
    pub enabled: bool,
    pub label: String,
}

impl RotationEntry {
    /// Every metric in rotation order, with the configured flag and label.
    pub fn from_config(metrics: &MetricsConfig) -> Vec<RotationEntry> {
        Metric::ALL
            .into_iter()
            .map(|metric| {
                let entry = metrics.entry(metric);
                RotationEntry {
                    metric,
                    enabled: entry.enabled,
                    label: entry
                        .label
                        .clone()
                        .unwrap_or_else(|| metric.default_label().to_string()),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// How long each metric stays on screen. Sent to the display and slept
    /// locally, so both sides use the same value.
    pub per_item: Duration,
    pub between_cycles: Duration,
    /// Used instead of `between_cycles` while the liveness metric is empty.
    pub no_data_retry: Duration,
}

impl From<&RotationConfig> for Timing {
    fn from(config: &RotationConfig) -> Self {
        Self {
            per_item: Duration::from_secs(config.seconds_per_data),
            between_cycles: Duration::from_secs(config.seconds_between_cycles),
            no_data_retry: Duration::from_secs(config.no_data_retry_seconds),
        }
    }
}

/// Outcome of one rotation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Metrics sent to the display, in order, whether or not the call worked.
    pub shown: Vec<Metric>,
    pub failed: usize,
    pub cleared: bool,
    /// Sleep before the next cycle.
    pub next_sleep: Duration,
}

/// Cycles the enabled, populated metrics over a [`NotificationSink`].
pub struct DisplayScheduler<S> {
    cache: SensorCache,
    sink: S,
    rotation: Vec<RotationEntry>,
    timing: Timing,
}

impl<S: NotificationSink> DisplayScheduler<S> {
    pub fn new(cache: SensorCache, sink: S, rotation: Vec<RotationEntry>, timing: Timing) -> Self {
        Self {
            cache,
            sink,
            rotation,
            timing,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs one cycle up to and including the clear request. The caller
    /// sleeps `next_sleep` afterwards.
    pub async fn run_cycle(&self) -> CycleReport {
        let snapshot = self.cache.snapshot();
        let mut report = CycleReport {
            shown: Vec::new(),
            failed: 0,
            cleared: false,
            next_sleep: self.cycle_end_sleep(&snapshot),
        };

        for entry in &self.rotation {
            if !entry.enabled {
                continue;
            }
            let value = snapshot.get(entry.metric);
            if value.is_no_data() {
                continue;
            }

            let notification =
                TextNotification::new(&entry.label, value.as_str(), self.timing.per_item);
            debug!("showing '{}'", notification.message);
            if let Err(e) = self.sink.show(&notification).await {
                warn!("failed to show {}: {e}", entry.metric);
                report.failed += 1;
            }
            report.shown.push(entry.metric);
            tokio::time::sleep(notification.display_for).await;
        }

        match self.sink.clear().await {
            Ok(()) => report.cleared = true,
            Err(e) => warn!("failed to clear display: {e}"),
        }

        report
    }

    /// Rotates forever. Only process exit stops it.
    pub async fn run(self) {
        info!(
            "display rotation started ({} of {} metrics enabled)",
            self.rotation.iter().filter(|e| e.enabled).count(),
            self.rotation.len()
        );
        loop {
            let report = self.run_cycle().await;
            debug!(
                "cycle done: {} shown, {} failed, sleeping {:?}",
                report.shown.len(),
                report.failed,
                report.next_sleep
            );
            tokio::time::sleep(report.next_sleep).await;
        }
    }

    fn cycle_end_sleep(&self, snapshot: &SensorSnapshot) -> Duration {
        if snapshot.get(LIVENESS_METRIC).is_no_data() {
            self.timing.no_data_retry
        } else {
            self.timing.between_cycles
        }
    }
}
