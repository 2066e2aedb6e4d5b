//! ==============================================================================
//! cache.rs - latest known value of every metric
//! ==============================================================================
//!
//! purpose:
//!     the only state shared between the two long-running tasks:
//!     - the stream ingester writes every parsed line (update_many)
//!     - the display scheduler reads one snapshot per cycle (snapshot)
//!
//! we use arc<mutex<>> for sharing:
//!     - arc: each task holds its own clone of the handle
//!     - mutex: one lock around the whole slot set, so a line's fields land
//!       together and a snapshot never sees half a line
//!
//! the lock is a std mutex, not a tokio one: it is only ever held for a copy
//! or an assignment and never across an .await.
//!
//! ==============================================================================

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{Metric, MetricValue, SensorSnapshot};

/// Cloneable handle to the process-wide metric cache.
#[derive(Clone, Default)]
pub struct SensorCache {
    slots: Arc<Mutex<SensorSnapshot>>,
}

impl SensorCache {
    /// Every slot starts as "no data".
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites a single slot.
    pub fn update(&self, metric: Metric, value: MetricValue) {
        self.lock().set(metric, value);
    }

    /// Applies all values parsed from one line as one unit.
    pub fn update_many<I>(&self, values: I)
    where
        I: IntoIterator<Item = (Metric, MetricValue)>,
    {
        // Collect first so no caller-side work runs under the lock.
        let values: Vec<_> = values.into_iter().collect();
        if values.is_empty() {
            return;
        }
        let mut slots = self.lock();
        for (metric, value) in values {
            slots.set(metric, value);
        }
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        self.lock().clone()
    }

    // A panic while holding the guard cannot leave a slot half-assigned,
    // so the data behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, SensorSnapshot> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(text: &str) -> MetricValue {
        MetricValue::Reading(text.to_string())
    }

    #[test]
    fn starts_with_every_slot_empty() {
        let cache = SensorCache::new();
        let snapshot = cache.snapshot();
        assert!(snapshot.is_empty());
        for metric in Metric::ALL {
            assert!(snapshot.get(metric).is_no_data());
        }
    }

    #[test]
    fn update_overwrites_one_slot() {
        let cache = SensorCache::new();
        cache.update(Metric::Co2, reading("604 ppm"));
        cache.update(Metric::Co2, reading("610 ppm"));

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.get(Metric::Co2).as_str(), "610 ppm");
        assert!(snapshot.get(Metric::Temperature).is_no_data());
    }

    #[test]
    fn clones_share_the_same_slots() {
        let writer = SensorCache::new();
        let reader = writer.clone();
        writer.update_many([
            (Metric::Temperature, reading("22.8°C")),
            (Metric::Humidity, reading("37.0% RH")),
        ]);

        let snapshot = reader.snapshot();
        assert_eq!(snapshot.get(Metric::Temperature).as_str(), "22.8°C");
        assert_eq!(snapshot.get(Metric::Humidity).as_str(), "37.0% RH");
    }

    #[test]
    fn snapshot_is_detached_from_later_updates() {
        let cache = SensorCache::new();
        cache.update(Metric::Aqi, reading("3"));
        let before = cache.snapshot();
        cache.update(Metric::Aqi, reading("4"));

        assert_eq!(before.get(Metric::Aqi).as_str(), "3");
        assert_eq!(cache.snapshot().get(Metric::Aqi).as_str(), "4");
    }

    #[test]
    fn empty_batch_changes_nothing() {
        let cache = SensorCache::new();
        cache.update_many(Vec::new());
        assert!(cache.snapshot().is_empty());
    }

    #[test]
    fn survives_a_poisoned_lock() {
        let cache = SensorCache::new();
        cache.update(Metric::Voc, reading("52"));

        let poisoner = cache.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.slots.lock().unwrap();
            panic!("poison the cache lock");
        })
        .join();

        assert_eq!(cache.snapshot().get(Metric::Voc).as_str(), "52");
        cache.update(Metric::Voc, reading("53"));
        assert_eq!(cache.snapshot().get(Metric::Voc).as_str(), "53");
    }
}
