use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub records_accepted: usize,
    pub records_dropped: usize,
    pub locates: usize,
    pub locates_rejected: usize,
    pub recommendations: usize,
    pub persistence_failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_accepted(&self, count: usize) {
        self.update(|m| m.records_accepted += count);
    }

    pub fn record_dropped(&self) {
        self.update(|m| m.records_dropped += 1);
    }

    pub fn record_locate(&self) {
        self.update(|m| m.locates += 1);
    }

    pub fn record_locate_rejected(&self) {
        self.update(|m| m.locates_rejected += 1);
    }

    pub fn record_recommendation(&self) {
        self.update(|m| m.recommendations += 1);
    }

    pub fn record_persistence_failure(&self) {
        self.update(|m| m.persistence_failures += 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
