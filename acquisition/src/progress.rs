//! [`ProgressSink`] implementations: periodic log lines and a watch channel for pollers.

use std::sync::atomic::{AtomicUsize, Ordering};

use tgstat_core::ProgressSink;
use tokio::sync::watch;
use tracing::info;

/// Logs a progress line each time `processed` crosses a multiple of `every`.
#[derive(Debug)]
pub struct LogProgress {
    every: usize,
    last_bucket: AtomicUsize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            last_bucket: AtomicUsize::new(0),
        }
    }
}

impl ProgressSink for LogProgress {
    fn on_progress(&self, processed: usize, accepted: usize) {
        let bucket = processed / self.every;
        if bucket > self.last_bucket.fetch_max(bucket, Ordering::Relaxed) {
            info!(processed, accepted, "Acquisition progress");
        }
    }
}

/// Latest `(processed, accepted)` pair published by a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub processed: usize,
    pub accepted: usize,
}

/// Publishes progress on a `watch` channel; sending never blocks and works without receivers.
#[derive(Debug)]
pub struct WatchProgress {
    tx: watch::Sender<ProgressSnapshot>,
}

impl WatchProgress {
    pub fn channel() -> (Self, watch::Receiver<ProgressSnapshot>) {
        let (tx, rx) = watch::channel(ProgressSnapshot::default());
        (Self { tx }, rx)
    }
}

impl ProgressSink for WatchProgress {
    fn on_progress(&self, processed: usize, accepted: usize) {
        self.tx.send_replace(ProgressSnapshot {
            processed,
            accepted,
        });
    }
}
