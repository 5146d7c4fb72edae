//! Output collaborators: progress notifications and final report consumers.

use serde::Serialize;

use crate::error::Result;
use crate::statistics::StatisticsSummary;
use crate::types::{ChannelIdentity, Record};

/// Receives `(processed, accepted)` counts while a run streams.
///
/// Called inline by the pipeline: implementations must return immediately.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, processed: usize, accepted: usize);
}

/// Discards progress notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_progress(&self, _processed: usize, _accepted: usize) {}
}

/// Final result of a run, handed to report and export sinks.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub channel: &'a ChannelIdentity,
    pub statistics: &'a StatisticsSummary,
    /// Ranked records, in the order they should be presented.
    pub records: &'a [Record],
}

/// Consumes a [`Report`] to produce an artifact (file, terminal output, ...).
pub trait ReportSink {
    fn emit(&self, report: &Report<'_>) -> Result<()>;
}
