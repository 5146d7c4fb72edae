//! Acquisition configuration and run results.
//!
//! Defines [`AcquisitionConfig`] (paging, pacing, early termination), [`RunReport`]
//! counters, [`Termination`], [`Acquired`] and the caller-facing [`RunOutcome`].

use std::time::Duration;

use tgstat_core::{ChannelIdentity, Record, ResolveError, SourceError, TgstatError};

use crate::normalizer::SkipReason;

/// Messages requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Processed messages between two pacing pauses.
pub const DEFAULT_BATCH_SIZE: usize = 100;
/// Pause after every batch, independent of rate-limit signals.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(1);
/// Consecutive messages older than the window start before the scan stops.
pub const DEFAULT_OUT_OF_RANGE_THRESHOLD: usize = 10;

/// Tunables of one acquisition run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionConfig {
    pub page_size: usize,
    pub batch_size: usize,
    pub batch_delay: Duration,
    /// Tolerance for provider ordering jitter around the window start.
    pub out_of_range_threshold: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            out_of_range_threshold: DEFAULT_OUT_OF_RANGE_THRESHOLD,
        }
    }
}

impl AcquisitionConfig {
    pub fn validate(&self) -> Result<(), TgstatError> {
        if self.page_size == 0 {
            return Err(TgstatError::Config("page_size must be greater than 0".to_string()));
        }
        if self.batch_size == 0 {
            return Err(TgstatError::Config("batch_size must be greater than 0".to_string()));
        }
        if self.out_of_range_threshold == 0 {
            return Err(TgstatError::Config(
                "out_of_range_threshold must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counters of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub processed: usize,
    pub accepted: usize,
    /// No reactions at all, or fewer than the window minimum.
    pub skipped_low_reactions: usize,
    pub skipped_no_media: usize,
    pub skipped_out_of_range: usize,
    /// Number of mandatory rate-limit waits honored.
    pub rate_limit_waits: usize,
    pub throttled_for: Duration,
}

impl RunReport {
    pub(crate) fn record_skip(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::NoReactions | SkipReason::BelowThreshold { .. } => {
                self.skipped_low_reactions += 1
            }
            SkipReason::NoMedia => self.skipped_no_media += 1,
        }
    }
}

/// Why the scan stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// `max_records` accepted.
    MaxRecords,
    /// `max_scanned` processed.
    MaxScanned,
    /// The source returned an empty page.
    Exhausted,
    /// Consecutive out-of-range threshold reached.
    OutOfRange,
    /// External cancellation.
    Cancelled,
    /// Unrecoverable source error.
    Aborted(SourceError),
}

/// Everything accepted by a run, with its counters.
#[derive(Debug, Clone)]
pub struct Acquired {
    /// In delivery order (newest first).
    pub records: Vec<Record>,
    pub report: RunReport,
    pub termination: Termination,
}

/// Why a run ended with partial results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartialReason {
    Cancelled,
    Aborted(SourceError),
}

/// Caller-facing result of a run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The scan ran to one of its natural stop conditions.
    Completed {
        channel: ChannelIdentity,
        acquired: Acquired,
    },
    /// Cancelled or aborted mid-stream; `acquired` holds everything accepted so far.
    Partial {
        channel: ChannelIdentity,
        acquired: Acquired,
        reason: PartialReason,
    },
    /// Channel resolution failed; the scan never started.
    AbortedBeforeStart(ResolveError),
}

impl RunOutcome {
    pub(crate) fn from_acquired(channel: ChannelIdentity, acquired: Acquired) -> Self {
        let reason = match &acquired.termination {
            Termination::Cancelled => Some(PartialReason::Cancelled),
            Termination::Aborted(err) => Some(PartialReason::Aborted(err.clone())),
            _ => None,
        };
        match reason {
            Some(reason) => RunOutcome::Partial {
                channel,
                acquired,
                reason,
            },
            None => RunOutcome::Completed { channel, acquired },
        }
    }

    /// Channel and acquired records when the scan started.
    pub fn acquired(&self) -> Option<(&ChannelIdentity, &Acquired)> {
        match self {
            RunOutcome::Completed { channel, acquired }
            | RunOutcome::Partial {
                channel, acquired, ..
            } => Some((channel, acquired)),
            RunOutcome::AbortedBeforeStart(_) => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}
