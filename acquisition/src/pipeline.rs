//! Streaming acquisition over a [`MessageSource`].
//!
//! States: `Idle → Streaming → (Throttled ⇄ Streaming) → Completed | Aborted`.
//! The cursor only moves past consumed messages, so a rate-limit wait followed by a
//! re-request of the same page neither repeats nor skips items.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tgstat_core::{
    AcquisitionWindow, ChannelIdentity, MessageSource, NoopProgress, PageCursor,
    ProgressSink, RawMessage, Record, SourceError,
};
use tracing::{debug, info, instrument, warn};

use crate::config::{Acquired, AcquisitionConfig, RunReport, Termination};
use crate::normalizer::{normalize, Normalized};

/// Lifecycle of an [`Acquisition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Streaming,
    /// Honoring a mandatory provider wait.
    Throttled,
    Completed,
    Aborted,
}

enum Fetched {
    Page(Vec<RawMessage>),
    Cancelled,
}

/// Mutable state of one run: cursor, counters, output.
struct Scan {
    cursor: PageCursor,
    report: RunReport,
    records: Vec<Record>,
    consecutive_out_of_range: usize,
}

/// One acquisition run over a message source. Owns its cursor, counters and output.
pub struct Acquisition {
    source: Arc<dyn MessageSource>,
    config: AcquisitionConfig,
    progress: Arc<dyn ProgressSink>,
    cancelled: Arc<AtomicBool>,
    state: PipelineState,
}

impl Acquisition {
    pub fn new(source: Arc<dyn MessageSource>, config: AcquisitionConfig) -> Self {
        Self {
            source,
            config,
            progress: Arc::new(NoopProgress),
            cancelled: Arc::new(AtomicBool::new(false)),
            state: PipelineState::Idle,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Shares an externally owned cancellation flag.
    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// Flag that stops the run at the next message when set.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn transition(&mut self, next: PipelineState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "step: acquisition state changed");
            self.state = next;
        }
    }

    /// Scans `channel` newest first and returns everything accepted by `window`.
    ///
    /// Never fails: transport errors end the scan with [`Termination::Aborted`] and the
    /// records accepted so far.
    #[instrument(skip(self, channel, window), fields(channel_id = channel.id))]
    pub async fn run(&mut self, channel: &ChannelIdentity, window: &AcquisitionWindow) -> Acquired {
        info!(
            min_reactions = window.min_reactions,
            media_only = window.media_only,
            start_date = ?window.start_date,
            end_date = ?window.end_date,
            max_records = ?window.max_records,
            max_scanned = ?window.max_scanned,
            "step: acquisition started"
        );
        self.transition(PipelineState::Streaming);

        let mut scan = Scan {
            cursor: PageCursor::starting_at(window.end_date),
            report: RunReport::default(),
            records: Vec::new(),
            consecutive_out_of_range: 0,
        };

        let termination = loop {
            if self.is_cancelled() {
                break Termination::Cancelled;
            }
            if window.max_records == Some(0) {
                break Termination::MaxRecords;
            }
            if window.max_scanned == Some(0) {
                break Termination::MaxScanned;
            }
            let limit = self.page_limit(&scan.report, window);
            let page = match self.fetch_page(channel, &mut scan, limit).await {
                Ok(Fetched::Page(page)) => page,
                Ok(Fetched::Cancelled) => break Termination::Cancelled,
                Err(err) => {
                    warn!(error = %err, processed = scan.report.processed, "Source failed, aborting scan");
                    break Termination::Aborted(err);
                }
            };
            if page.is_empty() {
                break Termination::Exhausted;
            }
            if let Some(termination) = self.consume_page(page, channel, window, &mut scan).await {
                break termination;
            }
        };

        let final_state = match termination {
            Termination::Aborted(_) => PipelineState::Aborted,
            _ => PipelineState::Completed,
        };
        self.transition(final_state);

        scan.report.accepted = scan.records.len();
        info!(
            termination = ?termination,
            processed = scan.report.processed,
            accepted = scan.report.accepted,
            skipped_low_reactions = scan.report.skipped_low_reactions,
            skipped_no_media = scan.report.skipped_no_media,
            skipped_out_of_range = scan.report.skipped_out_of_range,
            rate_limit_waits = scan.report.rate_limit_waits,
            "step: acquisition finished"
        );

        Acquired {
            records: scan.records,
            report: scan.report,
            termination,
        }
    }

    /// Page size, shrunk so the scan never requests more than `max_scanned` allows.
    fn page_limit(&self, report: &RunReport, window: &AcquisitionWindow) -> usize {
        match window.max_scanned {
            Some(max) => self.config.page_size.min(max.saturating_sub(report.processed)).max(1),
            None => self.config.page_size,
        }
    }

    /// Fetches the page at the current cursor, sleeping through rate-limit signals.
    async fn fetch_page(
        &mut self,
        channel: &ChannelIdentity,
        scan: &mut Scan,
        limit: usize,
    ) -> Result<Fetched, SourceError> {
        loop {
            let err = match self.source.fetch_page(channel, &scan.cursor, limit).await {
                Ok(page) => return Ok(Fetched::Page(page)),
                Err(err) => err,
            };
            let Some(wait) = self.source.signals_rate_limit(&err) else {
                return Err(err);
            };

            self.transition(PipelineState::Throttled);
            scan.report.rate_limit_waits += 1;
            scan.report.throttled_for += wait;
            warn!(
                wait_secs = wait.as_secs(),
                processed = scan.report.processed,
                accepted = scan.records.len(),
                "Rate limited, waiting before resuming at the same cursor"
            );
            tokio::time::sleep(wait).await;
            self.transition(PipelineState::Streaming);

            if self.is_cancelled() {
                return Ok(Fetched::Cancelled);
            }
        }
    }

    /// Processes one page. Returns the termination when a stop condition triggers.
    async fn consume_page(
        &self,
        page: Vec<RawMessage>,
        channel: &ChannelIdentity,
        window: &AcquisitionWindow,
        scan: &mut Scan,
    ) -> Option<Termination> {
        let mut advanced = false;
        for raw in page {
            if self.is_cancelled() {
                return Some(Termination::Cancelled);
            }
            if scan.cursor.is_consumed(raw.id) {
                warn!(message_id = raw.id, "Source returned an already consumed message, ignoring");
                continue;
            }
            scan.cursor.advance(raw.id);
            advanced = true;
            scan.report.processed += 1;

            if window.is_before_start(raw.date) {
                scan.report.skipped_out_of_range += 1;
                scan.consecutive_out_of_range += 1;
                if scan.consecutive_out_of_range >= self.config.out_of_range_threshold {
                    info!(
                        threshold = self.config.out_of_range_threshold,
                        message_id = raw.id,
                        "Reached start date boundary, stopping early"
                    );
                    return Some(Termination::OutOfRange);
                }
            } else if window.is_after_end(raw.date) {
                scan.report.skipped_out_of_range += 1;
            } else {
                scan.consecutive_out_of_range = 0;
                match normalize(&raw, channel, window) {
                    Normalized::Record(record) => {
                        scan.records.push(record);
                        self.progress
                            .on_progress(scan.report.processed, scan.records.len());
                    }
                    Normalized::Skip(reason) => {
                        debug!(message_id = raw.id, reason = ?reason, "Message skipped");
                        scan.report.record_skip(&reason);
                    }
                }
            }

            if window.max_records.is_some_and(|max| scan.records.len() >= max) {
                return Some(Termination::MaxRecords);
            }
            if window.max_scanned.is_some_and(|max| scan.report.processed >= max) {
                return Some(Termination::MaxScanned);
            }
            if scan.report.processed % self.config.batch_size == 0 {
                debug!(
                    processed = scan.report.processed,
                    delay_ms = self.config.batch_delay.as_millis() as u64,
                    "Batch pause"
                );
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }
        if !advanced {
            warn!(
                before_id = ?scan.cursor.before_id,
                "Page held only consumed messages, treating history as exhausted"
            );
            return Some(Termination::Exhausted);
        }
        None
    }
}
