//! # Acquisition
//!
//! Streams a channel's history newest first, normalizes each message into a
//! [`tgstat_core::Record`] and stops on the first of: record limit, scan limit, exhausted
//! history, start-date boundary, cancellation, unrecoverable source error.
//!
//! ## Modules
//!
//! - [`config`] – AcquisitionConfig, RunReport, Termination, RunOutcome
//! - [`normalizer`] – RawMessage → Record decisions
//! - [`pipeline`] – Acquisition state machine (paging, rate-limit waits, pacing)
//! - [`progress`] – ProgressSink implementations

pub mod config;
pub mod normalizer;
pub mod pipeline;
pub mod progress;


pub use config::{
    Acquired, AcquisitionConfig, PartialReason, RunOutcome, RunReport, Termination,
};
pub use normalizer::{normalize, Normalized, SkipReason};
pub use pipeline::{Acquisition, PipelineState};
pub use progress::{LogProgress, ProgressSnapshot, WatchProgress};

use tgstat_core::{AcquisitionWindow, ChannelResolver};
use tracing::{info, warn};

/// Resolves `identifier` and runs `acquisition` over it.
///
/// # Flow
///
/// 1. Resolve the channel; on failure return [`RunOutcome::AbortedBeforeStart`].
/// 2. Run the scan with `window`.
/// 3. Classify the result: cancellation and source errors give [`RunOutcome::Partial`]
///    with every record accepted so far, any other stop gives [`RunOutcome::Completed`].
pub async fn acquire(
    resolver: &dyn ChannelResolver,
    acquisition: &mut Acquisition,
    identifier: &str,
    window: &AcquisitionWindow,
) -> RunOutcome {
    info!(identifier = %identifier, "Resolving channel");
    let channel = match resolver.resolve(identifier).await {
        Ok(channel) => channel,
        Err(err) => {
            warn!(identifier = %identifier, error = %err, "Channel resolution failed");
            return RunOutcome::AbortedBeforeStart(err);
        }
    };
    info!(
        channel_id = channel.id,
        title = %channel.title,
        username = ?channel.username,
        is_broadcast = channel.is_broadcast,
        "Channel resolved"
    );

    let acquired = acquisition.run(&channel, window).await;
    RunOutcome::from_acquired(channel, acquired)
}
