//! Command handlers: acquisition over a dump, analysis, report emission.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use acquisition::{acquire, Acquisition, LogProgress, PartialReason, RunOutcome, RunReport};
use analysis::summarize;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tgstat_core::{
    ChannelIdentity, NoopProgress, ProgressSink, Record, Report, ReportSink, StatisticsSummary,
};
use tracing::{info, instrument, warn};

use crate::cli::{AnalyzeArgs, ExportFormat};
use crate::config::AppConfig;
use crate::export::{JsonExporter, TerminalReport};
use crate::replay::ReplayArchive;

/// Result of `tgstat analyze`.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub channel: ChannelIdentity,
    /// Filtered and ranked.
    pub records: Vec<Record>,
    pub statistics: StatisticsSummary,
    pub run: RunReport,
    /// Set when the scan was cancelled or aborted; records are what was accepted before.
    pub partial: Option<PartialReason>,
}

impl Analysis {
    pub fn report(&self) -> Report<'_> {
        Report {
            channel: &self.channel,
            statistics: &self.statistics,
            records: &self.records,
        }
    }
}

/// Picks the channel to analyze: the flag, or the only channel of the dump.
fn target_channel(args: &AnalyzeArgs, archive: &ReplayArchive) -> Result<String> {
    if let Some(channel) = &args.channel {
        return Ok(channel.clone());
    }
    match archive.channels() {
        [only] => Ok(only.identity.id.to_string()),
        channels => anyhow::bail!(
            "The dump holds {} channels; choose one with --channel (see `tgstat channels`)",
            channels.len()
        ),
    }
}

/// Acquires, filters, ranks and summarizes one channel from `args.input`.
#[instrument(skip_all, fields(input = %args.input.display()))]
pub async fn run_analyze(args: &AnalyzeArgs, config: &AppConfig, now: DateTime<Utc>) -> Result<Analysis> {
    let archive = Arc::new(ReplayArchive::load(&args.input)?);
    let identifier = target_channel(args, &archive)?;

    let range = args.date_range(now)?;
    let window = args.window(config, range.as_ref());
    let progress: Arc<dyn ProgressSink> = if args.quiet {
        Arc::new(NoopProgress)
    } else {
        Arc::new(LogProgress::new(config.batch_size))
    };
    let mut acquisition =
        Acquisition::new(archive.clone(), config.acquisition_config()).with_progress(progress);

    let cancel = acquisition.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing with the records accepted so far");
            cancel.store(true, Ordering::Relaxed);
        }
    });
    let outcome = acquire(&*archive, &mut acquisition, &identifier, &window).await;
    interrupt.abort();

    let (channel, acquired, partial) = match outcome {
        RunOutcome::Completed { channel, acquired } => (channel, acquired, None),
        RunOutcome::Partial {
            channel,
            acquired,
            reason,
        } => {
            warn!(reason = ?reason, accepted = acquired.records.len(), "Scan ended early");
            (channel, acquired, Some(reason))
        }
        RunOutcome::AbortedBeforeStart(err) => {
            return Err(err).with_context(|| format!("Resolve channel {:?}", identifier));
        }
    };

    let query = args.query(range);
    let records = query.apply(acquired.records);
    let statistics = summarize(&records);

    info!(
        channel_id = channel.id,
        processed = acquired.report.processed,
        accepted = acquired.report.accepted,
        ranked = records.len(),
        "step: analysis finished"
    );

    Ok(Analysis {
        channel,
        records,
        statistics,
        run: acquired.report,
        partial,
    })
}

/// Prints the terminal report and writes the export. Returns the export path, if any.
pub fn emit_reports(analysis: &Analysis, args: &AnalyzeArgs, config: &AppConfig) -> Result<Option<PathBuf>> {
    let report = analysis.report();
    if !args.quiet {
        TerminalReport::new(args.top.unwrap_or(config.top_n_display))
            .emit(&report)
            .context("Print report")?;
    }
    match args.export {
        ExportFormat::Json => {
            let exporter = JsonExporter::new(&config.output_dir, &args.output);
            exporter.emit(&report).context("Export JSON")?;
            Ok(Some(exporter.path()))
        }
        ExportFormat::None => Ok(None),
    }
}

/// Lists the channels of a dump.
pub fn run_channels(input: &Path) -> Result<()> {
    let archive = ReplayArchive::load(input)?;
    println!("{:<16} {:<24} {:<10} {:>8}  TITLE", "ID", "USERNAME", "TYPE", "MESSAGES");
    for channel in archive.channels() {
        let identity = &channel.identity;
        let kind = match (identity.is_broadcast, channel.accessible) {
            (_, false) => "private",
            (true, true) => "channel",
            (false, true) => "group",
        };
        println!(
            "{:<16} {:<24} {:<10} {:>8}  {}",
            identity.id,
            identity.username.as_deref().map(|u| format!("@{}", u)).unwrap_or_default(),
            kind,
            archive.message_count(identity.id),
            identity.title
        );
    }
    Ok(())
}
