//! [`ReportSink`] implementations: JSON file export and the terminal report.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use chrono::Weekday;
use tgstat_core::{Record, Report, ReportSink, Result, StatisticsSummary, TgstatError};
use tracing::info;

/// Writes `{ channel, statistics, records }` as pretty JSON to `<dir>/<stem>.json`.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
    file_stem: String,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>, file_stem: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_stem: file_stem.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.json", self.file_stem))
    }
}

impl ReportSink for JsonExporter {
    fn emit(&self, report: &Report<'_>) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| TgstatError::Export(format!("serialize report: {}", e)))?;
        let path = self.path();
        fs::write(&path, json)?;
        info!(path = %path.display(), records = report.records.len(), "Report exported");
        Ok(())
    }
}

const PREVIEW_CHARS: usize = 60;
const SEPARATOR_WIDTH: usize = 60;

/// Prints the top records and the statistics summary to stdout.
#[derive(Debug, Clone)]
pub struct TerminalReport {
    top_n: usize,
}

impl TerminalReport {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn render(&self, report: &Report<'_>) -> String {
        let mut out = String::new();
        let rule = "=".repeat(SEPARATOR_WIDTH);
        let _ = writeln!(out, "\n{}\n  {} | Top {}\n{}\n", rule, report.channel.title, self.top_n, rule);
        for (rank, record) in report.records.iter().take(self.top_n).enumerate() {
            render_record(&mut out, rank + 1, record);
        }
        render_statistics(&mut out, report.statistics);
        out
    }
}

impl ReportSink for TerminalReport {
    fn emit(&self, report: &Report<'_>) -> Result<()> {
        print!("{}", self.render(report));
        Ok(())
    }
}

fn render_record(out: &mut String, rank: usize, record: &Record) {
    let mut header = format!("#{} | 🔥 {} reactions", rank, record.total_reactions());
    if let Some(views) = record.views().filter(|v| *v > 0) {
        let _ = write!(header, " | 👁 {} views", views);
    }
    if let Some(rate) = record.metrics.engagement_rate {
        let _ = write!(header, " | {:.2}%", rate);
    }
    if let Some(selected) = record.metrics.selected_emoji_count {
        let _ = write!(header, " | ⭐ {}", selected);
    }
    let _ = writeln!(out, "{}", header);

    if !record.text().is_empty() {
        let _ = writeln!(out, "   📝 {}", preview(record.text()));
    }
    if let Some(media) = record.media() {
        let mut line = format!("   📎 [{}]", media.kind);
        if let Some(name) = &media.filename {
            let _ = write!(line, " {}", name);
        }
        if let Some(size) = media.size_bytes {
            let _ = write!(line, " ({})", megabytes(size));
        }
        let _ = writeln!(out, "{}", line);
    }
    if !record.reactions().is_empty() {
        let detail: Vec<String> = record
            .reactions()
            .iter()
            .map(|r| format!("{}×{}", r.symbol_raw, r.count))
            .collect();
        let _ = writeln!(out, "   💬 {}", detail.join(" "));
    }
    let _ = writeln!(out, "   🔗 {}\n", record.link());
}

fn render_statistics(out: &mut String, stats: &StatisticsSummary) {
    let _ = writeln!(out, "📊 Statistics");
    if stats.no_data {
        let _ = writeln!(out, "   No data");
        return;
    }
    let _ = writeln!(out, "   Records: {}", stats.total_records);
    let _ = writeln!(
        out,
        "   Reactions: {} (avg {:.1})",
        stats.total_reactions, stats.avg_reactions
    );
    let _ = writeln!(out, "   Views: {} (avg {:.1})", stats.total_views, stats.avg_views);
    if let Some(span) = &stats.date_range {
        let _ = writeln!(
            out,
            "   Period: {} .. {}",
            span.start.format("%Y-%m-%d"),
            span.end.format("%Y-%m-%d")
        );
    }
    if let Some(top) = &stats.top_record {
        let _ = writeln!(out, "   Top post: {} ({} reactions)", top.link, top.total_reactions);
    }
    if !stats.reactions.top_emojis.is_empty() {
        let top: Vec<String> = stats
            .reactions
            .top_emojis
            .iter()
            .take(5)
            .map(|e| format!("{} {}", e.symbol, e.count))
            .collect();
        let _ = writeln!(out, "   Top emoji: {}", top.join(", "));
    }
    for media in &stats.media {
        let _ = writeln!(
            out,
            "   {}: {} posts, avg {:.1} reactions",
            media.kind, media.count, media.average_reactions
        );
    }
    if let Some(hour) = stats.time.best_hour {
        let _ = writeln!(out, "   Best hour: {:02}:00 UTC", hour);
    }
    if let Some(weekday) = stats.time.best_weekday {
        let _ = writeln!(out, "   Best weekday: {}", weekday_label(weekday));
    }
}

/// First characters of `text` on one line.
fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

fn megabytes(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
