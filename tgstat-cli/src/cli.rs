//! CLI parser and the mapping from flags to acquisition window and analysis query.

use std::path::PathBuf;

use analysis::{AnalysisQuery, DateRange, SortField};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tgstat_core::{AcquisitionWindow, MediaKind};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "tgstat")]
#[command(about = "Telegram channel reaction statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a channel from a dump, rank its posts and print/export statistics.
    Analyze(AnalyzeArgs),
    /// List the channels contained in a dump.
    Channels {
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    None,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Channel dump (JSON) to read history from.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Channel username, link or id; may be omitted when the dump holds one channel.
    #[arg(short, long)]
    pub channel: Option<String>,

    /// Maximum messages to scan (default: MAX_MESSAGES).
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Stop once this many records were accepted.
    #[arg(long)]
    pub max_records: Option<usize>,

    /// Minimum total reactions (default: MIN_REACTIONS).
    #[arg(short, long)]
    pub min_reactions: Option<u64>,

    /// Include posts without media.
    #[arg(long)]
    pub no_media: bool,

    /// Only posts from the last N days.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub days: Option<u32>,

    /// First day to include (YYYY-MM-DD, UTC).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD, UTC, whole day).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// reactions | views | engagement | replies
    #[arg(long, default_value = "reactions")]
    pub sort_by: SortField,

    /// Rank by these emoji instead of --sort-by (repeatable).
    #[arg(long)]
    pub emoji: Vec<String>,

    /// Media kinds to keep, comma separated (e.g. archive,video).
    #[arg(long, value_delimiter = ',')]
    pub filter_type: Vec<MediaKind>,

    /// Keywords searched in text and file name, comma separated.
    #[arg(short, long, value_delimiter = ',')]
    pub keyword: Vec<String>,

    #[arg(long)]
    pub case_sensitive: bool,

    /// Posts shown in the terminal report (default: TOP_N_DISPLAY).
    #[arg(short, long)]
    pub top: Option<usize>,

    #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
    pub export: ExportFormat,

    /// Export file name without extension, written to OUTPUT_DIR.
    #[arg(short, long, default_value = "top_messages")]
    pub output: String,

    /// Skip the terminal report and progress lines.
    #[arg(short, long)]
    pub quiet: bool,
}

impl AnalyzeArgs {
    /// Date filter from `--days` or `--from/--to`, `None` when unbounded.
    pub fn date_range(&self, now: DateTime<Utc>) -> Result<Option<DateRange>> {
        if let Some(days) = self.days {
            return Ok(Some(DateRange::last_days(days, now)?));
        }
        if self.from.is_none() && self.to.is_none() {
            return Ok(None);
        }
        let start = self.from.map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let end = match self.to {
            Some(d) => Some(
                d.and_hms_nano_opt(23, 59, 59, 999_999_999)
                    .context("End of the --to day")?
                    .and_utc(),
            ),
            None => None,
        };
        Ok(Some(DateRange::new(start, end)?))
    }

    pub fn window(&self, config: &AppConfig, range: Option<&DateRange>) -> AcquisitionWindow {
        AcquisitionWindow {
            min_reactions: self.min_reactions.unwrap_or(config.min_reactions),
            media_only: config.media_only && !self.no_media,
            start_date: range.and_then(|r| r.start),
            end_date: range.and_then(|r| r.end),
            max_records: self.max_records,
            max_scanned: Some(self.limit.unwrap_or(config.max_messages)),
        }
    }

    pub fn query(&self, range: Option<DateRange>) -> AnalysisQuery {
        AnalysisQuery {
            media_kinds: self.filter_type.clone(),
            date_range: range,
            keywords: self
                .keyword
                .iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
            case_sensitive: self.case_sensitive,
            sort_by: self.sort_by,
            emojis: self.emoji.clone(),
            ..AnalysisQuery::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn parse(args: &[&str]) -> AnalyzeArgs {
        let mut argv = vec!["tgstat", "analyze", "--input", "dump.json"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Analyze(args) => args,
            Commands::Channels { .. } => panic!("expected analyze"),
        }
    }

    fn config() -> AppConfig {
        AppConfig {
            min_reactions: 5,
            media_only: true,
            max_messages: 1000,
            batch_size: 100,
            batch_delay: std::time::Duration::from_secs(1),
            page_size: 100,
            out_of_range_threshold: 10,
            top_n_display: 20,
            output_dir: PathBuf::from("output"),
            log_file: "logs/tgstat.log".to_string(),
        }
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.sort_by, SortField::Reactions);
        assert_eq!(args.export, ExportFormat::Json);
        assert_eq!(args.output, "top_messages");

        let window = args.window(&config(), None);
        assert_eq!(window.min_reactions, 5);
        assert!(window.media_only);
        assert_eq!(window.max_scanned, Some(1000));
        assert_eq!(window.max_records, None);
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "--limit", "50", "-m", "2", "--no-media", "--max-records", "7", "--sort-by", "views",
            "--filter-type", "archive,video", "-k", "game, patch", "--emoji", "🔥", "--emoji", "👍",
        ]);
        let window = args.window(&config(), None);
        assert_eq!(window.min_reactions, 2);
        assert!(!window.media_only);
        assert_eq!(window.max_scanned, Some(50));
        assert_eq!(window.max_records, Some(7));

        let query = args.query(None);
        assert_eq!(query.sort_by, SortField::Views);
        assert_eq!(query.media_kinds, vec![MediaKind::Archive, MediaKind::Video]);
        assert_eq!(query.keywords, vec!["game", "patch"]);
        assert_eq!(query.emojis, vec!["🔥", "👍"]);
    }

    #[test]
    fn test_unknown_values_rejected() {
        let base = ["tgstat", "analyze", "--input", "d.json"];
        let with = |extra: &[&str]| {
            let mut argv = base.to_vec();
            argv.extend_from_slice(extra);
            Cli::try_parse_from(argv).is_err()
        };
        assert!(with(&["--sort-by", "likes"]));
        assert!(with(&["--filter-type", "hologram"]));
        assert!(with(&["--days", "3", "--from", "2024-01-01"]));
        assert!(with(&["--from", "yesterday"]));
    }

    #[test]
    fn test_days_range() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let range = parse(&["--days", "7"]).date_range(now).unwrap().unwrap();
        assert_eq!(range, DateRange::last_days(7, now).unwrap());

        let window = parse(&["--days", "7"]).window(&config(), Some(&range));
        assert_eq!(window.start_date, Some(now - Duration::days(7)));
        assert_eq!(window.end_date, Some(now));
    }

    #[test]
    fn test_from_to_covers_whole_days() {
        let now = Utc::now();
        let range = parse(&["--from", "2024-03-01", "--to", "2024-03-31"])
            .date_range(now)
            .unwrap()
            .unwrap();
        assert_eq!(range.start, Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()));

        assert!(parse(&[]).date_range(now).unwrap().is_none());
        assert!(parse(&["--from", "2024-05-01", "--to", "2024-04-01"])
            .date_range(now)
            .is_err());
    }

    #[test]
    fn test_extreme_dates_are_errors_not_panics() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert!(parse(&["--days", "4294967295"]).date_range(now).is_err());

        let mut args = parse(&[]);
        args.to = Some(NaiveDate::MAX);
        let range = args.date_range(now).unwrap().unwrap();
        assert_eq!(range.end.map(|e| e.date_naive()), Some(NaiveDate::MAX));
    }
}
