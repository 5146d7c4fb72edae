//! Aggregate statistics over a record collection.
//!
//! Produced by `analysis::summarize`; consumed by report and export sinks.

use chrono::{DateTime, Utc, Weekday};
use serde::Serialize;

use crate::types::{MediaKind, MessageLink};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    /// True when the summary was built from an empty collection.
    pub no_data: bool,
    pub total_records: usize,
    pub total_reactions: u64,
    pub total_views: u64,
    pub avg_reactions: f64,
    pub avg_views: f64,
    pub date_range: Option<DateSpan>,
    /// Record with the most reactions (first one on ties).
    pub top_record: Option<TopRecord>,
    pub reactions: ReactionStats,
    pub media: Vec<MediaKindStats>,
    pub time: TimeStats,
}

impl StatisticsSummary {
    /// Summary of an empty collection.
    pub fn empty() -> Self {
        Self {
            no_data: true,
            total_records: 0,
            total_reactions: 0,
            total_views: 0,
            avg_reactions: 0.0,
            avg_views: 0.0,
            date_range: None,
            top_record: None,
            reactions: ReactionStats::default(),
            media: Vec::new(),
            time: TimeStats::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopRecord {
    pub id: i64,
    pub total_reactions: u64,
    pub link: MessageLink,
}

/// Aggregate of one emoji identity across all records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmojiTally {
    pub identity: String,
    /// Raw symbol first seen for this identity.
    pub symbol: String,
    pub count: u64,
    /// Number of records carrying this emoji.
    pub messages: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReactionStats {
    pub total: u64,
    pub unique_emojis: usize,
    /// All identities by aggregate count, descending.
    pub emojis: Vec<EmojiTally>,
    pub top_emojis: Vec<EmojiTally>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaKindStats {
    pub kind: MediaKind,
    pub count: u64,
    pub total_reactions: u64,
    pub average_reactions: f64,
    /// Mean engagement rate of records of this kind that have views.
    pub average_engagement: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourSlot {
    pub hour: u32,
    pub count: u64,
    pub reactions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdaySlot {
    pub weekday: Weekday,
    pub count: u64,
    pub reactions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    /// Ordered by hour.
    pub hours: Vec<HourSlot>,
    /// Ordered Monday first.
    pub weekdays: Vec<WeekdaySlot>,
    pub best_hour: Option<u32>,
    pub best_weekday: Option<Weekday>,
}
