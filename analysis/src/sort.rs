//! Rankings over an owned working set.
//!
//! Every sort is stable (input order breaks ties) and writes the key it ranked on into
//! `metrics.rank_score`, overwriting the value of any previous sort. Derived fields are
//! recomputed from the core fields on each call, so re-sorting unchanged input yields
//! identical values.

use std::cmp::Ordering;

use emoji_identity::EmojiTargets;
use tgstat_core::Record;
use tracing::debug;

use crate::models::{SortField, SortOrder};

/// What a ranking is computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Reactions,
    Views,
    Replies,
    Engagement,
    /// Sum of reactions matching the targets.
    SelectedEmoji(EmojiTargets),
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Reactions => SortKey::Reactions,
            SortField::Views => SortKey::Views,
            SortField::Replies => SortKey::Replies,
            SortField::Engagement => SortKey::Engagement,
        }
    }
}

fn rank(mut records: Vec<Record>, order: SortOrder, score: impl Fn(&Record) -> f64) -> Vec<Record> {
    for record in &mut records {
        record.metrics.rank_score = Some(score(record));
    }
    records.sort_by(|a, b| {
        let ord = compare_scores(a, b);
        match order {
            SortOrder::Descending => ord.reverse(),
            SortOrder::Ascending => ord,
        }
    });
    records
}

fn compare_scores(a: &Record, b: &Record) -> Ordering {
    let a = a.metrics.rank_score.unwrap_or(0.0);
    let b = b.metrics.rank_score.unwrap_or(0.0);
    a.total_cmp(&b)
}

pub fn sort_by_reactions(records: Vec<Record>, order: SortOrder) -> Vec<Record> {
    rank(records, order, |r| r.total_reactions() as f64)
}

/// Drops records without a view count (or zero views), then ranks by views.
pub fn sort_by_views(records: Vec<Record>, order: SortOrder) -> Vec<Record> {
    let with_views: Vec<Record> = records
        .into_iter()
        .filter(|r| r.views().is_some_and(|v| v > 0))
        .collect();
    rank(with_views, order, |r| r.views().unwrap_or(0) as f64)
}

/// Missing reply counts rank as zero.
pub fn sort_by_replies(records: Vec<Record>, order: SortOrder) -> Vec<Record> {
    rank(records, order, |r| r.reply_count().unwrap_or(0) as f64)
}

/// Keeps records with `views > 0`, writes `engagement_rate = reactions / views * 100`
/// and ranks by it.
pub fn sort_by_engagement_rate(records: Vec<Record>, order: SortOrder) -> Vec<Record> {
    let mut with_views: Vec<Record> = Vec::with_capacity(records.len());
    for mut record in records {
        let Some(views) = record.views().filter(|v| *v > 0) else {
            continue;
        };
        record.metrics.engagement_rate = Some(engagement_rate(record.total_reactions(), views));
        with_views.push(record);
    }
    rank(with_views, order, |r| r.metrics.engagement_rate.unwrap_or(0.0))
}

pub(crate) fn engagement_rate(reactions: u64, views: u64) -> f64 {
    reactions as f64 / views as f64 * 100.0
}

/// Writes `selected_emoji_count` (sum of counts of reactions matching `targets`) and
/// ranks by it. Records without matches stay in the set with a count of zero.
pub fn sort_by_selected_emoji(
    mut records: Vec<Record>,
    targets: &EmojiTargets,
    order: SortOrder,
) -> Vec<Record> {
    for record in &mut records {
        record.metrics.selected_emoji_count = Some(record.count_matching(targets));
    }
    rank(records, order, |r| r.metrics.selected_emoji_count.unwrap_or(0) as f64)
}

/// Dispatches to the sort for `key`.
pub fn sort(records: Vec<Record>, key: &SortKey, order: SortOrder) -> Vec<Record> {
    debug!(key = ?key, order = ?order, records = records.len(), "Sorting records");
    match key {
        SortKey::Reactions => sort_by_reactions(records, order),
        SortKey::Views => sort_by_views(records, order),
        SortKey::Replies => sort_by_replies(records, order),
        SortKey::Engagement => sort_by_engagement_rate(records, order),
        SortKey::SelectedEmoji(targets) => sort_by_selected_emoji(records, targets, order),
    }
}

/// First `n` records of an already ranked set.
pub fn top_n(mut records: Vec<Record>, n: usize) -> Vec<Record> {
    records.truncate(n);
    records
}
