//! Single-pass aggregation into a [`StatisticsSummary`].

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Timelike, Weekday};
use tgstat_core::{
    DateSpan, EmojiTally, HourSlot, MediaKind, MediaKindStats, ReactionStats, Record,
    StatisticsSummary, TimeStats, TopRecord, WeekdaySlot,
};
use tracing::debug;

use crate::sort::engagement_rate;

/// Number of identities listed in `ReactionStats::top_emojis`.
pub const TOP_EMOJIS: usize = 10;

#[derive(Default)]
struct MediaAcc {
    count: u64,
    reactions: u64,
    engagement_sum: f64,
    with_views: u64,
}

/// Accumulates per-key counts and reactions, remembering first-encounter order.
struct SlotAcc<K> {
    order: Vec<K>,
    slots: HashMap<K, (u64, u64)>,
}

impl<K: Copy + Eq + std::hash::Hash> SlotAcc<K> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            slots: HashMap::new(),
        }
    }

    fn add(&mut self, key: K, reactions: u64) {
        let slot = self.slots.entry(key).or_insert_with(|| {
            self.order.push(key);
            (0, 0)
        });
        slot.0 += 1;
        slot.1 = slot.1.saturating_add(reactions);
    }

    /// Key with the most reactions; the first-encountered key wins ties.
    fn best(&self) -> Option<K> {
        let mut best: Option<(K, u64)> = None;
        for key in &self.order {
            let reactions = self.slots[key].1;
            if best.map_or(true, |(_, top)| reactions > top) {
                best = Some((*key, reactions));
            }
        }
        best.map(|(key, _)| key)
    }
}

/// Aggregates `records`. An empty slice yields [`StatisticsSummary::empty`].
pub fn summarize(records: &[Record]) -> StatisticsSummary {
    if records.is_empty() {
        return StatisticsSummary::empty();
    }

    let mut total_reactions = 0u64;
    let mut total_views = 0u64;
    let mut first = records[0].timestamp();
    let mut last = first;
    let mut top: &Record = &records[0];

    let mut emojis: Vec<EmojiTally> = Vec::new();
    let mut emoji_index: HashMap<String, usize> = HashMap::new();

    let mut media_order: Vec<MediaKind> = Vec::new();
    let mut media: HashMap<MediaKind, MediaAcc> = HashMap::new();

    let mut hours: SlotAcc<u32> = SlotAcc::new();
    let mut weekdays: SlotAcc<Weekday> = SlotAcc::new();

    for record in records {
        let reactions = record.total_reactions();
        total_reactions = total_reactions.saturating_add(reactions);
        total_views = total_views.saturating_add(record.views().unwrap_or(0));

        let ts = record.timestamp();
        first = first.min(ts);
        last = last.max(ts);
        if reactions > top.total_reactions() {
            top = record;
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for entry in record.reactions() {
            let idx = *emoji_index
                .entry(entry.symbol_identity.clone())
                .or_insert_with(|| {
                    emojis.push(EmojiTally {
                        identity: entry.symbol_identity.clone(),
                        symbol: entry.symbol_raw.clone(),
                        count: 0,
                        messages: 0,
                    });
                    emojis.len() - 1
                });
            emojis[idx].count = emojis[idx].count.saturating_add(entry.count);
            if seen.insert(entry.symbol_identity.as_str()) {
                emojis[idx].messages += 1;
            }
        }

        let kind = record.media_kind();
        if kind != MediaKind::None {
            let acc = media.entry(kind).or_insert_with(|| {
                media_order.push(kind);
                MediaAcc::default()
            });
            acc.count += 1;
            acc.reactions = acc.reactions.saturating_add(reactions);
            if let Some(views) = record.views().filter(|v| *v > 0) {
                acc.engagement_sum += engagement_rate(reactions, views);
                acc.with_views += 1;
            }
        }

        hours.add(ts.hour(), reactions);
        weekdays.add(ts.weekday(), reactions);
    }

    // stable: equal counts keep first-encountered order
    emojis.sort_by(|a, b| b.count.cmp(&a.count));
    let top_emojis: Vec<EmojiTally> = emojis.iter().take(TOP_EMOJIS).cloned().collect();

    let media_stats: Vec<MediaKindStats> = media_order
        .iter()
        .filter_map(|kind| media.get(kind).map(|acc| (*kind, acc)))
        .map(|(kind, acc)| MediaKindStats {
            kind,
            count: acc.count,
            total_reactions: acc.reactions,
            average_reactions: acc.reactions as f64 / acc.count as f64,
            average_engagement: (acc.with_views > 0)
                .then(|| acc.engagement_sum / acc.with_views as f64),
        })
        .collect();

    let time = time_stats(&hours, &weekdays);
    let total_records = records.len();

    debug!(
        total_records,
        total_reactions,
        unique_emojis = emojis.len(),
        "Statistics summarized"
    );

    StatisticsSummary {
        no_data: false,
        total_records,
        total_reactions,
        total_views,
        avg_reactions: total_reactions as f64 / total_records as f64,
        avg_views: total_views as f64 / total_records as f64,
        date_range: Some(DateSpan {
            start: first,
            end: last,
        }),
        top_record: Some(TopRecord {
            id: top.id(),
            total_reactions: top.total_reactions(),
            link: top.link().clone(),
        }),
        reactions: ReactionStats {
            total: total_reactions,
            unique_emojis: emojis.len(),
            emojis,
            top_emojis,
        },
        media: media_stats,
        time,
    }
}

fn time_stats(hours: &SlotAcc<u32>, weekdays: &SlotAcc<Weekday>) -> TimeStats {
    let mut hour_slots: Vec<HourSlot> = hours
        .slots
        .iter()
        .map(|(hour, (count, reactions))| HourSlot {
            hour: *hour,
            count: *count,
            reactions: *reactions,
        })
        .collect();
    hour_slots.sort_by_key(|slot| slot.hour);

    let mut weekday_slots: Vec<WeekdaySlot> = weekdays
        .slots
        .iter()
        .map(|(weekday, (count, reactions))| WeekdaySlot {
            weekday: *weekday,
            count: *count,
            reactions: *reactions,
        })
        .collect();
    weekday_slots.sort_by_key(|slot| slot.weekday.num_days_from_monday());

    TimeStats {
        hours: hour_slots,
        weekdays: weekday_slots,
        best_hour: hours.best(),
        best_weekday: weekdays.best(),
    }
}
