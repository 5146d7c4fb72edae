//! Unit tests for summarize.
//!
//! Covers the empty case, totals and averages, emoji tallies, media kinds and time slots.

use chrono::{DateTime, TimeZone, Utc, Weekday};
use tgstat_core::{MediaInfo, MediaKind, MessageLink, ReactionEntry, Record};

use crate::stats::{summarize, TOP_EMOJIS};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    // 2024-04-01 is a Monday
    Utc.with_ymd_and_hms(2024, 4, day, hour, 0, 0).unwrap()
}

fn record(id: i64, ts: DateTime<Utc>, reactions: &[(&str, u64)]) -> Record {
    let link = MessageLink {
        deep_link: format!("tg://resolve?domain=chan&post={}", id),
        web_link: format!("https://t.me/chan/{}", id),
    };
    Record::new(id, ts, link).with_reactions(
        reactions
            .iter()
            .map(|(symbol, count)| ReactionEntry::standard(*symbol, *count))
            .collect(),
    )
}

fn with_kind(record: Record, kind: MediaKind) -> Record {
    record.with_media(Some(MediaInfo {
        kind,
        filename: None,
        size_bytes: None,
    }))
}

#[test]
fn test_empty_summary_flags_no_data() {
    let summary = summarize(&[]);
    assert!(summary.no_data);
    assert_eq!(summary.total_records, 0);
    assert_eq!(summary.total_reactions, 0);
    assert_eq!(summary.avg_reactions, 0.0);
    assert_eq!(summary.avg_views, 0.0);
    assert!(summary.top_record.is_none());
    assert!(summary.date_range.is_none());
    assert!(summary.time.best_hour.is_none());
}

#[test]
fn test_totals_and_averages() {
    let records = vec![
        record(1, at(1, 10), &[("👍", 4)]).with_views(Some(100)),
        record(2, at(3, 12), &[("👍", 6), ("🔥", 2)]).with_views(Some(300)),
        record(3, at(2, 9), &[("🔥", 3)]),
    ];
    let summary = summarize(&records);
    assert!(!summary.no_data);
    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.total_reactions, 15);
    assert_eq!(summary.total_views, 400);
    assert_eq!(summary.avg_reactions, 5.0);
    assert!((summary.avg_views - 133.333).abs() < 0.001);
    let span = summary.date_range.unwrap();
    assert_eq!(span.start, at(1, 10));
    assert_eq!(span.end, at(3, 12));
    let top = summary.top_record.unwrap();
    assert_eq!(top.id, 2);
    assert_eq!(top.total_reactions, 8);
    assert_eq!(top.link.web_link, "https://t.me/chan/2");
}

#[test]
fn test_top_record_first_on_ties() {
    let records = vec![
        record(7, at(1, 1), &[("👍", 5)]),
        record(8, at(1, 2), &[("👍", 5)]),
    ];
    assert_eq!(summarize(&records).top_record.unwrap().id, 7);
}

#[test]
fn test_emoji_tallies_merge_identities() {
    let records = vec![
        record(1, at(1, 1), &[("❤\u{FE0F}", 4), ("👍", 1)]),
        record(2, at(1, 2), &[("❤", 2), ("❤\u{FE0F}", 1)]),
        record(3, at(1, 3), &[("👍", 7)]),
    ];
    let reactions = summarize(&records).reactions;
    assert_eq!(reactions.total, 15);
    assert_eq!(reactions.unique_emojis, 2);
    assert_eq!(reactions.emojis[0].identity, "👍");
    assert_eq!(reactions.emojis[0].count, 8);
    assert_eq!(reactions.emojis[0].messages, 2);
    assert_eq!(reactions.emojis[1].identity, "❤");
    assert_eq!(reactions.emojis[1].symbol, "❤\u{FE0F}");
    assert_eq!(reactions.emojis[1].count, 7);
    assert_eq!(reactions.emojis[1].messages, 2);
}

#[test]
fn test_top_emojis_capped() {
    let symbols = ["😀", "😂", "🔥", "👍", "❤", "🎉", "😢", "😡", "🤯", "👏", "💯", "🙏"];
    let reactions: Vec<(&str, u64)> = symbols.iter().enumerate().map(|(i, s)| (*s, i as u64 + 1)).collect();
    let summary = summarize(&[record(1, at(1, 1), &reactions)]);
    assert_eq!(summary.reactions.unique_emojis, symbols.len());
    assert_eq!(summary.reactions.top_emojis.len(), TOP_EMOJIS);
    assert_eq!(summary.reactions.top_emojis[0].identity, "🙏");
}

#[test]
fn test_media_kind_stats() {
    let records = vec![
        with_kind(record(1, at(1, 1), &[("👍", 10)]), MediaKind::Archive).with_views(Some(100)),
        with_kind(record(2, at(1, 2), &[("👍", 20)]), MediaKind::Archive).with_views(Some(100)),
        with_kind(record(3, at(1, 3), &[("👍", 5)]), MediaKind::Video),
        record(4, at(1, 4), &[("👍", 50)]),
    ];
    let media = summarize(&records).media;
    assert_eq!(media.len(), 2);
    assert_eq!(media[0].kind, MediaKind::Archive);
    assert_eq!(media[0].count, 2);
    assert_eq!(media[0].total_reactions, 30);
    assert_eq!(media[0].average_reactions, 15.0);
    assert_eq!(media[0].average_engagement, Some(15.0));
    assert_eq!(media[1].kind, MediaKind::Video);
    assert_eq!(media[1].average_engagement, None);
}

#[test]
fn test_time_distribution_and_best_slot() {
    let records = vec![
        record(1, at(1, 18), &[("👍", 10)]),
        record(2, at(2, 9), &[("👍", 4)]),
        record(3, at(8, 9), &[("👍", 6)]),
        record(4, at(3, 20), &[("👍", 1)]),
    ];
    let time = summarize(&records).time;
    let hours: Vec<(u32, u64, u64)> = time.hours.iter().map(|s| (s.hour, s.count, s.reactions)).collect();
    assert_eq!(hours, vec![(9, 2, 10), (18, 1, 10), (20, 1, 1)]);
    // 18h and 9h tie at 10; 18h was seen first
    assert_eq!(time.best_hour, Some(18));

    let weekdays: Vec<Weekday> = time.weekdays.iter().map(|s| s.weekday).collect();
    assert_eq!(weekdays, vec![Weekday::Mon, Weekday::Tue, Weekday::Wed]);
    assert_eq!(time.weekdays[0].count, 2);
    assert_eq!(time.weekdays[0].reactions, 16);
    assert_eq!(time.best_weekday, Some(Weekday::Mon));
}

#[test]
fn test_summary_serializes_weekday_and_timestamps() {
    let summary = summarize(&[record(1, at(1, 10), &[("👍", 1)])]);
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["date_range"]["start"], "2024-04-01T10:00:00Z");
    assert_eq!(json["time"]["best_weekday"], "Mon");
    assert_eq!(json["no_data"], false);
}

#[test]
fn test_totals_saturate_on_huge_counts() {
    let records = vec![
        record(1, at(1, 10), &[("👍", u64::MAX), ("🔥", u64::MAX)]),
        record(2, at(1, 11), &[("👍", u64::MAX)]),
    ];
    assert_eq!(records[0].total_reactions(), u64::MAX);

    let summary = summarize(&records);
    assert_eq!(summary.total_reactions, u64::MAX);
    assert_eq!(summary.reactions.top_emojis[0].count, u64::MAX);
    assert_eq!(summary.reactions.top_emojis[0].messages, 2);
}
