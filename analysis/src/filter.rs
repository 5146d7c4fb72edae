//! Filters over an owned working set. Input order is preserved.

use tgstat_core::{MediaKind, Record};

use crate::models::DateRange;

/// Keeps records whose media kind is in `kinds`.
pub fn filter_by_media_kind(records: Vec<Record>, kinds: &[MediaKind]) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| kinds.contains(&r.media_kind()))
        .collect()
}

/// Keeps records with `timestamp` inside `range` (inclusive).
pub fn filter_by_date_range(records: Vec<Record>, range: &DateRange) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| range.contains(r.timestamp()))
        .collect()
}

/// Keeps records where any keyword is a substring of `"{text} {filename}"`.
///
/// Case-insensitive unless `case_sensitive` is set. An empty keyword list keeps nothing.
pub fn filter_by_keyword<S: AsRef<str>>(
    records: Vec<Record>,
    keywords: &[S],
    case_sensitive: bool,
) -> Vec<Record> {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| fold_case(k.as_ref(), case_sensitive))
        .collect();
    records
        .into_iter()
        .filter(|r| {
            let haystack = fold_case(
                &format!("{} {}", r.text(), r.filename().unwrap_or_default()),
                case_sensitive,
            );
            keywords.iter().any(|k| haystack.contains(k.as_str()))
        })
        .collect()
}

fn fold_case(s: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        s.to_string()
    } else {
        s.to_lowercase()
    }
}
