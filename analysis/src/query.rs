//! Runs an [`AnalysisQuery`] over a working set: filters, then ranking, then cut-off.

use emoji_identity::EmojiTargets;
use tgstat_core::Record;
use tracing::info;

use crate::filter::{filter_by_date_range, filter_by_keyword, filter_by_media_kind};
use crate::models::AnalysisQuery;
use crate::sort::{sort, top_n, SortKey};

impl AnalysisQuery {
    /// Ranking key: selected emoji when any are given, otherwise `sort_by`.
    pub fn sort_key(&self) -> SortKey {
        let targets = EmojiTargets::expand(&self.emojis);
        if targets.is_empty() {
            SortKey::from(self.sort_by)
        } else {
            SortKey::SelectedEmoji(targets)
        }
    }

    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        let input = records.len();
        let mut records = records;

        if !self.media_kinds.is_empty() {
            records = filter_by_media_kind(records, &self.media_kinds);
        }
        if let Some(range) = &self.date_range {
            records = filter_by_date_range(records, range);
        }
        if !self.keywords.is_empty() {
            records = filter_by_keyword(records, &self.keywords, self.case_sensitive);
        }
        let filtered = records.len();

        let mut ranked = sort(records, &self.sort_key(), self.order);
        if let Some(n) = self.top {
            ranked = top_n(ranked, n);
        }

        info!(
            input,
            filtered,
            ranked = ranked.len(),
            sort_by = %self.sort_by,
            emojis = self.emojis.len(),
            "step: analysis query applied"
        );
        ranked
    }
}
