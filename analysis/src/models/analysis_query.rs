//! Filters, ranking and cut-off applied to an acquired record set.
//!
//! Executed by [`AnalysisQuery::apply`](crate::query).

use serde::{Deserialize, Serialize};
use tgstat_core::MediaKind;

use super::{DateRange, SortField, SortOrder};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisQuery {
    /// Allowed media kinds; empty keeps every kind.
    pub media_kinds: Vec<MediaKind>,
    pub date_range: Option<DateRange>,
    /// Any-of substring match; empty disables the keyword filter.
    pub keywords: Vec<String>,
    pub case_sensitive: bool,
    pub sort_by: SortField,
    /// Rank by these emoji instead of `sort_by` when non-empty.
    pub emojis: Vec<String>,
    pub order: SortOrder,
    pub top: Option<usize>,
}
