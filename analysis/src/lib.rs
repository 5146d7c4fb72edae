//! # Analysis
//!
//! Pure transformations over acquired [`tgstat_core::Record`]s. Functions take the
//! working set by value and return a new one, so callers keep their own copy when they
//! need it and derived ranking fields are never written on shared records.
//!
//! ## Modules
//!
//! - [`error`] – AnalysisError
//! - [`models`] – AnalysisQuery, DateRange, SortField, SortOrder
//! - [`sort`] – Rankings by reactions, views, replies, engagement rate, selected emoji
//! - [`filter`] – Media kind, date range and keyword filters
//! - [`stats`] – `summarize` into a StatisticsSummary
//! - [`query`] – AnalysisQuery execution

pub mod error;
pub mod filter;
pub mod models;
pub mod query;
pub mod sort;
pub mod stats;

#[cfg(test)]
mod stats_test;

pub use error::AnalysisError;
pub use filter::{filter_by_date_range, filter_by_keyword, filter_by_media_kind};
pub use models::{AnalysisQuery, DateRange, SortField, SortOrder};
pub use sort::{
    sort, sort_by_engagement_rate, sort_by_reactions, sort_by_replies, sort_by_selected_emoji,
    sort_by_views, top_n, SortKey,
};
pub use stats::{summarize, TOP_EMOJIS};
