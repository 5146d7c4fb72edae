//! Analysis parameter types.

mod analysis_query;
mod date_range;
mod sort_field;

pub use analysis_query::AnalysisQuery;
pub use date_range::DateRange;
pub use sort_field::{SortField, SortOrder};
