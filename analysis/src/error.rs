use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Unknown sort field: {0} (expected reactions, views, replies or engagement)")]
    UnknownSortField(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
}
