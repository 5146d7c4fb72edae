//! Named sort fields and direction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Record field a ranking is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Reactions,
    Views,
    Replies,
    Engagement,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Reactions => "reactions",
            SortField::Views => "views",
            SortField::Replies => "replies",
            SortField::Engagement => "engagement",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reactions" => Ok(SortField::Reactions),
            "views" => Ok(SortField::Views),
            "replies" => Ok(SortField::Replies),
            "engagement" | "engagement_rate" => Ok(SortField::Engagement),
            _ => Err(AnalysisError::UnknownSortField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}
