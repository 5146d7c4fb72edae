//! Platform collaborators: paged message source and channel resolver.
//!
//! Both traits are transport-agnostic; the CLI provides a replay implementation over a
//! JSON dump, a live client would map them onto the platform API (history paging with
//! `offset_id`/`offset_date`, entity lookup).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{ResolveError, SourceError};
use crate::types::{ChannelIdentity, RawMessage};

/// Position in a reverse-chronological history scan.
///
/// A page requested at a cursor contains only messages behind it. The
/// pipeline advances the cursor past every consumed message, so re-requesting a page
/// at the same cursor (after a rate-limit wait) never repeats or skips items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Only messages with a smaller id.
    pub before_id: Option<i64>,
    /// Only messages dated at or before this instant.
    pub before_date: Option<DateTime<Utc>>,
}

impl PageCursor {
    /// Cursor at the newest message, or at `end_date` when the scan is bounded.
    pub fn starting_at(end_date: Option<DateTime<Utc>>) -> Self {
        Self {
            before_id: None,
            before_date: end_date,
        }
    }

    /// Moves past the consumed message `id`.
    pub fn advance(&mut self, id: i64) {
        self.before_id = Some(id);
    }

    /// True if `id` was already consumed, i.e. it is not behind `before_id`.
    ///
    /// Only the id is checked: a message newer than `before_date` is still unseen and
    /// the caller decides what to do with it.
    pub fn is_consumed(&self, id: i64) -> bool {
        self.before_id.is_some_and(|before| id >= before)
    }

    /// True if a message with `id` and `date` lies behind this cursor.
    pub fn admits(&self, id: i64, date: DateTime<Utc>) -> bool {
        self.before_id.map_or(true, |before| id < before)
            && self.before_date.map_or(true, |before| date <= before)
    }
}

/// Reverse-chronological message history of a channel.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Returns up to `limit` messages behind `cursor`, newest first. An empty page means
    /// the history is exhausted.
    async fn fetch_page(
        &self,
        channel: &ChannelIdentity,
        cursor: &PageCursor,
        limit: usize,
    ) -> Result<Vec<RawMessage>, SourceError>;

    /// Mandatory wait when `err` is a rate-limit signal, `None` otherwise.
    fn signals_rate_limit(&self, err: &SourceError) -> Option<Duration> {
        match err {
            SourceError::RateLimited { wait_secs } => Some(Duration::from_secs(*wait_secs)),
            _ => None,
        }
    }
}

/// Resolves a user-supplied channel identifier.
#[async_trait]
pub trait ChannelResolver: Send + Sync {
    async fn resolve(&self, identifier: &str) -> Result<ChannelIdentity, ResolveError>;
}

/// Parsed channel identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// Public handle without the leading `@`.
    Username(String),
    /// Numeric id, e.g. `-1001234567890`.
    Id(i64),
}

const LINK_PREFIXES: [&str; 4] = ["https://t.me/", "http://t.me/", "t.me/", "tg://resolve?domain="];

impl ChannelRef {
    /// Accepts `name`, `@name`, `t.me/name` links (with or without scheme, a trailing post
    /// id is ignored) and numeric ids.
    pub fn parse(identifier: &str) -> Result<Self, ResolveError> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            return Err(ResolveError::InvalidIdentifier(identifier.to_string()));
        }
        if let Ok(id) = trimmed.parse::<i64>() {
            return Ok(ChannelRef::Id(id));
        }

        let mut name = trimmed;
        for prefix in LINK_PREFIXES {
            if let Some(rest) = name.strip_prefix(prefix) {
                name = rest.split(['/', '?', '&']).next().unwrap_or_default();
                break;
            }
        }
        let name = name.strip_prefix('@').unwrap_or(name);

        if is_valid_username(name) {
            Ok(ChannelRef::Username(name.to_string()))
        } else {
            Err(ResolveError::InvalidIdentifier(identifier.to_string()))
        }
    }
}

fn is_valid_username(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    name.len() <= 32 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
