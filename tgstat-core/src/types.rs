//! Core types: raw platform messages, the canonical [`Record`], channel identity and acquisition window.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use emoji_identity::EmojiTargets;
use serde::{Deserialize, Serialize};

use crate::error::UnknownMediaKind;

// ---------- Raw platform input ----------

/// Media category as declared by the platform, before filename refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    Photo,
    Document,
    Video,
    Audio,
    WebPage,
    /// Anything the platform sends that is not recognized.
    #[serde(other)]
    Unknown,
}

/// Media attached to a raw message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMedia {
    pub category: MediaCategory,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

impl RawMedia {
    pub fn new(category: MediaCategory) -> Self {
        Self {
            category,
            filename: None,
            size_bytes: None,
        }
    }

    /// Document with a file name, the usual shape of file posts.
    pub fn document(filename: impl Into<String>, size_bytes: Option<u64>) -> Self {
        Self {
            category: MediaCategory::Document,
            filename: Some(filename.into()),
            size_bytes,
        }
    }
}

/// Reaction symbol as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawReactionSymbol {
    /// Standard unicode emoji.
    Emoji { emoticon: String },
    /// Custom emoji referenced by document id.
    CustomEmoji { document_id: i64 },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReaction {
    pub symbol: RawReactionSymbol,
    /// Signed so that malformed payloads can be detected instead of wrapping.
    pub count: i64,
}

impl RawReaction {
    pub fn emoji(emoticon: impl Into<String>, count: i64) -> Self {
        Self {
            symbol: RawReactionSymbol::Emoji {
                emoticon: emoticon.into(),
            },
            count,
        }
    }

    pub fn custom(document_id: i64, count: i64) -> Self {
        Self {
            symbol: RawReactionSymbol::CustomEmoji { document_id },
            count,
        }
    }
}

/// One message as delivered by a [`crate::MessageSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub text: Option<String>,
    pub media: Option<RawMedia>,
    /// `None` when the platform reports no reaction block at all.
    pub reactions: Option<Vec<RawReaction>>,
    pub views: Option<u64>,
    pub forwards: Option<u64>,
    pub replies: Option<u64>,
}

impl RawMessage {
    pub fn new(id: i64, date: DateTime<Utc>) -> Self {
        Self {
            id,
            date,
            text: None,
            media: None,
            reactions: None,
            views: None,
            forwards: None,
            replies: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_media(mut self, media: RawMedia) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_reactions(mut self, reactions: Vec<RawReaction>) -> Self {
        self.reactions = Some(reactions);
        self
    }

    pub fn with_views(mut self, views: u64) -> Self {
        self.views = Some(views);
        self
    }

    pub fn with_forwards(mut self, forwards: u64) -> Self {
        self.forwards = Some(forwards);
        self
    }

    pub fn with_replies(mut self, replies: u64) -> Self {
        self.replies = Some(replies);
        self
    }
}

// ---------- Canonical record ----------

/// Classified media kind of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
    Document,
    Archive,
    Executable,
    Image,
    Webpage,
    Unknown,
    None,
}

impl MediaKind {
    pub const ALL: [MediaKind; 10] = [
        MediaKind::Photo,
        MediaKind::Video,
        MediaKind::Audio,
        MediaKind::Document,
        MediaKind::Archive,
        MediaKind::Executable,
        MediaKind::Image,
        MediaKind::Webpage,
        MediaKind::Unknown,
        MediaKind::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Document => "document",
            MediaKind::Archive => "archive",
            MediaKind::Executable => "executable",
            MediaKind::Image => "image",
            MediaKind::Webpage => "webpage",
            MediaKind::Unknown => "unknown",
            MediaKind::None => "none",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = UnknownMediaKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MediaKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownMediaKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub kind: MediaKind,
    pub filename: Option<String>,
    pub size_bytes: Option<u64>,
}

/// How a reaction symbol was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Standard,
    Custom,
    Unknown,
}

/// One reaction of a record: raw symbol, its comparable identity and count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEntry {
    pub symbol_raw: String,
    pub symbol_identity: String,
    pub kind: ReactionKind,
    pub count: u64,
}

impl ReactionEntry {
    /// Builds an entry; the identity is derived from `symbol_raw`.
    pub fn new(symbol_raw: impl Into<String>, kind: ReactionKind, count: u64) -> Self {
        let symbol_raw = symbol_raw.into();
        let symbol_identity = emoji_identity::identity(&symbol_raw);
        Self {
            symbol_raw,
            symbol_identity,
            kind,
            count,
        }
    }

    pub fn standard(symbol_raw: impl Into<String>, count: u64) -> Self {
        Self::new(symbol_raw, ReactionKind::Standard, count)
    }

    pub fn base_identity(&self) -> String {
        emoji_identity::base_identity(&self.symbol_raw)
    }

    /// True if this reaction is one of `targets`.
    ///
    /// Raw form and identity are checked against the exact tier; the base tier is only
    /// consulted for standard emoji, custom-emoji placeholders share a textual prefix.
    pub fn matches(&self, targets: &EmojiTargets) -> bool {
        if targets.forms().contains(&self.symbol_raw)
            || targets.forms().contains(&self.symbol_identity)
        {
            return true;
        }
        self.kind == ReactionKind::Standard && targets.matches_base(&self.symbol_raw)
    }
}

/// Deep link (`tg://`) and web link (`https://t.me/...`) of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLink {
    pub deep_link: String,
    pub web_link: String,
}

impl fmt::Display for MessageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.web_link)
    }
}

/// Ranking fields written by the analysis engine. Overwritten on every sort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetrics {
    /// `total_reactions / views * 100`.
    pub engagement_rate: Option<f64>,
    /// Key value of the last sort applied to the record.
    pub rank_score: Option<f64>,
    /// Sum of counts of reactions matching the selected emoji.
    pub selected_emoji_count: Option<u64>,
}

/// Canonical, analyzable form of one qualifying channel post.
///
/// Core fields are read-only; `total_reactions` is recomputed whenever reactions are set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    id: i64,
    timestamp: DateTime<Utc>,
    text: String,
    media: Option<MediaInfo>,
    reactions: Vec<ReactionEntry>,
    total_reactions: u64,
    views: Option<u64>,
    forwards: Option<u64>,
    reply_count: Option<u64>,
    link: MessageLink,
    #[serde(flatten)]
    pub metrics: RecordMetrics,
}

impl Record {
    pub fn new(id: i64, timestamp: DateTime<Utc>, link: MessageLink) -> Self {
        Self {
            id,
            timestamp,
            text: String::new(),
            media: None,
            reactions: Vec::new(),
            total_reactions: 0,
            views: None,
            forwards: None,
            reply_count: None,
            link,
            metrics: RecordMetrics::default(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_media(mut self, media: Option<MediaInfo>) -> Self {
        self.media = media;
        self
    }

    pub fn with_reactions(mut self, reactions: Vec<ReactionEntry>) -> Self {
        self.total_reactions = reactions.iter().fold(0u64, |sum, r| sum.saturating_add(r.count));
        self.reactions = reactions;
        self
    }

    pub fn with_views(mut self, views: Option<u64>) -> Self {
        self.views = views;
        self
    }

    pub fn with_forwards(mut self, forwards: Option<u64>) -> Self {
        self.forwards = forwards;
        self
    }

    pub fn with_reply_count(mut self, reply_count: Option<u64>) -> Self {
        self.reply_count = reply_count;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn media(&self) -> Option<&MediaInfo> {
        self.media.as_ref()
    }

    /// Media kind, `None` when nothing is attached.
    pub fn media_kind(&self) -> MediaKind {
        self.media.as_ref().map_or(MediaKind::None, |m| m.kind)
    }

    pub fn filename(&self) -> Option<&str> {
        self.media.as_ref().and_then(|m| m.filename.as_deref())
    }

    pub fn reactions(&self) -> &[ReactionEntry] {
        &self.reactions
    }

    pub fn total_reactions(&self) -> u64 {
        self.total_reactions
    }

    pub fn views(&self) -> Option<u64> {
        self.views
    }

    pub fn forwards(&self) -> Option<u64> {
        self.forwards
    }

    pub fn reply_count(&self) -> Option<u64> {
        self.reply_count
    }

    pub fn link(&self) -> &MessageLink {
        &self.link
    }

    /// Sum of counts of reactions matching `targets`.
    pub fn count_matching(&self, targets: &EmojiTargets) -> u64 {
        self.reactions
            .iter()
            .filter(|r| r.matches(targets))
            .fold(0u64, |sum, r| sum.saturating_add(r.count))
    }
}

// ---------- Channel and window ----------

/// Resolved channel, used to build message links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelIdentity {
    pub id: i64,
    pub title: String,
    pub username: Option<String>,
    /// True for broadcast channels, false for groups/supergroups.
    pub is_broadcast: bool,
    pub member_count: Option<u64>,
}

/// Filter and stop criteria for one acquisition run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionWindow {
    pub min_reactions: u64,
    pub media_only: bool,
    /// Inclusive lower bound; older messages are out of range.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound; also where the scan starts.
    pub end_date: Option<DateTime<Utc>>,
    /// Stop after this many accepted records.
    pub max_records: Option<usize>,
    /// Stop after this many scanned messages.
    pub max_scanned: Option<usize>,
}

impl AcquisitionWindow {
    pub fn is_before_start(&self, ts: DateTime<Utc>) -> bool {
        self.start_date.is_some_and(|start| ts < start)
    }

    pub fn is_after_end(&self, ts: DateTime<Utc>) -> bool {
        self.end_date.is_some_and(|end| ts > end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn link() -> MessageLink {
        MessageLink {
            deep_link: "tg://resolve?domain=test&post=1".to_string(),
            web_link: "https://t.me/test/1".to_string(),
        }
    }

    #[test]
    fn test_record_total_reactions_recomputed() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let record = Record::new(1, ts, link()).with_reactions(vec![
            ReactionEntry::standard("👍", 3),
            ReactionEntry::standard("🔥", 4),
        ]);
        assert_eq!(record.total_reactions(), 7);

        let record = record.with_reactions(vec![ReactionEntry::standard("👍", 1)]);
        assert_eq!(record.total_reactions(), 1);
    }

    #[test]
    fn test_record_media_kind_defaults_to_none() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let record = Record::new(1, ts, link());
        assert_eq!(record.media_kind(), MediaKind::None);
        assert!(record.filename().is_none());
    }

    #[test]
    fn test_media_kind_parse_and_display() {
        assert_eq!("Archive".parse::<MediaKind>().unwrap(), MediaKind::Archive);
        assert_eq!(" video ".parse::<MediaKind>().unwrap(), MediaKind::Video);
        assert!("gif".parse::<MediaKind>().is_err());
        assert_eq!(MediaKind::Webpage.to_string(), "webpage");
    }

    #[test]
    fn test_reaction_entry_identity_and_matching() {
        let entry = ReactionEntry::standard("👍\u{FE0F}", 2);
        assert_eq!(entry.symbol_identity, "👍");
        assert!(entry.matches(&EmojiTargets::expand(["👍"])));
        assert!(!entry.matches(&EmojiTargets::expand(["👎"])));
    }

    #[test]
    fn test_custom_reactions_do_not_match_by_base() {
        let entry = ReactionEntry::new("[custom:111]", ReactionKind::Custom, 5);
        assert!(!entry.matches(&EmojiTargets::expand(["[custom:222]"])));
        assert!(entry.matches(&EmojiTargets::expand(["[custom:111]"])));
    }

    #[test]
    fn test_count_matching_sums_selected() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let record = Record::new(1, ts, link()).with_reactions(vec![
            ReactionEntry::standard("😀", 3),
            ReactionEntry::standard("😂", 5),
        ]);
        assert_eq!(record.count_matching(&EmojiTargets::expand(["😀"])), 3);
        assert_eq!(record.count_matching(&EmojiTargets::expand(["😀\u{FE0F}"])), 3);
        assert_eq!(record.count_matching(&EmojiTargets::expand(["🎉"])), 0);
    }

    #[test]
    fn test_raw_message_deserializes_with_missing_optionals() {
        let json = r#"{
            "id": 42,
            "date": "2024-03-01T10:00:00Z",
            "media": { "category": "sticker" },
            "reactions": [
                { "symbol": { "type": "emoji", "emoticon": "🔥" }, "count": 4 },
                { "symbol": { "type": "paid" }, "count": 1 }
            ]
        }"#;
        let raw: RawMessage = serde_json::from_str(json).unwrap();
        assert_eq!(raw.id, 42);
        assert!(raw.text.is_none());
        assert_eq!(raw.media.unwrap().category, MediaCategory::Unknown);
        let reactions = raw.reactions.unwrap();
        assert_eq!(reactions[1].symbol, RawReactionSymbol::Unknown);
        assert!(raw.views.is_none());
    }

    #[test]
    fn test_record_serializes_iso_timestamps_and_nulls() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let record = Record::new(1, ts, link());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["timestamp"], "2024-01-01T12:00:00Z");
        assert!(value["views"].is_null());
        assert!(value["engagement_rate"].is_null());
    }

    #[test]
    fn test_window_bounds() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let window = AcquisitionWindow {
            start_date: Some(start),
            end_date: Some(end),
            ..AcquisitionWindow::default()
        };
        assert!(window.is_before_start(start - chrono::Duration::seconds(1)));
        assert!(!window.is_before_start(start));
        assert!(window.is_after_end(end + chrono::Duration::seconds(1)));
        assert!(!window.is_after_end(end));
        assert!(!AcquisitionWindow::default().is_before_start(start));
    }
}
