//! RawMessage → Record normalization.
//!
//! Decides, in order: reactions present, media kind, reaction parsing and total,
//! reaction threshold, media-only filter, message link. Pure: same input, same output.
//!
//! # Media classification
//!
//! - No media: [`MediaKind::None`].
//! - Otherwise the declared category's default kind, refined by the filename
//!   extension (first matching row of [`EXTENSION_KINDS`] wins).

use tgstat_core::{
    AcquisitionWindow, ChannelIdentity, MediaCategory, MediaInfo, MediaKind, MessageLink,
    RawMedia, RawMessage, RawReaction, RawReactionSymbol, ReactionEntry, ReactionKind, Record,
};
use tracing::debug;

/// Prefix of supergroup/channel ids in their numeric form.
pub const PRIVATE_CHANNEL_PREFIX: &str = "-100";

/// Symbol recorded for reactions of an unknown type.
pub const UNKNOWN_REACTION_SYMBOL: &str = "❓";

/// Extension → kind refinement table.
pub const EXTENSION_KINDS: &[(MediaKind, &[&str])] = &[
    (MediaKind::Archive, &["zip", "rar", "7z", "tar", "gz"]),
    (MediaKind::Executable, &["exe", "msi", "apk", "ipa"]),
    (MediaKind::Video, &["mp4", "mkv", "avi", "mov", "wmv", "flv"]),
    (MediaKind::Audio, &["mp3", "flac", "wav", "aac", "ogg"]),
    (MediaKind::Document, &["pdf", "doc", "docx", "txt", "epub"]),
    (MediaKind::Image, &["jpg", "jpeg", "png", "gif", "webp"]),
];

/// Why a raw message did not become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No reaction block, or no well-formed reaction in it.
    NoReactions,
    BelowThreshold { total: u64 },
    /// Window is media-only and nothing is attached.
    NoMedia,
}

/// Result of normalizing one raw message.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Record(Record),
    Skip(SkipReason),
}

/// Converts one raw message into a [`Record`], or explains why it is skipped.
pub fn normalize(
    raw: &RawMessage,
    channel: &ChannelIdentity,
    window: &AcquisitionWindow,
) -> Normalized {
    let raw_reactions = match raw.reactions.as_deref() {
        Some(reactions) if !reactions.is_empty() => reactions,
        _ => return Normalized::Skip(SkipReason::NoReactions),
    };

    let media = classify_media(raw.media.as_ref());

    let reactions: Vec<ReactionEntry> = raw_reactions
        .iter()
        .filter_map(|r| parse_reaction(raw.id, r))
        .collect();
    if reactions.is_empty() {
        return Normalized::Skip(SkipReason::NoReactions);
    }
    let total = reactions.iter().fold(0u64, |sum, r| sum.saturating_add(r.count));

    if total < window.min_reactions {
        return Normalized::Skip(SkipReason::BelowThreshold { total });
    }

    if window.media_only && media.is_none() {
        return Normalized::Skip(SkipReason::NoMedia);
    }

    let record = Record::new(raw.id, raw.date, build_link(channel, raw.id))
        .with_text(raw.text.clone().unwrap_or_default())
        .with_media(media)
        .with_reactions(reactions)
        .with_views(raw.views)
        .with_forwards(raw.forwards)
        .with_reply_count(raw.replies);
    Normalized::Record(record)
}

/// Classifies attached media. `None` when nothing is attached.
pub fn classify_media(media: Option<&RawMedia>) -> Option<MediaInfo> {
    let media = media?;
    let default_kind = match media.category {
        MediaCategory::Photo => MediaKind::Photo,
        MediaCategory::Document => MediaKind::Document,
        MediaCategory::Video => MediaKind::Video,
        MediaCategory::Audio => MediaKind::Audio,
        MediaCategory::WebPage => MediaKind::Webpage,
        MediaCategory::Unknown => MediaKind::Unknown,
    };
    let kind = media
        .filename
        .as_deref()
        .and_then(kind_for_filename)
        .unwrap_or(default_kind);
    Some(MediaInfo {
        kind,
        filename: media.filename.clone(),
        size_bytes: media.size_bytes,
    })
}

/// Kind implied by a filename extension (case-insensitive), if the table knows it.
pub fn kind_for_filename(filename: &str) -> Option<MediaKind> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    EXTENSION_KINDS
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(kind, _)| *kind)
}

fn parse_reaction(message_id: i64, raw: &RawReaction) -> Option<ReactionEntry> {
    let Ok(count) = u64::try_from(raw.count) else {
        debug!(message_id, count = raw.count, "Dropping reaction with negative count");
        return None;
    };
    let entry = match &raw.symbol {
        RawReactionSymbol::Emoji { emoticon } => {
            ReactionEntry::new(emoticon.as_str(), ReactionKind::Standard, count)
        }
        RawReactionSymbol::CustomEmoji { document_id } => ReactionEntry::new(
            format!("[custom:{}]", document_id),
            ReactionKind::Custom,
            count,
        ),
        RawReactionSymbol::Unknown => {
            ReactionEntry::new(UNKNOWN_REACTION_SYMBOL, ReactionKind::Unknown, count)
        }
    };
    Some(entry)
}

/// Deep link and web link of post `message_id` in `channel`.
///
/// Public channels link by handle; private ones by the numeric id with the
/// [`PRIVATE_CHANNEL_PREFIX`] (or a bare `-`) stripped.
pub fn build_link(channel: &ChannelIdentity, message_id: i64) -> MessageLink {
    match channel.username.as_deref().filter(|u| !u.is_empty()) {
        Some(username) => MessageLink {
            deep_link: format!("tg://resolve?domain={}&post={}", username, message_id),
            web_link: format!("https://t.me/{}/{}", username, message_id),
        },
        None => {
            let short_id = private_short_id(channel.id);
            MessageLink {
                deep_link: format!("tg://privatepost?channel={}&post={}", short_id, message_id),
                web_link: format!("https://t.me/c/{}/{}", short_id, message_id),
            }
        }
    }
}

fn private_short_id(channel_id: i64) -> String {
    let id = channel_id.to_string();
    if let Some(rest) = id.strip_prefix(PRIVATE_CHANNEL_PREFIX) {
        rest.to_string()
    } else if let Some(rest) = id.strip_prefix('-') {
        rest.to_string()
    } else {
        id
    }
}
