//! # tgstat-core
//!
//! Core types and traits for channel reaction statistics: raw platform messages, the
//! canonical [`Record`], [`StatisticsSummary`], the collaborator traits
//! ([`MessageSource`], [`ChannelResolver`], [`ProgressSink`], [`ReportSink`]) and tracing
//! initialization. Transport-agnostic; used by acquisition, analysis and the CLI.

pub mod error;
pub mod logger;
pub mod sink;
pub mod source;
pub mod statistics;
pub mod types;

pub use error::{ResolveError, Result, SourceError, TgstatError, UnknownMediaKind};
pub use logger::init_tracing;
pub use sink::{NoopProgress, ProgressSink, Report, ReportSink};
pub use source::{ChannelRef, ChannelResolver, MessageSource, PageCursor};
pub use statistics::{
    DateSpan, EmojiTally, HourSlot, MediaKindStats, ReactionStats, StatisticsSummary,
    TimeStats, TopRecord, WeekdaySlot,
};
pub use types::{
    AcquisitionWindow, ChannelIdentity, MediaCategory, MediaInfo, MediaKind, MessageLink,
    RawMedia, RawMessage, RawReaction, RawReactionSymbol, ReactionEntry, ReactionKind, Record,
    RecordMetrics,
};

pub use emoji_identity::EmojiTargets;
