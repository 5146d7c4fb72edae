//! Replay of exported channel history.
//!
//! A dump is a JSON file holding one channel (`{ "channel": {..}, "messages": [..] }`) or
//! an array of them. [`ReplayArchive`] serves it through [`MessageSource`] and
//! [`ChannelResolver`] so the acquisition pipeline runs unchanged against recorded data.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tgstat_core::{
    ChannelIdentity, ChannelRef, ChannelResolver, MessageSource, PageCursor, RawMessage,
    ResolveError, SourceError,
};
use tracing::{debug, info};

const PRIVATE_CHANNEL_PREFIX: &str = "-100";

fn default_accessible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpChannel {
    #[serde(flatten)]
    pub identity: ChannelIdentity,
    /// False when the account that made the dump lost access; resolving then fails.
    #[serde(default = "default_accessible")]
    pub accessible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDump {
    pub channel: DumpChannel,
    #[serde(default)]
    pub messages: Vec<RawMessage>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DumpFile {
    Many(Vec<ChannelDump>),
    One(ChannelDump),
}

/// Recorded channels with their history, newest message first.
#[derive(Debug, Clone, Default)]
pub struct ReplayArchive {
    channels: Vec<DumpChannel>,
    history: HashMap<i64, Vec<RawMessage>>,
}

impl ReplayArchive {
    pub fn from_dumps(dumps: Vec<ChannelDump>) -> Self {
        let mut archive = Self::default();
        for dump in dumps {
            let mut messages = dump.messages;
            messages.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
            archive
                .history
                .entry(dump.channel.identity.id)
                .or_default()
                .extend(messages);
            archive.channels.push(dump.channel);
        }
        archive
    }

    pub fn parse(json: &str) -> Result<Self> {
        let dumps = match serde_json::from_str::<DumpFile>(json).context("Parse channel dump")? {
            DumpFile::Many(dumps) => dumps,
            DumpFile::One(dump) => vec![dump],
        };
        Ok(Self::from_dumps(dumps))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Read channel dump {}", path.display()))?;
        let archive = Self::parse(&json).with_context(|| format!("Load {}", path.display()))?;
        info!(
            path = %path.display(),
            channels = archive.channels.len(),
            messages = archive.history.values().map(Vec::len).sum::<usize>(),
            "Channel dump loaded"
        );
        Ok(archive)
    }

    pub fn channels(&self) -> &[DumpChannel] {
        &self.channels
    }

    pub fn message_count(&self, channel_id: i64) -> usize {
        self.history.get(&channel_id).map_or(0, Vec::len)
    }

    fn find(&self, channel_ref: &ChannelRef) -> Option<&DumpChannel> {
        self.channels.iter().find(|c| match channel_ref {
            ChannelRef::Username(name) => c
                .identity
                .username
                .as_deref()
                .is_some_and(|u| u.eq_ignore_ascii_case(name)),
            ChannelRef::Id(id) => c.identity.id == *id || same_private_channel(c.identity.id, *id),
        })
    }
}

/// `-1001234` and `1234` name the same private channel.
fn same_private_channel(full: i64, short: i64) -> bool {
    format!("{}{}", PRIVATE_CHANNEL_PREFIX, short.abs()) == full.to_string()
}

#[async_trait]
impl MessageSource for ReplayArchive {
    async fn fetch_page(
        &self,
        channel: &ChannelIdentity,
        cursor: &PageCursor,
        limit: usize,
    ) -> Result<Vec<RawMessage>, SourceError> {
        let history = self.history.get(&channel.id).ok_or_else(|| {
            SourceError::Transport(format!("channel {} is not in the dump", channel.id))
        })?;
        let page: Vec<RawMessage> = history
            .iter()
            .filter(|m| cursor.admits(m.id, m.date))
            .take(limit)
            .cloned()
            .collect();
        debug!(channel_id = channel.id, before_id = ?cursor.before_id, size = page.len(), "Replayed page");
        Ok(page)
    }
}

#[async_trait]
impl ChannelResolver for ReplayArchive {
    async fn resolve(&self, identifier: &str) -> Result<ChannelIdentity, ResolveError> {
        let channel_ref = ChannelRef::parse(identifier)?;
        let channel = self
            .find(&channel_ref)
            .ok_or_else(|| ResolveError::NotFound(identifier.to_string()))?;
        if !channel.accessible {
            return Err(ResolveError::PrivateForbidden(identifier.to_string()));
        }
        Ok(channel.identity.clone())
    }
}
