//! Channel template types shared by configuration, queue tasks, and
//! the Discord REST client.

use serde::{Deserialize, Serialize};

/// Kind of Discord channel a campaign template can create.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Guild text channel.
    Text,
    /// Guild voice channel.
    Voice,
    /// Guild forum channel.
    Forum,
}

impl ChannelKind {
    /// Numeric channel type on the Discord API (0 = text, 2 = voice,
    /// 15 = forum).
    #[must_use]
    pub fn api_code(self) -> u8 {
        match self {
            Self::Text => 0,
            Self::Voice => 2,
            Self::Forum => 15,
        }
    }

    /// Human-readable label used in progress and summary messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Voice => "Voice",
            Self::Forum => "Forum",
        }
    }

    /// Whether this kind accepts a `topic` field on creation.
    #[must_use]
    pub fn supports_topic(self) -> bool {
        matches!(self, Self::Text | Self::Forum)
    }
}

/// A configuration-defined template for one channel to create within a
/// campaign. Ordering across specs is significant: channels are created
/// and reported in configuration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ChannelSpec {
    /// Channel name.
    pub name: String,
    /// Channel kind.
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    /// Whether the channel is intended to be restricted to GMs.
    /// Enforcement is advisory only; see the completion summary warning.
    #[serde(default)]
    pub gm_only: bool,
    /// Optional topic/description for text and forum channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ChannelSpec {
    /// Construct a spec with no description.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ChannelKind, gm_only: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            gm_only,
            description: None,
        }
    }
}

/// Snapshot of one created channel carried inside a completion task.
///
/// Pre-computed at enqueue time from the configuration, not observed from
/// actual creation results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ChannelSummary {
    /// Channel name.
    pub name: String,
    /// Channel kind.
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    /// GM-only flag from the originating spec.
    #[serde(default)]
    pub gm_only: bool,
}

impl From<&ChannelSpec> for ChannelSummary {
    fn from(spec: &ChannelSpec) -> Self {
        Self {
            name: spec.name.clone(),
            kind: spec.kind,
            gm_only: spec.gm_only,
        }
    }
}
