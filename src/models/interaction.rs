//! Discord interaction wire types.
//!
//! Inbound payloads arrive on the webhook endpoint with a numeric `type`
//! discriminant; outbound bodies carry a numeric callback `type` plus
//! optional message data. Both sides are modeled as closed enums with an
//! explicit unrecognized arm so dispatch is exhaustive.

use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Ephemeral message flag: only the invoking user sees the message.
pub const EPHEMERAL_FLAG: u64 = 64;

/// Inbound interaction type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionType {
    /// Liveness check from the platform; must be answered with PONG.
    Ping,
    /// A user invoked a slash command.
    ApplicationCommand,
    /// Any other wire value; always routed to the 400 arm.
    Unrecognized(u8),
}

impl From<u8> for InteractionType {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            other => Self::Unrecognized(other),
        }
    }
}

impl<'de> Deserialize<'de> for InteractionType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Ok(Self::from(value))
    }
}

/// One name/value pair from a slash command's options.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CommandOption {
    /// Option name as registered with the command.
    pub name: String,
    /// Option value; commands in this bot only use string options.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// Command payload of an application-command interaction.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CommandData {
    /// Invoked command name.
    pub name: String,
    /// Ordered option sequence.
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

/// Invoking user identity.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Discord username.
    #[serde(default)]
    pub username: Option<String>,
}

/// Guild membership wrapper around the invoking user.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Member {
    /// The member's user record.
    #[serde(default)]
    pub user: Option<User>,
}

/// One inbound webhook interaction.
///
/// `application_id` and `token` are the only credentials needed to edit
/// the deferred response later; they are extracted and embedded into queue
/// tasks to outlive this request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Interaction {
    /// Interaction type discriminant.
    #[serde(rename = "type")]
    pub kind: InteractionType,
    /// Command payload, present for application commands.
    #[serde(default)]
    pub data: Option<CommandData>,
    /// Guild the command was invoked in, absent for DM invocations.
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Application id used to address the deferred response.
    #[serde(default)]
    pub application_id: Option<String>,
    /// Interaction continuation token.
    #[serde(default)]
    pub token: Option<String>,
    /// Invoker identity when invoked inside a guild.
    #[serde(default)]
    pub member: Option<Member>,
    /// Invoker identity when invoked outside a guild.
    #[serde(default)]
    pub user: Option<User>,
}

impl Interaction {
    /// Look up a string option by name.
    #[must_use]
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.data
            .as_ref()?
            .options
            .iter()
            .find(|option| option.name == name)?
            .value
            .as_ref()?
            .as_str()
    }

    /// Resolve the invoking username: `member.user.username` first, then
    /// `user.username`, else a friendly placeholder.
    #[must_use]
    pub fn invoker_name(&self) -> &str {
        self.member
            .as_ref()
            .and_then(|member| member.user.as_ref())
            .and_then(|user| user.username.as_deref())
            .or_else(|| {
                self.user
                    .as_ref()
                    .and_then(|user| user.username.as_deref())
            })
            .unwrap_or("adventurer")
    }
}

/// Outbound interaction callback type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackType {
    /// Acknowledge a PING.
    Pong,
    /// Immediate visible message.
    ChannelMessage,
    /// Deferred acknowledgement; the real answer arrives via response edits.
    DeferredChannelMessage,
}

impl CallbackType {
    /// Numeric wire value for the callback type.
    #[must_use]
    pub fn wire_value(self) -> u8 {
        match self {
            Self::Pong => 1,
            Self::ChannelMessage => 4,
            Self::DeferredChannelMessage => 5,
        }
    }
}

impl Serialize for CallbackType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.wire_value())
    }
}

impl<'de> Deserialize<'de> for CallbackType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match u8::deserialize(deserializer)? {
            1 => Ok(Self::Pong),
            4 => Ok(Self::ChannelMessage),
            5 => Ok(Self::DeferredChannelMessage),
            other => Err(D::Error::custom(format!(
                "unknown callback type: {other}"
            ))),
        }
    }
}

/// Message data attached to a callback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ResponseData {
    /// Message content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Message flags; 64 marks the message ephemeral.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

/// Outbound interaction response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionResponse {
    /// Callback type discriminant.
    #[serde(rename = "type")]
    pub kind: CallbackType,
    /// Optional message data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl InteractionResponse {
    /// PONG acknowledgement for a PING.
    #[must_use]
    pub fn pong() -> Self {
        Self {
            kind: CallbackType::Pong,
            data: None,
        }
    }

    /// Immediate visible message.
    #[must_use]
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: CallbackType::ChannelMessage,
            data: Some(ResponseData {
                content: Some(content.into()),
                flags: None,
            }),
        }
    }

    /// Immediate ephemeral message, visible only to the invoker. Used for
    /// user-input errors, which are interaction-level failures and still
    /// travel on a 200 status.
    #[must_use]
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            kind: CallbackType::ChannelMessage,
            data: Some(ResponseData {
                content: Some(content.into()),
                flags: Some(EPHEMERAL_FLAG),
            }),
        }
    }

    /// Deferred acknowledgement; the worker edits the message later.
    #[must_use]
    pub fn deferred() -> Self {
        Self {
            kind: CallbackType::DeferredChannelMessage,
            data: None,
        }
    }
}
