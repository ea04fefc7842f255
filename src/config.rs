//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::models::channel::{ChannelKind, ChannelSpec};
use crate::{AppError, Result};

/// Nested Discord connectivity configuration.
///
/// The webhook public key and bot token are loaded at runtime via OS
/// keychain or environment variables, not from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DiscordConfig {
    /// Base URL for Discord REST calls; overridable for local testing.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Hex-encoded Ed25519 public key for webhook verification
    /// (populated at runtime).
    #[serde(skip)]
    pub public_key: String,
    /// Bot token used for guild mutations (populated at runtime).
    #[serde(skip)]
    pub bot_token: String,
}

fn default_api_base_url() -> String {
    "https://discord.com/api/v10".into()
}

fn default_http_port() -> u16 {
    3000
}

fn default_queue_capacity() -> usize {
    256
}

fn default_worker_batch_size() -> usize {
    10
}

fn default_completion_delay_per_channel_seconds() -> u64 {
    2
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// HTTP port for the interaction webhook endpoint.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Path to the campaign channel YAML file.
    pub channels_path: PathBuf,
    /// Bounded capacity of the in-process task queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Maximum queue messages drained per worker batch.
    #[serde(default = "default_worker_batch_size")]
    pub worker_batch_size: usize,
    /// Seconds of completion-task delay per configured channel. The
    /// completion message is delayed `channels * this` to land after the
    /// per-channel tasks have had time to process.
    #[serde(default = "default_completion_delay_per_channel_seconds")]
    pub completion_delay_per_channel_seconds: u64,
    /// Discord connectivity settings.
    pub discord: DiscordConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load Discord credentials from OS keychain with env-var fallback.
    ///
    /// Tries the `channelwright` keyring service first, then falls back to
    /// `DISCORD_PUBLIC_KEY` / `DISCORD_BOT_TOKEN` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither keychain nor env vars provide
    /// the required values.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.discord.public_key =
            load_credential("discord_public_key", "DISCORD_PUBLIC_KEY").await?;
        self.discord.bot_token = load_credential("discord_bot_token", "DISCORD_BOT_TOKEN").await?;
        Ok(())
    }

    /// Per-channel completion delay as a [`Duration`].
    #[must_use]
    pub fn completion_delay_per_channel(&self) -> Duration {
        Duration::from_secs(self.completion_delay_per_channel_seconds)
    }

    fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(AppError::Config(
                "queue_capacity must be greater than zero".into(),
            ));
        }
        if self.worker_batch_size == 0 {
            return Err(AppError::Config(
                "worker_batch_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O, so hop through spawn_blocking.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new("channelwright", &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    env::var(env_key).map_err(|_| {
        AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))
    })
}

#[derive(Debug, Deserialize)]
struct ChannelFile {
    channels: Vec<ChannelSpec>,
}

/// Load the ordered campaign channel list from a YAML file.
///
/// On any read or parse failure the documented fallback list is returned
/// instead, so a missing or broken file never blocks campaign creation.
/// Channel order in the file is significant: channels are created and
/// reported in this order.
#[must_use]
pub fn load_campaign_channels(path: &Path) -> Vec<ChannelSpec> {
    match try_load_campaign_channels(path) {
        Ok(channels) if !channels.is_empty() => channels,
        Ok(_) => {
            warn!(path = %path.display(), "channel config is empty, using defaults");
            default_campaign_channels()
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to load channel config, using defaults");
            default_campaign_channels()
        }
    }
}

fn try_load_campaign_channels(path: &Path) -> Result<Vec<ChannelSpec>> {
    let raw = fs::read_to_string(path)?;
    let file: ChannelFile = serde_yaml::from_str(&raw)?;
    Ok(file.channels)
}

/// The documented fallback channel list used when the YAML file is
/// missing or invalid.
#[must_use]
pub fn default_campaign_channels() -> Vec<ChannelSpec> {
    vec![
        ChannelSpec::new("general", ChannelKind::Text, false),
        ChannelSpec::new("session-notes", ChannelKind::Text, false),
        ChannelSpec::new("gm-notes", ChannelKind::Text, true),
        ChannelSpec::new("voice-chat", ChannelKind::Voice, false),
        ChannelSpec::new("character-sheets", ChannelKind::Forum, false),
        ChannelSpec::new("lore-and-worldbuilding", ChannelKind::Forum, false),
        ChannelSpec::new("gm-planning", ChannelKind::Forum, true),
    ]
}
