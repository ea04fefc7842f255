//! Discord REST client for guild mutations and response edits.
//!
//! All campaign side effects flow through the [`DiscordApi`] trait so the
//! router and worker can be exercised against recording doubles in tests.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::config::DiscordConfig;
use crate::models::channel::ChannelSpec;
use crate::{AppError, Result};

/// Permission bit for VIEW_CHANNEL.
const VIEW_CHANNEL: u32 = 1024;

/// External Discord operations the bot performs.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// Create a mentionable guild role; returns the new role id.
    async fn create_role(&self, guild_id: &str, name: &str) -> Result<String>;

    /// Create a private category visible only to `role_id`; returns the
    /// new category id.
    async fn create_category(&self, guild_id: &str, name: &str, role_id: &str) -> Result<String>;

    /// Create one channel under a category; returns the new channel id.
    async fn create_channel(
        &self,
        guild_id: &str,
        spec: &ChannelSpec,
        category_id: &str,
        role_id: &str,
    ) -> Result<String>;

    /// Overwrite the content of the original deferred response.
    async fn edit_original_response(
        &self,
        application_id: &str,
        interaction_token: &str,
        content: &str,
    ) -> Result<()>;
}

/// Production client over the Discord REST API.
pub struct DiscordClient {
    http: reqwest::Client,
    base_url: String,
    bot_token: String,
}

#[derive(Debug, Deserialize)]
struct CreatedEntity {
    id: String,
}

impl DiscordClient {
    /// Build a client from the Discord section of the global config.
    #[must_use]
    pub fn new(config: &DiscordConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            bot_token: config.bot_token.clone(),
        }
    }

    async fn post_json(&self, path: &str, payload: &serde_json::Value) -> Result<CreatedEntity> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bot {}", self.bot_token))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%url, %status, body, "discord api call failed");
            return Err(AppError::Discord(format!("{status} on {path}: {body}")));
        }
        Ok(response.json().await?)
    }

    fn topic_for(spec: &ChannelSpec) -> Option<String> {
        if !spec.kind.supports_topic() {
            return None;
        }
        let description = spec.description.as_deref()?;
        if spec.gm_only {
            Some(format!(
                "🔒 GM ONLY - {description}\n\n⚠️ Admins: Please manually restrict this channel to GMs only."
            ))
        } else {
            Some(description.to_owned())
        }
    }
}

#[async_trait]
impl DiscordApi for DiscordClient {
    async fn create_role(&self, guild_id: &str, name: &str) -> Result<String> {
        let payload = json!({
            "name": name,
            "mentionable": true,
        });
        let role = self
            .post_json(&format!("/guilds/{guild_id}/roles"), &payload)
            .await?;
        info!(guild_id, role_id = %role.id, name, "created campaign role");
        Ok(role.id)
    }

    async fn create_category(&self, guild_id: &str, name: &str, role_id: &str) -> Result<String> {
        // Private category: deny VIEW_CHANNEL for @everyone (whose role id
        // equals the guild id), allow it for the campaign role.
        let payload = json!({
            "name": name,
            "type": 4,
            "permission_overwrites": [
                {
                    "id": guild_id,
                    "type": 0,
                    "deny": VIEW_CHANNEL.to_string(),
                },
                {
                    "id": role_id,
                    "type": 0,
                    "allow": VIEW_CHANNEL.to_string(),
                },
            ],
        });
        let category = self
            .post_json(&format!("/guilds/{guild_id}/channels"), &payload)
            .await?;
        info!(guild_id, category_id = %category.id, name, "created campaign category");
        Ok(category.id)
    }

    async fn create_channel(
        &self,
        guild_id: &str,
        spec: &ChannelSpec,
        category_id: &str,
        _role_id: &str,
    ) -> Result<String> {
        // Channels inherit the category's permission overwrites.
        let mut payload = json!({
            "name": spec.name,
            "type": spec.kind.api_code(),
            "parent_id": category_id,
            "permission_overwrites": [],
        });
        if let Some(topic) = Self::topic_for(spec) {
            payload["topic"] = json!(topic);
        }
        let channel = self
            .post_json(&format!("/guilds/{guild_id}/channels"), &payload)
            .await?;
        info!(guild_id, channel_id = %channel.id, name = %spec.name, "created channel");
        Ok(channel.id)
    }

    async fn edit_original_response(
        &self,
        application_id: &str,
        interaction_token: &str,
        content: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/webhooks/{application_id}/{interaction_token}/messages/@original",
            self.base_url
        );
        let response = self
            .http
            .patch(&url)
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(|err| AppError::Edit(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Edit(format!("{status}: {body}")));
        }
        Ok(())
    }
}
