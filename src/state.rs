//! Shared application state.

use std::sync::Arc;

use crate::config::GlobalConfig;
use crate::discord::client::DiscordApi;
use crate::discord::verify::InteractionVerifier;
use crate::models::channel::ChannelSpec;
use crate::queue::TaskQueue;

/// State shared by the webhook router and the task worker.
///
/// Constructed once at startup; there is no other shared mutable state
/// between invocations — the only shared resource is external (the one
/// deferred interaction message and the Discord API).
pub struct AppState {
    /// Global configuration.
    pub config: Arc<GlobalConfig>,
    /// Ordered campaign channel templates, loaded once at startup.
    pub channels: Vec<ChannelSpec>,
    /// Webhook signature verifier.
    pub verifier: InteractionVerifier,
    /// Discord REST operations.
    pub discord: Arc<dyn DiscordApi>,
    /// Task queue publish side.
    pub queue: Arc<dyn TaskQueue>,
}
