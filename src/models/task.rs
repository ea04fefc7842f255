//! Queue task schemas.
//!
//! Tasks are JSON-encoded and published as opaque string payloads. The
//! `task_type` tag closes the task set: anything else fails to parse and
//! is handled by the worker's per-message error path.

use serde::{Deserialize, Serialize};

use crate::models::channel::{ChannelSpec, ChannelSummary};

/// One queued unit of campaign work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "task_type", rename_all = "snake_case")]
pub enum Task {
    /// Create one channel and report progress.
    CreateChannel(CreateChannelTask),
    /// Publish the final campaign summary.
    Complete(CompleteTask),
}

impl Task {
    /// Application id embedded in the task.
    #[must_use]
    pub fn application_id(&self) -> &str {
        match self {
            Self::CreateChannel(task) => &task.application_id,
            Self::Complete(task) => &task.application_id,
        }
    }

    /// Interaction continuation token embedded in the task.
    #[must_use]
    pub fn interaction_token(&self) -> &str {
        match self {
            Self::CreateChannel(task) => &task.interaction_token,
            Self::Complete(task) => &task.interaction_token,
        }
    }

    /// Correlation id shared by every task of one campaign-creation run.
    #[must_use]
    pub fn run_id(&self) -> &str {
        match self {
            Self::CreateChannel(task) => &task.run_id,
            Self::Complete(task) => &task.run_id,
        }
    }
}

/// One `create_channel` task, published per configured channel.
///
/// Invariant: across the tasks of one run, `current` is unique and densely
/// packed in `[1, total]`, and `total` is identical on every task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CreateChannelTask {
    /// Application id for response edits.
    pub application_id: String,
    /// Interaction continuation token for response edits.
    pub interaction_token: String,
    /// Guild to create the channel in.
    pub guild_id: String,
    /// Snapshot of the channel template.
    pub channel: ChannelSpec,
    /// Parent category created synchronously by the router.
    pub category_id: String,
    /// Campaign role created synchronously by the router.
    pub campaign_role_id: String,
    /// 1-based position of this channel in the run.
    pub current: usize,
    /// Total channels in the run.
    pub total: usize,
    /// Campaign name for progress rendering.
    pub campaign_name: String,
    /// Correlation id for the campaign-creation run.
    pub run_id: String,
}

/// The single `complete` task of a run, published with a delivery delay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CompleteTask {
    /// Application id for response edits.
    pub application_id: String,
    /// Interaction continuation token for response edits.
    pub interaction_token: String,
    /// Campaign name for the summary header.
    pub campaign_name: String,
    /// Name of the campaign role.
    pub role_name: String,
    /// Channel snapshots in configuration order, pre-computed at enqueue
    /// time rather than observed from creation results.
    pub created_channels: Vec<ChannelSummary>,
    /// Correlation id for the campaign-creation run.
    pub run_id: String,
}
