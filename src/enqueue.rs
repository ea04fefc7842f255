//! Fan-out of campaign work into queue tasks.

use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use crate::models::channel::{ChannelSpec, ChannelSummary};
use crate::models::task::{CompleteTask, CreateChannelTask, Task};
use crate::queue::TaskQueue;
use crate::Result;

/// Validated campaign context assembled by the router before handoff.
#[derive(Debug, Clone)]
pub struct CampaignContext {
    /// Guild the campaign lives in.
    pub guild_id: String,
    /// Application id for response edits.
    pub application_id: String,
    /// Interaction continuation token for response edits.
    pub interaction_token: String,
    /// Campaign name.
    pub campaign_name: String,
    /// Name of the role created for the campaign.
    pub role_name: String,
    /// Id of the created campaign role.
    pub role_id: String,
    /// Id of the created private category.
    pub category_id: String,
}

/// Publish one `create_channel` task per configured channel, then exactly
/// one `complete` task delayed by `channels.len() * delay_per_channel`.
///
/// The delay substitutes for a missing run-after-N-tasks primitive: it
/// makes the completion message land after the per-channel tasks have had
/// time to process, without a hard barrier.
///
/// # Errors
///
/// Returns `AppError::Queue` or `AppError::Json` if any publish fails;
/// earlier publishes are not withdrawn.
pub async fn enqueue_campaign_tasks(
    queue: &dyn TaskQueue,
    ctx: &CampaignContext,
    channels: &[ChannelSpec],
    delay_per_channel: Duration,
) -> Result<()> {
    let total = channels.len();
    let run_id = Uuid::new_v4().to_string();

    for (index, spec) in channels.iter().enumerate() {
        let task = Task::CreateChannel(CreateChannelTask {
            application_id: ctx.application_id.clone(),
            interaction_token: ctx.interaction_token.clone(),
            guild_id: ctx.guild_id.clone(),
            channel: spec.clone(),
            category_id: ctx.category_id.clone(),
            campaign_role_id: ctx.role_id.clone(),
            current: index + 1,
            total,
            campaign_name: ctx.campaign_name.clone(),
            run_id: run_id.clone(),
        });
        queue
            .publish(serde_json::to_string(&task)?, Duration::ZERO)
            .await?;
        info!(
            run_id = %run_id,
            channel = %spec.name,
            current = index + 1,
            total,
            "queued channel creation task"
        );
    }

    let completion = Task::Complete(CompleteTask {
        application_id: ctx.application_id.clone(),
        interaction_token: ctx.interaction_token.clone(),
        campaign_name: ctx.campaign_name.clone(),
        role_name: ctx.role_name.clone(),
        created_channels: channels.iter().map(ChannelSummary::from).collect(),
        run_id: run_id.clone(),
    });
    let delay = delay_per_channel * u32::try_from(total).unwrap_or(u32::MAX);
    queue
        .publish(serde_json::to_string(&completion)?, delay)
        .await?;
    info!(run_id = %run_id, total, delay_secs = delay.as_secs(), "queued completion task");

    Ok(())
}
