//! Queue consumer that performs channel creation and progress edits.
//!
//! Messages may arrive batched and moderately out of order; each one
//! carries its own `current/total`, so a late low-numbered message only
//! shows a smaller bar transiently. Every edit is a full overwrite of the
//! deferred response, last writer wins. Per-message failures are caught
//! locally so one bad message never blocks the rest of a batch.
//!
//! Redelivery of a `create_channel` message creates a duplicate channel:
//! the Discord call carries no idempotency key, so the worker is
//! idempotent only in reporting, not in side effects.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::models::task::{CompleteTask, CreateChannelTask, Task};
use crate::render;
use crate::state::AppState;
use crate::Result;

/// Spawn the background consumer loop.
///
/// Drains batches of up to `config.worker_batch_size` payloads and hands
/// them to [`process_batch`]. Exits when the queue closes or the token is
/// cancelled.
#[must_use]
pub fn spawn(
    state: Arc<AppState>,
    mut rx: mpsc::Receiver<String>,
    ct: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let batch_size = state.config.worker_batch_size;
        let mut batch = Vec::with_capacity(batch_size);
        loop {
            batch.clear();
            let received = tokio::select! {
                () = ct.cancelled() => 0,
                count = rx.recv_many(&mut batch, batch_size) => count,
            };
            if received == 0 {
                break;
            }
            process_batch(&state, batch.drain(..).collect()).await;
        }
        info!("task worker exiting");
    })
}

/// Process one batch of queue payloads.
///
/// Never returns an error: each message's failure is caught, logged, and
/// answered with a best-effort error edit.
pub async fn process_batch(state: &AppState, batch: Vec<String>) {
    for payload in batch {
        if let Err(err) = process_message(state, &payload).await {
            error!(%err, "task processing failed");
            send_error_edit(state, &payload, &err.to_string()).await;
        }
    }
}

async fn process_message(state: &AppState, payload: &str) -> Result<()> {
    let task: Task = serde_json::from_str(payload)?;
    info!(run_id = task.run_id(), "processing task");
    match task {
        Task::CreateChannel(task) => create_channel(state, &task).await,
        Task::Complete(task) => complete(state, &task).await,
    }
}

async fn create_channel(state: &AppState, task: &CreateChannelTask) -> Result<()> {
    info!(
        run_id = %task.run_id,
        channel = %task.channel.name,
        current = task.current,
        total = task.total,
        "creating channel"
    );
    let channel_id = state
        .discord
        .create_channel(
            &task.guild_id,
            &task.channel,
            &task.category_id,
            &task.campaign_role_id,
        )
        .await?;
    info!(run_id = %task.run_id, %channel_id, "channel created");

    let status = render::creation_status(
        &task.campaign_name,
        &task.channel.name,
        task.channel.kind,
        task.current,
        task.total,
    );
    edit_response(state, &task.application_id, &task.interaction_token, &status).await;
    Ok(())
}

async fn complete(state: &AppState, task: &CompleteTask) -> Result<()> {
    let summary = render::completion_summary(task);
    edit_response(state, &task.application_id, &task.interaction_token, &summary).await;
    info!(run_id = %task.run_id, campaign = %task.campaign_name, "campaign creation complete");
    Ok(())
}

/// Overwrite the deferred response, swallowing failure.
///
/// Editing is a best-effort notification channel: by the time it fails the
/// only recourse is another edit attempt on a later task.
async fn edit_response(state: &AppState, application_id: &str, token: &str, content: &str) {
    if let Err(err) = state
        .discord
        .edit_original_response(application_id, token, content)
        .await
    {
        warn!(%err, "failed to edit original response");
    }
}

/// Best-effort error edit using whatever credentials survive in a payload
/// that may not even be a valid task.
async fn send_error_edit(state: &AppState, payload: &str, error: &str) {
    let Ok(raw) = serde_json::from_str::<serde_json::Value>(payload) else {
        warn!("cannot salvage credentials from malformed payload");
        return;
    };
    let application_id = raw.get("application_id").and_then(|v| v.as_str());
    let token = raw.get("interaction_token").and_then(|v| v.as_str());
    let (Some(application_id), Some(token)) = (application_id, token) else {
        warn!("payload carries no response credentials for error edit");
        return;
    };
    edit_response(state, application_id, token, &render::worker_failure(error)).await;
}
