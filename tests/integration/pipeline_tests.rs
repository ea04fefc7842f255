//! End-to-end pipeline tests: a signed `/add-campaign` request flows
//! through the router, the in-process queue, and the worker, ending in a
//! completion summary edit.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use channelwright::queue::InProcessQueue;
use channelwright::router::route_interaction;
use channelwright::worker;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::test_helpers::{
    add_campaign_body, signed_headers, test_channels, test_state, DiscordCall, RecordingDiscord,
};

#[tokio::test]
async fn add_campaign_runs_to_a_completion_summary() {
    let discord = Arc::new(RecordingDiscord::default());
    let (queue, mut rx) = InProcessQueue::channel(32);
    let state = test_state(Arc::clone(&discord), Arc::new(queue), test_channels());

    let body = add_campaign_body("Dragon's Rest");
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({ "type": 5 }));

    // Zero completion delay: all five payloads are already buffered.
    let mut batch = Vec::new();
    while let Ok(payload) = rx.try_recv() {
        batch.push(payload);
    }
    assert_eq!(batch.len(), 5);
    worker::process_batch(&state, batch).await;

    let calls = discord.calls();
    let channel_names: Vec<&str> = calls
        .iter()
        .filter_map(|call| match call {
            DiscordCall::CreateChannel { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(channel_names, ["general", "gm-notes", "voice-chat", "lore"]);

    let edits = discord.edits();
    assert_eq!(edits.len(), 5, "four progress edits plus the summary");
    assert!(edits[0].contains("(1/4)"));
    assert!(edits[3].contains("(4/4)"));
    assert!(edits[3].contains("100%"));

    let summary = edits.last().unwrap();
    assert!(summary.contains("✅ **Campaign Created: Dragon's Rest**"));
    assert!(summary.contains("**Role:** Dragon's Rest Members"));
    assert!(summary.contains("**Created 4 channels:**"));
    assert!(summary.contains("  • gm-notes 🔒\n"));
    assert!(summary.contains("⚠️ _Channels marked 🔒 need manual GM-only setup_"));
}

#[tokio::test]
async fn spawned_worker_drains_the_queue_and_stops_on_cancel() {
    let discord = Arc::new(RecordingDiscord::default());
    let (queue, rx) = InProcessQueue::channel(32);
    let state = Arc::new(test_state(
        Arc::clone(&discord),
        Arc::new(queue),
        test_channels(),
    ));

    let body = add_campaign_body("Dragon's Rest");
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::OK);

    let ct = CancellationToken::new();
    let handle = worker::spawn(Arc::clone(&state), rx, ct.clone());

    // Poll until the worker has produced the summary edit.
    let mut waited = Duration::ZERO;
    while discord.edits().len() < 5 && waited < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(10)).await;
        waited += Duration::from_millis(10);
    }
    let edits = discord.edits();
    assert_eq!(edits.len(), 5);
    assert!(edits.last().unwrap().contains("Campaign Created"));

    ct.cancel();
    handle.await.unwrap();
}
