//! Router-level tests: signature gating, command dispatch, and the
//! synchronous half of `/add-campaign`.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use channelwright::models::task::Task;
use channelwright::router::route_interaction;
use serde_json::json;

use super::test_helpers::{
    add_campaign_body, signed_headers, test_channels, test_state, DiscordCall, RecordingDiscord,
    RecordingQueue,
};

#[tokio::test]
async fn ping_answers_pong() {
    let discord = Arc::new(RecordingDiscord::default());
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(discord, queue, test_channels());

    let body = serde_json::to_vec(&json!({ "type": 1 })).unwrap();
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({ "type": 1 }));
}

#[tokio::test]
async fn missing_signature_headers_are_unauthorized() {
    let discord = Arc::new(RecordingDiscord::default());
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(discord, queue, test_channels());

    let body = serde_json::to_vec(&json!({ "type": 1 })).unwrap();
    let reply = route_interaction(&state, &HeaderMap::new(), &body).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "missing signature headers");
}

#[tokio::test]
async fn tampered_body_is_unauthorized() {
    let discord = Arc::new(RecordingDiscord::default());
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(discord, queue, test_channels());

    let signed = serde_json::to_vec(&json!({ "type": 1 })).unwrap();
    let tampered = serde_json::to_vec(&json!({ "type": 2 })).unwrap();
    let reply = route_interaction(&state, &signed_headers(&signed), &tampered).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "invalid request signature");
}

#[tokio::test]
async fn unrecognized_interaction_type_is_bad_request() {
    let discord = Arc::new(RecordingDiscord::default());
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(discord, queue, test_channels());

    let body = serde_json::to_vec(&json!({ "type": 9 })).unwrap();
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_command_is_bad_request() {
    let discord = Arc::new(RecordingDiscord::default());
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(discord, queue, test_channels());

    let body = serde_json::to_vec(&json!({
        "type": 2,
        "data": { "name": "explode" }
    }))
    .unwrap();
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "unknown command");
}

#[tokio::test]
async fn hellobot_greets_the_invoker() {
    let discord = Arc::new(RecordingDiscord::default());
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(discord, queue, test_channels());

    let body = serde_json::to_vec(&json!({
        "type": 2,
        "data": { "name": "hellobot" },
        "member": { "user": { "username": "Aria" } }
    }))
    .unwrap();
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["type"], 4);
    let content = reply.body["data"]["content"].as_str().unwrap();
    assert!(content.contains("Aria"));
}

#[tokio::test]
async fn add_campaign_without_name_is_an_ephemeral_rejection() {
    let discord = Arc::new(RecordingDiscord::default());
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(Arc::clone(&discord), Arc::clone(&queue), test_channels());

    let body = serde_json::to_vec(&json!({
        "type": 2,
        "data": { "name": "add-campaign", "options": [] },
        "guild_id": "guild-1",
        "application_id": "app-1",
        "token": "tok-1"
    }))
    .unwrap();
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["type"], 4);
    assert_eq!(reply.body["data"]["flags"], 64);
    let content = reply.body["data"]["content"].as_str().unwrap();
    assert!(content.contains("Campaign name is required"));

    // Validation failed before any external mutation.
    assert!(discord.calls().is_empty());
    assert!(queue.published().is_empty());
}

#[tokio::test]
async fn whitespace_only_name_is_rejected() {
    let discord = Arc::new(RecordingDiscord::default());
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(Arc::clone(&discord), queue, test_channels());

    let body = add_campaign_body("   ");
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::OK);
    let content = reply.body["data"]["content"].as_str().unwrap();
    assert!(content.contains("Campaign name is required"));
    assert!(discord.calls().is_empty());
}

#[tokio::test]
async fn add_campaign_outside_a_guild_is_rejected() {
    let discord = Arc::new(RecordingDiscord::default());
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(Arc::clone(&discord), queue, test_channels());

    let body = serde_json::to_vec(&json!({
        "type": 2,
        "data": {
            "name": "add-campaign",
            "options": [{ "name": "name", "value": "Dragon's Rest" }]
        },
        "application_id": "app-1",
        "token": "tok-1"
    }))
    .unwrap();
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["flags"], 64);
    let content = reply.body["data"]["content"].as_str().unwrap();
    assert!(content.contains("only be used in a server"));
    assert!(discord.calls().is_empty());
}

#[tokio::test]
async fn successful_add_campaign_defers_and_queues_all_work() {
    let discord = Arc::new(RecordingDiscord::default());
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(Arc::clone(&discord), Arc::clone(&queue), test_channels());

    let body = add_campaign_body("Dragon's Rest");
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({ "type": 5 }));

    let calls = discord.calls();
    assert_eq!(
        calls[0],
        DiscordCall::CreateRole {
            guild_id: "guild-1".into(),
            name: "Dragon's Rest Members".into(),
        }
    );
    assert_eq!(
        calls[1],
        DiscordCall::CreateCategory {
            guild_id: "guild-1".into(),
            name: "Dragon's Rest".into(),
            role_id: "role-9".into(),
        }
    );
    assert_eq!(calls.len(), 2, "channel creation is deferred to the worker");

    let published = queue.published();
    assert_eq!(published.len(), 5);
    let tasks: Vec<Task> = published
        .iter()
        .map(|(payload, _)| serde_json::from_str(payload).unwrap())
        .collect();
    assert!(tasks[..4]
        .iter()
        .all(|task| matches!(task, Task::CreateChannel(_))));
    let Task::Complete(complete) = &tasks[4] else {
        panic!("expected complete task last");
    };
    assert_eq!(complete.campaign_name, "Dragon's Rest");
    // Zero-delay config keeps the completion task immediate.
    assert_eq!(published[4].1, Duration::ZERO);
}

#[tokio::test]
async fn role_creation_failure_is_an_ephemeral_error() {
    let discord = Arc::new(RecordingDiscord {
        fail_create_role: true,
        ..RecordingDiscord::default()
    });
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(Arc::clone(&discord), Arc::clone(&queue), test_channels());

    let body = add_campaign_body("Dragon's Rest");
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["flags"], 64);
    let content = reply.body["data"]["content"].as_str().unwrap();
    assert!(content.contains("Failed to create campaign: Dragon's Rest"));
    assert!(discord.calls().is_empty());
    assert!(queue.published().is_empty());
}

#[tokio::test]
async fn category_creation_failure_stops_before_queueing() {
    let discord = Arc::new(RecordingDiscord {
        fail_create_category: true,
        ..RecordingDiscord::default()
    });
    let queue = Arc::new(RecordingQueue::default());
    let state = test_state(Arc::clone(&discord), Arc::clone(&queue), test_channels());

    let body = add_campaign_body("Dragon's Rest");
    let reply = route_interaction(&state, &signed_headers(&body), &body).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["flags"], 64);

    // The role call went through; nothing was queued after the failure.
    assert_eq!(discord.calls().len(), 1);
    assert!(matches!(discord.calls()[0], DiscordCall::CreateRole { .. }));
    assert!(queue.published().is_empty());
}
