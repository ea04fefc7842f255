//! Unit tests for interaction and task wire models.

use channelwright::models::channel::{ChannelKind, ChannelSpec};
use channelwright::models::interaction::{
    Interaction, InteractionResponse, InteractionType, EPHEMERAL_FLAG,
};
use channelwright::models::task::{CreateChannelTask, Task};
use serde_json::json;

#[test]
fn interaction_type_maps_known_wire_values() {
    assert_eq!(InteractionType::from(1), InteractionType::Ping);
    assert_eq!(InteractionType::from(2), InteractionType::ApplicationCommand);
    assert_eq!(InteractionType::from(9), InteractionType::Unrecognized(9));
}

#[test]
fn interaction_deserializes_command_payload() {
    let body = json!({
        "type": 2,
        "data": {
            "name": "add-campaign",
            "options": [{ "name": "name", "value": "Dragon's Rest" }]
        },
        "guild_id": "g1",
        "application_id": "app1",
        "token": "tok1"
    });
    let interaction: Interaction = serde_json::from_value(body).unwrap();
    assert_eq!(interaction.kind, InteractionType::ApplicationCommand);
    assert_eq!(interaction.option_str("name"), Some("Dragon's Rest"));
    assert_eq!(interaction.option_str("missing"), None);
    assert_eq!(interaction.guild_id.as_deref(), Some("g1"));
}

#[test]
fn invoker_name_prefers_member_over_user() {
    let interaction: Interaction = serde_json::from_value(json!({
        "type": 2,
        "member": { "user": { "username": "GuildUser" } },
        "user": { "username": "DirectUser" }
    }))
    .unwrap();
    assert_eq!(interaction.invoker_name(), "GuildUser");
}

#[test]
fn invoker_name_falls_back_to_user_then_placeholder() {
    let with_user: Interaction = serde_json::from_value(json!({
        "type": 2,
        "user": { "username": "DirectUser" }
    }))
    .unwrap();
    assert_eq!(with_user.invoker_name(), "DirectUser");

    let anonymous: Interaction = serde_json::from_value(json!({ "type": 2 })).unwrap();
    assert_eq!(anonymous.invoker_name(), "adventurer");
}

#[test]
fn pong_serializes_to_type_one_without_data() {
    let body = serde_json::to_value(InteractionResponse::pong()).unwrap();
    assert_eq!(body, json!({ "type": 1 }));
}

#[test]
fn ephemeral_message_sets_flag_64() {
    let body = serde_json::to_value(InteractionResponse::ephemeral("nope")).unwrap();
    assert_eq!(body["type"], 4);
    assert_eq!(body["data"]["content"], "nope");
    assert_eq!(body["data"]["flags"], EPHEMERAL_FLAG);
}

#[test]
fn visible_message_has_no_flags() {
    let body = serde_json::to_value(InteractionResponse::message("hi")).unwrap();
    assert_eq!(body["type"], 4);
    assert_eq!(body["data"]["content"], "hi");
    assert!(body["data"].get("flags").is_none());
}

#[test]
fn deferred_serializes_to_type_five() {
    let body = serde_json::to_value(InteractionResponse::deferred()).unwrap();
    assert_eq!(body, json!({ "type": 5 }));
}

#[test]
fn channel_kind_wire_codes_and_labels() {
    assert_eq!(ChannelKind::Text.api_code(), 0);
    assert_eq!(ChannelKind::Voice.api_code(), 2);
    assert_eq!(ChannelKind::Forum.api_code(), 15);
    assert_eq!(ChannelKind::Voice.label(), "Voice");
    assert!(ChannelKind::Text.supports_topic());
    assert!(ChannelKind::Forum.supports_topic());
    assert!(!ChannelKind::Voice.supports_topic());
}

#[test]
fn task_payloads_are_tagged_by_task_type() {
    let task = Task::CreateChannel(CreateChannelTask {
        application_id: "app1".into(),
        interaction_token: "tok1".into(),
        guild_id: "g1".into(),
        channel: ChannelSpec::new("general", ChannelKind::Text, false),
        category_id: "cat1".into(),
        campaign_role_id: "role1".into(),
        current: 1,
        total: 4,
        campaign_name: "Dragon's Rest".into(),
        run_id: "run1".into(),
    });
    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(value["task_type"], "create_channel");
    assert_eq!(value["current"], 1);
    assert_eq!(value["total"], 4);
    assert_eq!(value["channel"]["type"], "text");

    let parsed: Task = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, task);
    assert_eq!(parsed.application_id(), "app1");
    assert_eq!(parsed.interaction_token(), "tok1");
    assert_eq!(parsed.run_id(), "run1");
}

#[test]
fn unknown_task_type_fails_to_parse() {
    let result = serde_json::from_value::<Task>(json!({ "task_type": "explode" }));
    assert!(result.is_err());
}
