//! Interaction routing.
//!
//! Classifies inbound webhook payloads, performs validation and the
//! synchronous side effects (role + category creation), hands the
//! remaining per-channel work to the queue, and answers with a deferred
//! acknowledgement inside the platform's response-time budget.
//!
//! Transport and security failures travel as non-200 statuses; user-input
//! errors travel as 200s with ephemeral content, because the interaction's
//! acknowledgement must succeed even when the command is semantically
//! invalid.

use axum::http::{HeaderMap, StatusCode};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::enqueue::{enqueue_campaign_tasks, CampaignContext};
use crate::models::interaction::{Interaction, InteractionResponse, InteractionType};
use crate::render;
use crate::state::AppState;
use crate::AppError;

/// One routed webhook reply: an HTTP status plus a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code.
    pub status: StatusCode,
    /// JSON response body.
    pub body: Value,
}

impl Reply {
    fn interaction(response: &InteractionResponse) -> Self {
        Self {
            status: StatusCode::OK,
            body: serde_json::to_value(response).unwrap_or_else(|_| json!({})),
        }
    }

    fn error(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }
}

/// Route one inbound webhook request.
pub async fn route_interaction(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Reply {
    // Header pre-check is distinct from verification failure so the two
    // 401 paths are tellable apart in logs.
    let signature = headers
        .get("x-signature-ed25519")
        .and_then(|value| value.to_str().ok());
    let timestamp = headers
        .get("x-signature-timestamp")
        .and_then(|value| value.to_str().ok());
    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        warn!("request missing signature or timestamp header");
        return Reply::error(StatusCode::UNAUTHORIZED, "missing signature headers");
    };

    match state.verifier.verify(timestamp, body, signature) {
        Ok(()) => {}
        Err(AppError::InvalidSignature) => {
            warn!("request signature verification failed");
            return Reply::error(StatusCode::UNAUTHORIZED, "invalid request signature");
        }
        Err(err) => {
            warn!(%err, "error during signature verification");
            return Reply::error(StatusCode::UNAUTHORIZED, "signature verification error");
        }
    }

    let Ok(interaction) = serde_json::from_slice::<Interaction>(body) else {
        warn!("unparseable interaction body");
        return Reply::error(StatusCode::BAD_REQUEST, "unknown interaction");
    };

    match interaction.kind {
        // PING answers must be fast and side-effect-free; the platform
        // uses them for endpoint liveness checks.
        InteractionType::Ping => Reply::interaction(&InteractionResponse::pong()),
        InteractionType::ApplicationCommand => route_command(state, &interaction).await,
        InteractionType::Unrecognized(value) => {
            warn!(value, "unrecognized interaction type");
            Reply::error(StatusCode::BAD_REQUEST, "unknown interaction type")
        }
    }
}

async fn route_command(state: &AppState, interaction: &Interaction) -> Reply {
    let Some(command) = interaction.data.as_ref().map(|data| data.name.as_str()) else {
        return Reply::error(StatusCode::BAD_REQUEST, "interaction has no command data");
    };

    match command {
        "hellobot" => {
            let content = render::greeting(interaction.invoker_name());
            Reply::interaction(&InteractionResponse::message(content))
        }
        "add-campaign" => add_campaign(state, interaction).await,
        other => {
            warn!(command = other, "unknown command");
            Reply::error(StatusCode::BAD_REQUEST, "unknown command")
        }
    }
}

/// Handle `/add-campaign`: validate input, create role and category
/// synchronously, queue the per-channel work, and defer.
///
/// All validation happens before any external mutation, so an invalid
/// invocation never leaves partial state behind.
async fn add_campaign(state: &AppState, interaction: &Interaction) -> Reply {
    let campaign_name = interaction
        .option_str("name")
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let Some(campaign_name) = campaign_name else {
        return Reply::interaction(&InteractionResponse::ephemeral(
            "❌ Campaign name is required!",
        ));
    };

    let Some(guild_id) = interaction.guild_id.as_deref() else {
        return Reply::interaction(&InteractionResponse::ephemeral(
            "❌ This command can only be used in a server!",
        ));
    };

    let (Some(application_id), Some(token)) = (
        interaction.application_id.as_deref(),
        interaction.token.as_deref(),
    ) else {
        return Reply::interaction(&InteractionResponse::ephemeral(
            "❌ Interaction is missing its response token!",
        ));
    };

    info!(campaign_name, guild_id, "starting campaign creation");

    let role_name = format!("{campaign_name} Members");
    let role_id = match state.discord.create_role(guild_id, &role_name).await {
        Ok(id) => id,
        Err(err) => {
            error!(%err, campaign_name, "role creation failed");
            return Reply::interaction(&InteractionResponse::ephemeral(
                render::campaign_failure(campaign_name, &err.to_string()),
            ));
        }
    };

    let category_id = match state
        .discord
        .create_category(guild_id, campaign_name, &role_id)
        .await
    {
        Ok(id) => id,
        Err(err) => {
            // No compensating rollback: the role stays behind, and this
            // trace is the only record of it.
            warn!(%role_id, campaign_name, "category creation failed; role is orphaned");
            error!(%err, campaign_name, "category creation failed");
            return Reply::interaction(&InteractionResponse::ephemeral(
                render::campaign_failure(campaign_name, &err.to_string()),
            ));
        }
    };

    let ctx = CampaignContext {
        guild_id: guild_id.to_owned(),
        application_id: application_id.to_owned(),
        interaction_token: token.to_owned(),
        campaign_name: campaign_name.to_owned(),
        role_name,
        role_id,
        category_id,
    };
    let delay_per_channel = state.config.completion_delay_per_channel();
    if let Err(err) =
        enqueue_campaign_tasks(state.queue.as_ref(), &ctx, &state.channels, delay_per_channel).await
    {
        error!(%err, campaign_name, "failed to queue campaign tasks");
        return Reply::interaction(&InteractionResponse::ephemeral(
            render::campaign_failure(campaign_name, &err.to_string()),
        ));
    }

    // Deferred acknowledgement: total work exceeds the synchronous
    // response budget, so the worker finishes via response edits.
    Reply::interaction(&InteractionResponse::deferred())
}
