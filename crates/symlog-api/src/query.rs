use std::time::Duration;

use axum::{Json, extract::State};
use tracing::info;

use symlog_gateway::CompletionRequest;
use symlog_types::api::{AssistantReply, QueryRequest};

use crate::emergency::{QUERY_EMERGENCY_REPLY, is_emergency};
use crate::error::ApiError;
use crate::prompt::SYSTEM_PROMPT;
use crate::{AppState, JsonBody, json_body};

const QUERY_TIMEOUT: Duration = Duration::from_secs(20);
const QUERY_MAX_TOKENS: u32 = 400;

/// POST /api/query — one free-text question relayed to the gateway.
pub async fn query_model(
    State(state): State<AppState>,
    payload: JsonBody<QueryRequest>,
) -> Result<Json<AssistantReply>, ApiError> {
    let text = json_body(payload)?.text();
    if text.is_empty() {
        return Err(ApiError::Validation("empty query"));
    }

    if is_emergency(&text) {
        info!("Emergency keywords in query, skipping gateway");
        return Ok(Json(AssistantReply {
            reply: QUERY_EMERGENCY_REPLY.to_string(),
            emergency: true,
        }));
    }

    let reply = state
        .gateway
        .complete(CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: text,
            max_tokens: QUERY_MAX_TOKENS,
            temperature: 0.2,
            timeout: QUERY_TIMEOUT,
        })
        .await
        .map_err(|source| ApiError::Gateway {
            context: "model request failed",
            source,
        })?;

    Ok(Json(AssistantReply {
        reply,
        emergency: false,
    }))
}
