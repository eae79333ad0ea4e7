use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use tracing::info;

use symlog_gateway::CompletionRequest;
use symlog_types::api::{AddSymptomRequest, AddSymptomResponse, AnalyzeRequest, AssistantReply};
use symlog_types::models::Symptom;

use crate::emergency::{ANALYSIS_EMERGENCY_REPLY, is_emergency};
use crate::error::ApiError;
use crate::prompt::{SYSTEM_PROMPT, analysis_prompt, emergency_haystack};
use crate::{AppState, JsonBody, json_body, run_db};

const DEFAULT_ANALYZE_LIMIT: i64 = 12;
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(30);
const ANALYZE_MAX_TOKENS: u32 = 500;

const CSV_HEADER: [&str; 5] = ["id", "name", "severity", "notes", "date_added"];

/// POST /api/symptoms/add
pub async fn add_symptom(
    State(state): State<AppState>,
    payload: JsonBody<AddSymptomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(payload)?;
    let name = req.name();
    if name.is_empty() {
        return Err(ApiError::Validation("name required"));
    }
    let severity = req.severity();
    let notes = req.notes();

    let id = run_db(&state, move |db| db.insert_symptom(&name, severity, &notes)).await?;
    info!(id, severity, "Symptom logged");

    Ok(Json(AddSymptomResponse { success: true, id }))
}

/// GET /api/symptoms/list
pub async fn list_symptoms(State(state): State<AppState>) -> Result<Json<Vec<Symptom>>, ApiError> {
    let rows = run_db(&state, |db| db.list_symptoms()).await?;
    Ok(Json(rows))
}

/// DELETE /api/symptoms/delete/{id} — succeeds whether or not the row existed.
pub async fn delete_symptom(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = run_db(&state, move |db| db.delete_symptom(id)).await?;
    info!(id, removed, "Symptom delete");

    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/symptoms/analyze
pub async fn analyze_symptoms(
    State(state): State<AppState>,
    payload: JsonBody<AnalyzeRequest>,
) -> Result<Json<AssistantReply>, ApiError> {
    let req = json_body(payload)?;
    // Passed straight to LIMIT: 0 selects nothing, a negative value selects every row.
    let limit = req.limit().unwrap_or(DEFAULT_ANALYZE_LIMIT);

    let mut entries = run_db(&state, move |db| db.recent_symptoms(limit)).await?;
    if entries.is_empty() {
        return Err(ApiError::Validation("no symptoms logged"));
    }

    if is_emergency(&emergency_haystack(&entries)) {
        info!(entries = entries.len(), "Emergency keywords in symptom log, skipping gateway");
        return Ok(Json(AssistantReply {
            reply: ANALYSIS_EMERGENCY_REPLY.to_string(),
            emergency: true,
        }));
    }

    // Most recent first from the query; the prompt reads oldest to newest.
    entries.reverse();

    let reply = state
        .gateway
        .complete(CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: analysis_prompt(&entries),
            max_tokens: ANALYZE_MAX_TOKENS,
            temperature: 0.2,
            timeout: ANALYZE_TIMEOUT,
        })
        .await
        .map_err(|source| ApiError::Gateway {
            context: "analysis failed",
            source,
        })?;

    Ok(Json(AssistantReply {
        reply,
        emergency: false,
    }))
}

/// GET /api/symptoms/export — every symptom as a CSV attachment, newest first.
pub async fn export_symptoms(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = run_db(&state, |db| db.export_symptoms()).await?;
    let csv = render_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment;filename=symptoms_export.csv",
            ),
        ],
        csv,
    ))
}

fn render_csv(rows: &[Symptom]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record([
            row.id.to_string(),
            row.name.clone(),
            row.severity.to_string(),
            row.notes.clone().unwrap_or_default(),
            row.date_added.clone(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}
