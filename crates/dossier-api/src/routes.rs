//! HTTP route handlers for the API.

use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dossier_common::Turn;
use dossier_memory::{SessionInfo, MAX_TURNS};
use dossier_report::{CandidateReport, DomainDeepDive, SkillsReport, TraitsReport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip)]
    status: StatusCode,
}

impl ErrorResponse {
    fn bad_request(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            error: error.into(),
            code,
            status: StatusCode::BAD_REQUEST,
        }
    }

    fn internal(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            error: error.into(),
            code,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Chat response body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
}

/// Handle one conversational turn. A recency-store or reply-oracle failure
/// is fatal to this request only; extraction runs out of band.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ErrorResponse> {
    if request.session_id.is_empty() || request.message.is_empty() {
        return Err(ErrorResponse::bad_request(
            "session_id and message are required",
            "MISSING_FIELDS",
        ));
    }

    info!(
        session_id = %request.session_id,
        message_preview = %request.message.chars().take(50).collect::<String>(),
        "Received chat message"
    );

    let reply = state
        .chat
        .handle_turn(
            &request.session_id,
            &request.message,
            request.system_prompt.as_deref(),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "Turn handling failed");
            ErrorResponse::internal(format!("Turn handling failed: {e}"), "TURN_ERROR")
        })?;

    Ok(Json(ChatResponse {
        session_id: request.session_id,
        reply,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

/// Session history response.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub turns: Vec<Turn>,
    pub info: SessionInfo,
}

/// Recent turns for a session, oldest first.
pub async fn session_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ErrorResponse> {
    let limit = params.limit.unwrap_or(MAX_TURNS);
    debug!(session_id = %session_id, limit, "Reading session history");

    let turns = state
        .chat
        .read_history(&session_id, limit)
        .await
        .map_err(|e| ErrorResponse::internal(format!("History read failed: {e}"), "HISTORY_ERROR"))?;
    let info = state
        .chat
        .session_info(&session_id)
        .await
        .map_err(|e| ErrorResponse::internal(format!("Session info failed: {e}"), "INFO_ERROR"))?;

    Ok(Json(HistoryResponse {
        session_id,
        turns,
        info,
    }))
}

/// Session deletion response.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub session_id: String,
    pub cleared: bool,
}

/// Clear a session's buffer. Persisted graph evidence is untouched.
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<DeleteResponse>, ErrorResponse> {
    let cleared = state
        .chat
        .clear_session(&session_id)
        .await
        .map_err(|e| ErrorResponse::internal(format!("Clear failed: {e}"), "CLEAR_ERROR"))?;

    info!(session_id = %session_id, cleared, "Cleared session");

    Ok(Json(DeleteResponse {
        session_id,
        cleared,
    }))
}

/// Full assessment report for a candidate.
pub async fn candidate_report(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<CandidateReport>, ErrorResponse> {
    state
        .reports
        .candidate_report(&session_id)
        .await
        .map(Json)
        .map_err(|e| ErrorResponse::internal(format!("Report failed: {e}"), "REPORT_ERROR"))
}

/// Skills grouped by domain.
pub async fn skills_report(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SkillsReport>, ErrorResponse> {
    state
        .reports
        .skills_report(&session_id)
        .await
        .map(Json)
        .map_err(|e| ErrorResponse::internal(format!("Report failed: {e}"), "REPORT_ERROR"))
}

/// Traits with resolved intensities.
pub async fn traits_report(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<TraitsReport>, ErrorResponse> {
    state
        .reports
        .traits_report(&session_id)
        .await
        .map(Json)
        .map_err(|e| ErrorResponse::internal(format!("Report failed: {e}"), "REPORT_ERROR"))
}

/// Per-skill evidence for one domain.
pub async fn domain_deep_dive(
    State(state): State<Arc<AppState>>,
    Path((session_id, domain)): Path<(String, String)>,
) -> Result<Json<DomainDeepDive>, ErrorResponse> {
    state
        .reports
        .domain_deep_dive(&session_id, &domain)
        .await
        .map(Json)
        .map_err(|e| ErrorResponse::internal(format!("Report failed: {e}"), "REPORT_ERROR"))
}
