//! Axum route handler for the readiness analysis.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::models::{AnalyzeRequest, AnalyzeResponse};
use crate::analysis::readiness::compute_readiness;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /analyze
///
/// Scores the submitted skills against the career's requirements, then asks the
/// AI mentor for a plan. Every well-formed request gets 200; mentor failures are
/// reported inside `ai_text`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let span = info_span!("analyze", request_id = %Uuid::new_v4(), career = %request.career);
    let response = analyze(&state, request).instrument(span).await;

    Ok(Json(response))
}

async fn analyze(state: &AppState, request: AnalyzeRequest) -> AnalyzeResponse {
    debug!("Received analyze request: {request:?}");

    let required = state.catalog.required_skills(&request.career);
    let stats = compute_readiness(required, request.skills());

    info!(
        "readiness={} xp={} level={} missing={}",
        stats.readiness,
        stats.xp,
        stats.level,
        stats.missing.len()
    );

    let advisory = state
        .mentor
        .advise(
            &request.career,
            request.domain(),
            request.skills(),
            &stats.missing,
        )
        .await;

    AnalyzeResponse {
        domain: request.domain().to_string(),
        career: request.career,
        readiness: stats.readiness,
        xp: stats.xp,
        level: stats.level,
        missing: stats.missing,
        ai_text: advisory.to_string(),
    }
}
