//! Axum route handlers for the Analysis API.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::info;

use crate::analysis::pipeline::{analyze, reselect, AnalysisReport, EngineConfig, Reselection};
use crate::errors::AppError;
use crate::models::resume::WorkEntry;
use crate::state::AppState;

/// Trimmed résumé text shorter than this is treated as a failed extraction.
const MIN_RESUME_CHARS: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchExtractRequest {
    pub resumes: Vec<String>,
    #[serde(default)]
    pub jd_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchExtractResponse {
    pub reports: Vec<AnalysisReport>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub work_experience: Vec<WorkEntry>,
    pub jd_text: String,
    #[serde(default)]
    pub min_primary: Option<usize>,
    #[serde(default)]
    pub additional_count: Option<usize>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn is_too_short(resume_text: &str) -> bool {
    resume_text.trim().chars().count() < MIN_RESUME_CHARS
}

/// Blank JD text is the same as no JD.
fn non_blank(jd_text: Option<String>) -> Option<String> {
    jd_text.filter(|jd| !jd.trim().is_empty())
}

async fn analyze_blocking(
    resume_text: String,
    jd_text: Option<String>,
    engine: Arc<EngineConfig>,
) -> Result<AnalysisReport, AppError> {
    tokio::task::spawn_blocking(move || analyze(&resume_text, jd_text.as_deref(), &engine))
        .await
        .map_err(|e| AppError::Internal(e.into()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/extract
///
/// Analyzes one résumé, optionally against a job description.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    if is_too_short(&request.resume_text) {
        return Err(AppError::Validation(format!(
            "resume_text must contain at least {MIN_RESUME_CHARS} characters"
        )));
    }

    let jd_text = non_blank(request.jd_text);
    let has_jd = jd_text.is_some();
    let report = analyze_blocking(request.resume_text, jd_text, state.engine.clone()).await?;

    info!(
        "Extracted résumé: {} entries, {} requirements, coverage {}% (jd: {})",
        report.work_experience.len(),
        report.requirements.len(),
        report.coverage_pct,
        has_jd
    );

    Ok(Json(report))
}

/// POST /api/v1/extract/batch
///
/// Analyzes every résumé against the same job description. Each résumé runs
/// on its own blocking task; reports come back in request order.
pub async fn handle_extract_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchExtractRequest>,
) -> Result<Json<BatchExtractResponse>, AppError> {
    let max = state.config.max_batch_size;
    if request.resumes.is_empty() {
        return Err(AppError::Validation("resumes cannot be empty".to_string()));
    }
    if request.resumes.len() > max {
        return Err(AppError::Validation(format!(
            "resumes may contain at most {max} items, got {}",
            request.resumes.len()
        )));
    }
    if let Some(i) = request.resumes.iter().position(|r| is_too_short(r)) {
        return Err(AppError::UnprocessableEntity(format!(
            "resumes[{i}] must contain at least {MIN_RESUME_CHARS} characters"
        )));
    }

    let jd_text = non_blank(request.jd_text);
    let total = request.resumes.len();

    let mut tasks = JoinSet::new();
    for (i, resume_text) in request.resumes.into_iter().enumerate() {
        let jd_text = jd_text.clone();
        let engine = state.engine.clone();
        tasks.spawn_blocking(move || (i, analyze(&resume_text, jd_text.as_deref(), &engine)));
    }

    let mut slots: Vec<Option<AnalysisReport>> = vec![None; total];
    while let Some(joined) = tasks.join_next().await {
        let (i, report) = joined.map_err(|e| AppError::Internal(e.into()))?;
        slots[i] = Some(report);
    }
    let reports: Vec<AnalysisReport> = slots.into_iter().flatten().collect();

    info!("Extracted batch of {} résumés", reports.len());

    Ok(Json(BatchExtractResponse { reports }))
}

/// POST /api/v1/select
///
/// Re-runs coverage and selection over caller-edited work entries.
/// Omitted knobs fall back to the configured selection params.
pub async fn handle_select(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<Reselection>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let mut params = state.engine.selection;
    if let Some(n) = request.min_primary {
        params.min_primary = n;
    }
    if let Some(n) = request.additional_count {
        params.additional_count = n;
    }

    let entry_count = request.work_experience.len();
    let result = tokio::task::spawn_blocking(move || {
        reselect(&request.work_experience, &request.jd_text, &params)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?;

    info!(
        "Reselected {} entries: {} primary, {} additional",
        entry_count,
        result.selection.primary.len(),
        result.selection.additional.len()
    );

    Ok(Json(result))
}
