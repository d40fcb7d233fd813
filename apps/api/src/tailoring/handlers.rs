//! Axum route handlers for the Tailoring API.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::{LlmError, ModelClient, ModelConfig};
use crate::state::AppState;
use crate::tailoring::pipeline::{tailor, FailureCode, ResultEnvelope, TailoringRequest};
use crate::tailoring::summary::{JobDescriptionInput, JobDescriptionSummary, SummarizeJobDescription};

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Missing fields deserialize as empty strings and are rejected by the pipeline's
/// own validation, so the caller still gets an envelope.
#[derive(Deserialize)]
pub struct TailorRequestBody {
    #[serde(default)]
    pub resume_document: String,
    #[serde(default)]
    pub cover_letter_document: String,
    #[serde(default)]
    pub job_description: String,
    pub api_key: Option<String>,
}

#[derive(Deserialize)]
pub struct SummaryRequestBody {
    pub job_description: String,
    pub api_key: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tailor
///
/// Detect language → translate German → tailor resume and cover letter.
/// Always answers with a `ResultEnvelope`, even for malformed bodies.
pub async fn handle_tailor(
    State(state): State<AppState>,
    body: Result<Json<TailorRequestBody>, JsonRejection>,
) -> (StatusCode, Json<ResultEnvelope>) {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!("Rejected tailoring request body: {rejection}");
            let envelope = ResultEnvelope::from_error(&LlmError::Validation(rejection.body_text()));
            return (StatusCode::BAD_REQUEST, Json(envelope));
        }
    };

    let credential = state
        .config
        .resolve_api_key(body.api_key.as_deref())
        .unwrap_or_default();

    let request = TailoringRequest {
        resume_document: body.resume_document,
        cover_letter_document: body.cover_letter_document,
        job_description: body.job_description,
        credential,
    };

    let envelope = tailor(state.llm.clone(), &state.config.gemini_model, request).await;
    (envelope_status(&envelope), Json(envelope))
}

/// POST /api/v1/job-description/summary
///
/// Summarizes the key qualifications a job description asks for.
pub async fn handle_summarize(
    State(state): State<AppState>,
    Json(body): Json<SummaryRequestBody>,
) -> Result<Json<JobDescriptionSummary>, AppError> {
    if body.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let api_key = state
        .config
        .resolve_api_key(body.api_key.as_deref())
        .ok_or_else(|| AppError::Validation("api_key is required".to_string()))?;

    let client = ModelClient::new(
        state.llm.clone(),
        ModelConfig::new(api_key, state.config.gemini_model.clone()),
    );
    let summary = client
        .invoke::<SummarizeJobDescription>(&JobDescriptionInput {
            job_description: body.job_description,
        })
        .await?;

    Ok(Json(summary))
}

fn envelope_status(envelope: &ResultEnvelope) -> StatusCode {
    match envelope {
        ResultEnvelope::Success { .. } => StatusCode::OK,
        ResultEnvelope::Failure { code, .. } => match code {
            FailureCode::ValidationError => StatusCode::BAD_REQUEST,
            FailureCode::InvalidApiKey => StatusCode::UNAUTHORIZED,
            FailureCode::ProviderError | FailureCode::SchemaViolation => StatusCode::BAD_GATEWAY,
        },
    }
}
