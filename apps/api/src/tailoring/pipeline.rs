//! Tailoring pipeline — orchestrates the three invocations for one request.
//!
//! Flow: validate → detect language → translate (German only) → tailor documents.
//!
//! Stages run strictly in sequence. The first failure aborts the request; nothing is
//! retried and no partial result is ever returned. Every failure is logged, then folded
//! into a `ResultEnvelope::Failure` with a single user-facing message.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::llm_client::schema::{Field, Schema};
use crate::llm_client::{ErrorKind, LlmError, LlmProvider, ModelClient, ModelConfig};
use crate::tailoring::documents::{TailorDocuments, TailorDocumentsInput, TailoringResult};
use crate::tailoring::language::{
    needs_translation, DetectLanguage, DetectLanguageInput, LanguageDetectionResult,
};
use crate::tailoring::payload::check_encoded_document;
use crate::tailoring::translation::{TranslateText, TranslateTextInput};

/// Target language for translated job descriptions.
pub const TRANSLATION_TARGET: &str = "English";

/// Fixed guidance shown when the provider rejects the API key.
pub const INVALID_API_KEY_MESSAGE: &str =
    "Your API key is not valid. Please check it and try again.";

const FAILURE_PREFIX: &str = "Failed to tailor documents.";

const TAILORING_REQUEST_SCHEMA: Schema = Schema::new(&[
    Field::required_string("resumeDocument", "The resume as a data URI."),
    Field::required_string("coverLetterDocument", "The cover letter as a data URI."),
    Field::required_string("jobDescription", "The job description text."),
    Field::required_string("credential", "The provider API key."),
]);

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One user request. Lives for exactly one pipeline run.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoringRequest {
    pub resume_document: String,
    pub cover_letter_document: String,
    pub job_description: String,
    pub credential: String,
}

impl fmt::Debug for TailoringRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TailoringRequest")
            .field("resume_document_len", &self.resume_document.len())
            .field("cover_letter_document_len", &self.cover_letter_document.len())
            .field("job_description_len", &self.job_description.len())
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Machine-readable failure category carried by the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    ValidationError,
    InvalidApiKey,
    ProviderError,
    SchemaViolation,
}

/// Uniform result handed back to the caller: a complete result or one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResultEnvelope {
    Success {
        data: TailoringResult,
    },
    Failure {
        code: FailureCode,
        error: String,
    },
}

impl ResultEnvelope {
    pub fn from_error(err: &LlmError) -> Self {
        let (code, error) = if err.is_invalid_api_key() {
            (FailureCode::InvalidApiKey, INVALID_API_KEY_MESSAGE.to_string())
        } else {
            let code = match err.kind() {
                ErrorKind::Validation => FailureCode::ValidationError,
                ErrorKind::Provider => FailureCode::ProviderError,
                ErrorKind::SchemaViolation => FailureCode::SchemaViolation,
            };
            (code, format!("{FAILURE_PREFIX} {err}"))
        };
        ResultEnvelope::Failure { code, error }
    }
}

/// Pipeline stage, for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Detect,
    Translate,
    Tailor,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Detect => "detect-language",
            Stage::Translate => "translate",
            Stage::Tailor => "tailor",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
struct StageError {
    stage: Stage,
    source: LlmError,
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, StageError>;
}

impl<T> AtStage<T> for Result<T, LlmError> {
    fn at(self, stage: Stage) -> Result<T, StageError> {
        self.map_err(|source| StageError { stage, source })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full pipeline and always returns an envelope.
///
/// `provider` is the shared transport; the model name and the request's credential
/// are bound into a fresh `ModelClient` for this call only.
pub async fn tailor(
    provider: Arc<dyn LlmProvider>,
    model: &str,
    request: TailoringRequest,
) -> ResultEnvelope {
    let request_id = Uuid::new_v4();
    let span = info_span!("tailor", %request_id);

    async move {
        match run(provider, model, request).await {
            Ok(result) => {
                info!("Tailoring succeeded");
                ResultEnvelope::Success { data: result }
            }
            Err(StageError { stage, source }) => {
                error!(%stage, kind = ?source.kind(), "Tailoring failed: {source}");
                ResultEnvelope::from_error(&source)
            }
        }
    }
    .instrument(span)
    .await
}

async fn run(
    provider: Arc<dyn LlmProvider>,
    model: &str,
    request: TailoringRequest,
) -> Result<TailoringResult, StageError> {
    validate_request(&request).at(Stage::Validate)?;

    let TailoringRequest {
        resume_document,
        cover_letter_document,
        job_description,
        credential,
    } = request;
    let client = ModelClient::new(provider, ModelConfig::new(credential, model));

    let detected = detect(&client, &job_description).await.at(Stage::Detect)?;
    let job_description = translate_if_needed(&client, &detected, job_description)
        .await
        .at(Stage::Translate)?;

    tailor_documents(
        &client,
        TailorDocumentsInput {
            resume_document,
            cover_letter_document,
            job_description,
        },
    )
    .await
    .at(Stage::Tailor)
}

/// Rejects malformed requests before any network call.
fn validate_request(request: &TailoringRequest) -> Result<(), LlmError> {
    let value = serde_json::to_value(request).map_err(|e| LlmError::Validation(e.to_string()))?;
    TAILORING_REQUEST_SCHEMA
        .validate(&value)
        .map_err(|e| LlmError::Validation(e.to_string()))?;

    check_encoded_document("Resume", &request.resume_document).map_err(LlmError::Validation)?;
    check_encoded_document("Cover letter", &request.cover_letter_document)
        .map_err(LlmError::Validation)?;

    Ok(())
}

/// Stage 1: detect the job description's language.
async fn detect(
    client: &ModelClient,
    job_description: &str,
) -> Result<LanguageDetectionResult, LlmError> {
    let detected = client
        .invoke::<DetectLanguage>(&DetectLanguageInput {
            text: job_description.to_string(),
        })
        .await?;
    info!("Detected job description language: {}", detected.language_code);
    Ok(detected)
}

/// Stage 2: replace a German job description with its full English translation.
/// Any other language is returned untouched.
async fn translate_if_needed(
    client: &ModelClient,
    detected: &LanguageDetectionResult,
    job_description: String,
) -> Result<String, LlmError> {
    if !needs_translation(&detected.language_code) {
        return Ok(job_description);
    }

    info!("Translating job description to {TRANSLATION_TARGET}");
    let translated = client
        .invoke::<TranslateText>(&TranslateTextInput {
            text: job_description,
            target_language: TRANSLATION_TARGET.to_string(),
        })
        .await?;
    Ok(translated.translated_text)
}

/// Stage 3: rewrite both documents against the (English) job description.
async fn tailor_documents(
    client: &ModelClient,
    input: TailorDocumentsInput,
) -> Result<TailoringResult, LlmError> {
    let result = client.invoke::<TailorDocuments>(&input).await?;
    info!(
        "Tailored documents: resume={} chars, cover_letter={} chars",
        result.tailored_resume.len(),
        result.tailored_cover_letter.len()
    );
    Ok(result)
}
