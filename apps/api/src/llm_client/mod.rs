//! LLM Client — the single point of entry for all model calls in the tailoring service.
//!
//! ARCHITECTURAL RULE: No other module may talk to the provider API directly.
//! All LLM interactions MUST go through `ModelClient::invoke`.
//!
//! There is no process-wide client configuration: every request builds its own
//! `ModelClient` from the caller's credential, so concurrent requests never share keys.
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod gemini;
pub mod prompts;
pub mod schema;

use self::schema::Schema;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum LlmError {
    /// Caller-supplied input violates the invocation's input schema. No call was made.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered, but the answer does not fit the declared output schema.
    #[error("Model response did not match the expected schema: {0}")]
    SchemaViolation(String),
}

/// Coarse error taxonomy used by the orchestrator and the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Provider,
    SchemaViolation,
}

impl LlmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::Validation(_) => ErrorKind::Validation,
            LlmError::Http(_) | LlmError::Api { .. } => ErrorKind::Provider,
            LlmError::SchemaViolation(_) => ErrorKind::SchemaViolation,
        }
    }

    /// True when the provider rejected the credential itself.
    pub fn is_invalid_api_key(&self) -> bool {
        if self.kind() != ErrorKind::Provider {
            return false;
        }
        let message = self.to_string().to_lowercase();
        ["api key not valid", "invalid api key", "api_key_invalid"]
            .iter()
            .any(|needle| message.contains(needle))
    }
}

/// Per-request provider configuration: which model, with whose key.
#[derive(Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

// Keys must never reach the logs.
impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Everything a provider needs for one outbound call.
#[derive(Debug)]
pub struct ProviderRequest<'a> {
    /// Invocation name, for logging only.
    pub invocation: &'a str,
    pub config: &'a ModelConfig,
    pub system: &'a str,
    pub prompt: &'a str,
    /// Output schema in the provider's structured-output dialect.
    pub response_schema: Value,
}

/// A remote LLM backend. One call to `complete` is exactly one network round trip:
/// no retries, no caching.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the raw text the model produced.
    async fn complete(&self, request: &ProviderRequest<'_>) -> Result<String, LlmError>;
}

/// A request/response contract layered on the model: input schema, output schema and
/// an instruction template interpolated with the input fields.
pub trait StructuredPrompt {
    const NAME: &'static str;
    const SYSTEM: &'static str = prompts::JSON_ONLY_SYSTEM;
    const INPUT_SCHEMA: Schema;
    const OUTPUT_SCHEMA: Schema;

    type Input: Serialize + Sync;
    type Output: DeserializeOwned;

    fn render(input: &Self::Input) -> String;
}

/// A provider handle bound to one request's configuration.
#[derive(Clone)]
pub struct ModelClient {
    provider: Arc<dyn LlmProvider>,
    config: ModelConfig,
}

impl ModelClient {
    pub fn new(provider: Arc<dyn LlmProvider>, config: ModelConfig) -> Self {
        Self { provider, config }
    }

    /// Runs one structured invocation.
    ///
    /// Input is checked before the network call (→ `Validation`); the response is
    /// parsed and checked against the output schema as a whole (→ `SchemaViolation`).
    pub async fn invoke<P: StructuredPrompt>(
        &self,
        input: &P::Input,
    ) -> Result<P::Output, LlmError> {
        let input_value = serde_json::to_value(input)
            .map_err(|e| LlmError::Validation(format!("{}: {e}", P::NAME)))?;
        P::INPUT_SCHEMA
            .validate(&input_value)
            .map_err(|e| LlmError::Validation(e.to_string()))?;

        let prompt = P::render(input);
        let request = ProviderRequest {
            invocation: P::NAME,
            config: &self.config,
            system: P::SYSTEM,
            prompt: &prompt,
            response_schema: P::OUTPUT_SCHEMA.to_response_schema(),
        };

        debug!(
            "Invoking {} on {} ({} prompt chars)",
            P::NAME,
            self.config.model,
            prompt.len()
        );
        let text = self.provider.complete(&request).await?;

        parse_output::<P>(&text)
    }
}

fn parse_output<P: StructuredPrompt>(text: &str) -> Result<P::Output, LlmError> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(LlmError::SchemaViolation("model returned empty content".to_string()));
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| LlmError::SchemaViolation(format!("response is not valid JSON: {e}")))?;
    P::OUTPUT_SCHEMA
        .validate(&value)
        .map_err(|e| LlmError::SchemaViolation(e.to_string()))?;

    serde_json::from_value(value).map_err(|e| LlmError::SchemaViolation(e.to_string()))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::schema::Field;
    use super::*;
    use crate::test_helpers::ScriptedProvider;

    struct Echo;

    #[derive(Serialize)]
    struct EchoInput {
        text: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct EchoOutput {
        echoed_text: String,
    }

    impl StructuredPrompt for Echo {
        const NAME: &'static str = "echo";
        const INPUT_SCHEMA: Schema = Schema::new(&[Field::required_string("text", "Input.")]);
        const OUTPUT_SCHEMA: Schema =
            Schema::new(&[Field::required_string("echoedText", "Output.")]);

        type Input = EchoInput;
        type Output = EchoOutput;

        fn render(input: &EchoInput) -> String {
            prompts::render("Echo: {text}", &[("text", &input.text)])
        }
    }

    fn client(provider: &Arc<ScriptedProvider>) -> ModelClient {
        ModelClient::new(provider.clone(), ModelConfig::new("test-key", DEFAULT_MODEL))
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_model_config_debug_redacts_key() {
        let config = ModelConfig::new("secret-key-123", DEFAULT_MODEL);
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key-123"));
        assert!(debug.contains(DEFAULT_MODEL));
    }

    #[test]
    fn test_invalid_api_key_detection() {
        let err = LlmError::Api {
            status: 400,
            message: "API key not valid. Please pass a valid API key.".to_string(),
        };
        assert!(err.is_invalid_api_key());

        let err = LlmError::Api {
            status: 429,
            message: "Resource has been exhausted".to_string(),
        };
        assert!(!err.is_invalid_api_key());

        // Schema problems never count as credential problems, whatever the text says.
        let err = LlmError::SchemaViolation("invalid api key".to_string());
        assert!(!err.is_invalid_api_key());
    }

    #[tokio::test]
    async fn test_invoke_renders_prompt_and_parses_output() {
        let provider = ScriptedProvider::new().respond("echo", r#"{"echoedText": "hi"}"#);
        let output = client(&provider)
            .invoke::<Echo>(&EchoInput { text: "hi".into() })
            .await
            .unwrap();

        assert_eq!(output.echoed_text, "hi");
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "Echo: hi");
        assert_eq!(calls[0].api_key, "test-key");
        assert_eq!(calls[0].response_schema["required"][0], "echoedText");
    }

    #[tokio::test]
    async fn test_invoke_accepts_fenced_json() {
        let provider =
            ScriptedProvider::new().respond("echo", "```json\n{\"echoedText\": \"hi\"}\n```");
        let output = client(&provider)
            .invoke::<Echo>(&EchoInput { text: "hi".into() })
            .await
            .unwrap();
        assert_eq!(output.echoed_text, "hi");
    }

    #[tokio::test]
    async fn test_invoke_rejects_invalid_input_without_calling_provider() {
        let provider = ScriptedProvider::new().respond("echo", r#"{"echoedText": "hi"}"#);
        let err = client(&provider)
            .invoke::<Echo>(&EchoInput { text: "  ".into() })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invoke_missing_output_field_is_schema_violation() {
        let provider = ScriptedProvider::new().respond("echo", r#"{"other": "hi"}"#);
        let err = client(&provider)
            .invoke::<Echo>(&EchoInput { text: "hi".into() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("echoedText"));
    }

    #[tokio::test]
    async fn test_invoke_non_json_output_is_schema_violation() {
        let provider = ScriptedProvider::new().respond("echo", "Sure! Here you go: hi");
        let err = client(&provider)
            .invoke::<Echo>(&EchoInput { text: "hi".into() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
    }

    #[tokio::test]
    async fn test_invoke_propagates_provider_error() {
        let provider = ScriptedProvider::new().fail("echo", 503, "The model is overloaded.");
        let err = client(&provider)
            .invoke::<Echo>(&EchoInput { text: "hi".into() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert!(err.to_string().contains("overloaded"));
    }
}
