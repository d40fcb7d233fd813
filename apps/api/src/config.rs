use anyhow::{Context, Result};

use crate::llm_client::{gemini::GEMINI_API_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Fails at startup if a value is present but malformed.
///
/// Holds no per-request state: the provider API key comes with each request,
/// `fallback_api_key` is only used when a request carries none.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub fallback_api_key: Option<String>,
    pub llm_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            gemini_api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| GEMINI_API_URL.to_string()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            fallback_api_key: optional_env("GEMINI_API_KEY"),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            max_body_bytes: parse_env("MAX_BODY_BYTES", 16 * 1024 * 1024)?,
        })
    }

    /// The key to use for a request: the caller's own, else the server fallback.
    pub fn resolve_api_key(&self, requested: Option<&str>) -> Option<String> {
        requested
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| self.fallback_api_key.clone())
    }
}

// Keys must never reach the logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .field("gemini_api_url", &self.gemini_api_url)
            .field("gemini_model", &self.gemini_model)
            .field(
                "fallback_api_key",
                &self.fallback_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            gemini_api_url: GEMINI_API_URL.to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            fallback_api_key: None,
            llm_timeout_secs: 5,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}
