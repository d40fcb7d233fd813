//! Test-only provider that answers from a script and records every call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::llm_client::{LlmError, LlmProvider, ProviderRequest};

#[derive(Debug, Clone)]
pub enum Scripted {
    Text(String),
    Api { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub invocation: String,
    pub api_key: String,
    pub model: String,
    pub prompt: String,
    pub response_schema: Value,
}

#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answers every call to `invocation` with `text`.
    pub fn respond(self: Arc<Self>, invocation: &str, text: &str) -> Arc<Self> {
        self.script
            .lock()
            .unwrap()
            .insert(invocation.to_string(), Scripted::Text(text.to_string()));
        self
    }

    /// Fails every call to `invocation` with a provider API error.
    pub fn fail(self: Arc<Self>, invocation: &str, status: u16, message: &str) -> Arc<Self> {
        self.script.lock().unwrap().insert(
            invocation.to_string(),
            Scripted::Api {
                status,
                message: message.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn invocations(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.invocation).collect()
    }

    pub fn call_to(&self, invocation: &str) -> Option<RecordedCall> {
        self.calls().into_iter().find(|c| c.invocation == invocation)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(&self, request: &ProviderRequest<'_>) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            invocation: request.invocation.to_string(),
            api_key: request.config.api_key.clone(),
            model: request.config.model.clone(),
            prompt: request.prompt.to_string(),
            response_schema: request.response_schema.clone(),
        });

        let scripted = self.script.lock().unwrap().get(request.invocation).cloned();
        match scripted {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Api { status, message }) => Err(LlmError::Api { status, message }),
            None => Err(LlmError::Api {
                status: 500,
                message: format!("no scripted response for {}", request.invocation),
            }),
        }
    }
}
