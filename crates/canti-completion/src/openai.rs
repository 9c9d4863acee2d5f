//! OpenAI chat-completions client.

use crate::{Completion, CompletionError, CompletionProvider, CompletionRequest};
use async_trait::async_trait;
use canti_core::{CantiError, UpstreamConfig};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::time::{Duration, Instant};

pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, base_url: impl Into<String>) -> canti_core::Result<Self> {
        Self::build(api_key, base_url.into(), None)
    }

    pub fn from_config(cfg: &UpstreamConfig) -> canti_core::Result<Self> {
        Self::build(
            &cfg.api_key,
            cfg.base_url.clone(),
            cfg.request_timeout_secs.map(Duration::from_secs),
        )
    }

    fn build(api_key: &str, base_url: String, timeout: Option<Duration>) -> canti_core::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| CantiError::Config("API key contains invalid header characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CantiError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, CompletionError> {
        let start = Instant::now();
        let response = self.client.post(self.endpoint()).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status: status.as_u16(), body });
        }

        let bytes = response.bytes().await?;
        let parsed: OpenAiResponse = serde_json::from_slice(&bytes)
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            model = %request.model,
            latency_ms = start.elapsed().as_millis() as u64,
            choices = parsed.choices.len(),
            "completion received"
        );

        parsed.into_completion(request.model)
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiResponse {
    fn into_completion(self, requested_model: String) -> Result<Completion, CompletionError> {
        let choice = self.choices.into_iter().next().ok_or(CompletionError::NoChoices)?;
        let content = choice
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| CompletionError::MalformedResponse("first choice has no message content".into()))?;
        Ok(Completion {
            model: self.model.unwrap_or(requested_model),
            content,
            finish_reason: choice.finish_reason,
        })
    }
}
