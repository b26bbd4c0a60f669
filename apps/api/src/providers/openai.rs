//! Hosted chat-completion backend (OpenAI-compatible `/chat/completions`).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{
    GenerationBackend, GenerationError, ProviderKind, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use crate::config::OpenAiConfig;
use crate::models::profile::GenerationOptions;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const CREDENTIAL: &str = "OPENAI_API_KEY";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Error code the API returns for an unknown or inaccessible model.
const MODEL_NOT_FOUND_CODE: &str = "model_not_found";

/// Client for the hosted backend, built from explicit configuration.
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build OpenAI HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn has_credentials(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn chat_request<'a>(
        &'a self,
        prompt: &'a str,
        options: &'a GenerationOptions,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: options.model.as_deref().unwrap_or(&self.config.model),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        }
    }

    fn unreachable(&self) -> GenerationError {
        GenerationError::ProviderUnreachable {
            provider: ProviderKind::OpenAi.display_name().to_string(),
            endpoint: self.config.base_url.trim_end_matches('/').to_string(),
            remediation: "Check OPENAI_BASE_URL and your network connection.".to_string(),
        }
    }

    /// Maps a non-success reply to the matching error.
    fn api_error(status: StatusCode, body: String, model: &str) -> GenerationError {
        let parsed = serde_json::from_str::<ApiError>(&body).ok();
        let code = parsed.as_ref().and_then(|e| e.error.code.as_deref());

        if code == Some(MODEL_NOT_FOUND_CODE) {
            return GenerationError::ModelNotFound {
                model: model.to_string(),
                remediation: "Check OPENAI_MODEL or the model override in the request."
                    .to_string(),
            };
        }

        let message = parsed.map(|e| e.error.message).unwrap_or(body);
        Self::failed(format!(
            "API error (status {}): {}",
            status.as_u16(),
            message
        ))
    }

    fn failed(message: impl Into<String>) -> GenerationError {
        GenerationError::GenerationFailed {
            provider: ProviderKind::OpenAi.display_name().to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiProvider {
    fn display_name(&self) -> &str {
        ProviderKind::OpenAi.display_name()
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            GenerationError::ProviderCredentialMissing {
                provider: ProviderKind::OpenAi.display_name().to_string(),
                credential: CREDENTIAL.to_string(),
            }
        })?;

        let request_body = self.chat_request(prompt, options);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("OpenAI request error: {e}");
                if e.is_connect() {
                    self.unreachable()
                } else if e.is_timeout() {
                    Self::failed(format!(
                        "request timed out after {}s",
                        REQUEST_TIMEOUT.as_secs()
                    ))
                } else {
                    Self::failed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::api_error(status, body, request_body.model));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Self::failed(format!("malformed response body: {e}")))?;

        debug!(
            "OpenAI call succeeded with {} choice(s)",
            chat.choices.len()
        );

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Self::failed("response contained no message content"))
    }
}
