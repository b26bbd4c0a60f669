//! Local-model backend talking to an Ollama daemon.
//!
//! Install Ollama from https://ollama.ai and pull a model (`ollama pull llama2`).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{
    GenerationBackend, GenerationError, ProviderKind, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use crate::config::OllamaConfig;
use crate::models::profile::GenerationOptions;

/// Local generation is slow; two minutes before the request is abandoned.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaSampling,
}

#[derive(Debug, Serialize)]
struct OllamaSampling {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: Option<String>,
}

pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build Ollama HTTP client")?;
        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn unreachable(&self, model: &str) -> GenerationError {
        GenerationError::ProviderUnreachable {
            provider: "Ollama".to_string(),
            endpoint: self.base_url().to_string(),
            remediation: format!(
                "Ollama is not running. Please:\n\
                 1. Install Ollama from https://ollama.ai\n\
                 2. Run: ollama pull {model}\n\
                 3. Make sure Ollama service is running on port 11434"
            ),
        }
    }

    fn failed(message: impl Into<String>) -> GenerationError {
        GenerationError::GenerationFailed {
            provider: "Ollama".to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl GenerationBackend for OllamaProvider {
    fn display_name(&self) -> &str {
        ProviderKind::Ollama.display_name()
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let model = options.model.as_deref().unwrap_or(&self.config.model);

        let request_body = OllamaRequest {
            model,
            prompt,
            stream: false,
            options: OllamaSampling {
                temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                num_predict: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url()))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("Ollama request error: {e}");
                if e.is_connect() {
                    self.unreachable(model)
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
        if status == StatusCode::NOT_FOUND {
            return Err(GenerationError::ModelNotFound {
                model: model.to_string(),
                remediation: format!("Please run: ollama pull {model}"),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::failed(format!(
                "API error (status {}): {}",
                status.as_u16(),
                body
            )));
        }

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| Self::failed(format!("malformed response body: {e}")))?;

        debug!("Ollama call succeeded (model: {model})");

        Ok(body.response.unwrap_or_default())
    }
}
