use anyhow::{Context, Result};

/// Settings for the hosted chat-completion backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Absent when `OPENAI_API_KEY` is unset; the backend reports it at call time.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

/// Settings for the local Ollama backend.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

/// Application configuration loaded from environment variables.
/// Every variable has a default, so only a malformed `PORT` fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider used when a request names none (`AI_PROVIDER`).
    pub ai_provider: String,
    /// Template used when a request names none (`DEFAULT_TEMPLATE`).
    pub default_template: String,
    pub openai: OpenAiConfig,
    pub ollama: OllamaConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ai_provider: "openai".to_string(),
            default_template: "classic".to_string(),
            openai: OpenAiConfig {
                api_key: None,
                model: "gpt-3.5-turbo".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
            },
            ollama: OllamaConfig {
                base_url: "http://localhost:11434".to_string(),
                model: "llama2".to_string(),
            },
            port: 5000,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            ai_provider: env_or("AI_PROVIDER", defaults.ai_provider),
            default_template: env_or("DEFAULT_TEMPLATE", defaults.default_template),
            openai: OpenAiConfig {
                api_key: optional_env("OPENAI_API_KEY"),
                model: env_or("OPENAI_MODEL", defaults.openai.model),
                base_url: env_or("OPENAI_BASE_URL", defaults.openai.base_url),
            },
            ollama: OllamaConfig {
                base_url: env_or("OLLAMA_BASE_URL", defaults.ollama.base_url),
                model: env_or("OLLAMA_MODEL", defaults.ollama.model),
            },
            port: match optional_env("PORT") {
                Some(port) => port
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: env_or("RUST_LOG", defaults.rust_log),
        })
    }
}

/// Reads `key`, treating an empty or whitespace-only value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: String) -> String {
    optional_env(key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_services() {
        let config = Config::default();
        assert_eq!(config.ai_provider, "openai");
        assert_eq!(config.default_template, "classic");
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.ollama.model, "llama2");
        assert_eq!(config.openai.model, "gpt-3.5-turbo");
        assert!(config.openai.api_key.is_none());
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_env_or_falls_back_for_unset_key() {
        let value = env_or(
            "CVTAILOR_TEST_SURELY_UNSET_VARIABLE",
            "fallback".to_string(),
        );
        assert_eq!(value, "fallback");
    }
}
