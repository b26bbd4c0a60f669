//! Generation backends: the only code in the service that talks to a model.
//!
//! Each backend implements `GenerationBackend`. The set of backends is closed:
//! `Provider` is the tagged union the registry hands out, and every variant is
//! dispatched exhaustively. The generation pipeline is written against the
//! trait, so tests can drive it with their own implementations.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::profile::GenerationOptions;

pub mod ollama;
pub mod openai;
pub mod registry;
pub mod template;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use registry::ProviderRegistry;
pub use template::TemplateProvider;

/// Output length used when the request does not override it.
pub const DEFAULT_MAX_TOKENS: u32 = 3000;
/// Sampling temperature used when the request does not override it.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{provider} is not reachable at {endpoint}. {remediation}")]
    ProviderUnreachable {
        provider: String,
        endpoint: String,
        remediation: String,
    },

    #[error("Model \"{model}\" not found. {remediation}")]
    ModelNotFound { model: String, remediation: String },

    #[error("{provider} generation failed: {credential} is not configured")]
    ProviderCredentialMissing {
        provider: String,
        credential: String,
    },

    #[error("{provider} generation failed: {message}")]
    GenerationFailed { provider: String, message: String },
}

/// A backend able to turn prompt text into a raw response.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Human-readable name returned to clients alongside the result.
    fn display_name(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;
}

/// Identifier of a registered backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Ollama,
    Template,
}

impl ProviderKind {
    /// Registration order; also the order `list()` reports.
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::OpenAi,
        ProviderKind::Ollama,
        ProviderKind::Template,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Template => "template",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Ollama => "Ollama (Local AI)",
            ProviderKind::Template => "Template Generator",
        }
    }

    /// What an operator must provide for this backend to work. Informational only.
    pub fn requires(self) -> &'static [&'static str] {
        match self {
            ProviderKind::OpenAi => &["OPENAI_API_KEY"],
            ProviderKind::Ollama => &["Ollama installed locally"],
            ProviderKind::Template => &[],
        }
    }

    fn index(self) -> usize {
        match self {
            ProviderKind::OpenAi => 0,
            ProviderKind::Ollama => 1,
            ProviderKind::Template => 2,
        }
    }
}

/// Discovery view of a provider. Never carries secrets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub requires: Vec<&'static str>,
    /// Whether the credentials this provider needs are present.
    pub configured: bool,
}

/// The closed set of generation backends.
pub enum Provider {
    OpenAi(OpenAiProvider),
    Ollama(OllamaProvider),
    Template(TemplateProvider),
}

impl Provider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::OpenAi(_) => ProviderKind::OpenAi,
            Provider::Ollama(_) => ProviderKind::Ollama,
            Provider::Template(_) => ProviderKind::Template,
        }
    }

    pub fn descriptor(&self) -> ProviderDescriptor {
        let kind = self.kind();
        let configured = match self {
            Provider::OpenAi(p) => p.has_credentials(),
            Provider::Ollama(_) | Provider::Template(_) => true,
        };
        ProviderDescriptor {
            id: kind.id(),
            name: kind.display_name(),
            requires: kind.requires().to_vec(),
            configured,
        }
    }
}

#[async_trait]
impl GenerationBackend for Provider {
    fn display_name(&self) -> &str {
        self.kind().display_name()
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        match self {
            Provider::OpenAi(p) => p.generate(prompt, options).await,
            Provider::Ollama(p) => p.generate(prompt, options).await,
            Provider::Template(p) => p.generate(prompt, options).await,
        }
    }
}
