//! Provider Registry: immutable map from provider id to backend, built once at startup.

use anyhow::Result;
use tracing::warn;

use super::{
    OllamaProvider, OpenAiProvider, Provider, ProviderDescriptor, ProviderKind, TemplateProvider,
};
use crate::config::Config;

/// Used when the configured default names no registered provider.
const FALLBACK_PROVIDER: ProviderKind = ProviderKind::OpenAi;

/// Holds one instance of every backend. Shared read-only across requests.
pub struct ProviderRegistry {
    /// Indexed by `ProviderKind::index`, so every kind always resolves.
    providers: [Provider; 3],
    default_kind: ProviderKind,
}

impl ProviderRegistry {
    /// Builds every backend from explicit configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let providers = [
            Provider::OpenAi(OpenAiProvider::new(config.openai.clone())?),
            Provider::Ollama(OllamaProvider::new(config.ollama.clone())?),
            Provider::Template(TemplateProvider),
        ];

        let default_kind = ProviderKind::from_id(config.ai_provider.trim()).unwrap_or_else(|| {
            warn!(
                "Configured default provider \"{}\" not found. Falling back to \"{}\".",
                config.ai_provider,
                FALLBACK_PROVIDER.id()
            );
            FALLBACK_PROVIDER
        });

        Ok(Self {
            providers,
            default_kind,
        })
    }

    /// Resolves a provider id. Never fails: a missing or blank id selects the
    /// default, and an unknown id falls back to the default with a warning.
    pub fn resolve(&self, id: Option<&str>) -> &Provider {
        let requested = id.map(str::trim).filter(|id| !id.is_empty());

        let kind = match requested {
            None => self.default_kind,
            Some(id) => ProviderKind::from_id(id).unwrap_or_else(|| {
                warn!(
                    "Provider \"{}\" not found. Falling back to \"{}\".",
                    id,
                    self.default_kind.id()
                );
                self.default_kind
            }),
        };

        self.get(kind)
    }

    pub fn get(&self, kind: ProviderKind) -> &Provider {
        &self.providers[kind.index()]
    }

    /// Every registered provider, in registration order.
    pub fn list(&self) -> Vec<ProviderDescriptor> {
        self.providers.iter().map(Provider::descriptor).collect()
    }

    /// The id requests without an explicit provider resolve to.
    pub fn default_id(&self) -> &'static str {
        self.default_kind.id()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::providers::GenerationBackend;

    fn registry_with_default(default: &str) -> ProviderRegistry {
        let config = Config {
            ai_provider: default.to_string(),
            ..Config::default()
        };
        ProviderRegistry::from_config(&config).unwrap()
    }

    #[test]
    fn test_registered_ids_are_unique_and_ordered() {
        let registry = registry_with_default("openai");
        let ids: Vec<_> = registry.list().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["openai", "ollama", "template"]);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
    }

    #[test]
    fn test_every_kind_resolves_to_itself() {
        let registry = registry_with_default("openai");
        for kind in ProviderKind::ALL {
            assert_eq!(registry.resolve(Some(kind.id())).kind(), kind);
            assert_eq!(registry.get(kind).kind(), kind);
        }
    }

    #[test]
    fn test_unknown_id_resolves_like_no_id() {
        for default in ["openai", "ollama", "template"] {
            let registry = registry_with_default(default);
            let unknown = registry.resolve(Some("nonexistent-provider"));
            let implicit = registry.resolve(None);
            assert_eq!(unknown.kind(), implicit.kind());
            assert_eq!(unknown.descriptor(), implicit.descriptor());
            assert_eq!(implicit.kind().id(), default);
        }
    }

    #[test]
    fn test_blank_id_uses_default() {
        let registry = registry_with_default("template");
        assert_eq!(registry.resolve(Some("   ")).kind(), ProviderKind::Template);
    }

    #[test]
    fn test_unknown_configured_default_uses_hard_coded_fallback() {
        let registry = registry_with_default("gemini");
        assert_eq!(registry.default_id(), "openai");
        assert_eq!(registry.resolve(None).kind(), ProviderKind::OpenAi);
    }

    #[test]
    fn test_list_reports_credentials_without_secrets() {
        let mut config = Config::default();
        config.openai.api_key = Some("sk-secret-value".to_string());
        let registry = ProviderRegistry::from_config(&config).unwrap();

        let listed = registry.list();
        assert!(listed.iter().all(|d| d.configured));
        let json = serde_json::to_string(&listed).unwrap();
        assert!(!json.contains("sk-secret-value"));

        let without_key = registry_with_default("openai");
        assert!(!without_key.list()[0].configured);
        assert_eq!(without_key.list()[0].requires, vec!["OPENAI_API_KEY"]);
    }

    #[test]
    fn test_display_names() {
        let registry = registry_with_default("openai");
        assert_eq!(registry.get(ProviderKind::OpenAi).display_name(), "OpenAI");
        assert_eq!(
            registry.get(ProviderKind::Ollama).display_name(),
            "Ollama (Local AI)"
        );
        assert_eq!(
            registry.get(ProviderKind::Template).display_name(),
            "Template Generator"
        );
    }
}
