use std::sync::Arc;

use crate::config::Config;
use crate::providers::ProviderRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; read-only afterwards.
    pub registry: Arc<ProviderRegistry>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let registry = ProviderRegistry::from_config(&config)?;
        Ok(Self {
            registry: Arc::new(registry),
            config,
        })
    }
}
