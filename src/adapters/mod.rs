pub mod chat_handler;
pub mod health_handler;
pub mod models_handler;

use std::sync::Arc;

use crate::agents::core::{ClientFactory, DefaultClientFactory};
use crate::agents::llm::ProviderRegistry;
use crate::agents::tools::tavily_factory;
use crate::config::{ModelSettings, OrchestrationSettings, Settings};

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub models: Arc<ModelSettings>,
    pub orchestration: OrchestrationSettings,
    pub factory: Arc<dyn ClientFactory>,
}

impl AppState {
    /// State over an explicit client factory
    pub fn new(settings: &Settings, factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            models: Arc::new(settings.models.clone()),
            orchestration: settings.orchestration.clone(),
            factory,
        }
    }

    /// State with clients built from the configured providers and search backend
    pub fn from_settings(settings: &Settings) -> Self {
        let mut factory = DefaultClientFactory::new(
            ProviderRegistry::with_defaults(),
            tavily_factory(settings.search.clone()),
        )
        .with_generation(settings.providers.temperature, settings.providers.max_tokens)
        .with_max_tool_iterations(settings.orchestration.max_tool_iterations);

        for (provider, url) in settings.providers.base_urls() {
            factory = factory.with_base_url(provider, url);
        }

        Self::new(settings, Arc::new(factory))
    }
}
