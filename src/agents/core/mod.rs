//! Chat client adapter
//!
//! A `ChatClient` is the single seam between orchestration code and the
//! hosted providers: one system prompt, an optional search tool and a
//! conversation go in; the transcript the model produced comes out.
//!
//! - `ToolCallingClient`: provider wrapped in a bounded tool-calling loop
//! - `DefaultClientFactory`: builds clients from the provider registry
//! - `respond`: the single-agent round trip

mod responder;
mod tool_calling;

pub use responder::{respond, respond_with, SINGLE_AGENT_SEARCH_RESULTS};
pub use tool_calling::ToolCallingClient;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::agents::config::{LlmProviderConfig, LlmProviderType};
use crate::agents::domain::Message;
use crate::agents::error::AgentResult;
use crate::agents::llm::ProviderRegistry;
use crate::agents::tools::SearchToolFactory;

/// Default cap on model/tool round trips per invocation
pub const DEFAULT_MAX_TOOL_ITERATIONS: u32 = 5;

/// Search tool attachment for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSpec {
    pub max_results: u32,
}

/// One call into a chat client
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub system_prompt: String,
    /// `None` attaches no tool at all
    pub search: Option<SearchSpec>,
    pub conversation: Vec<Message>,
}

impl Invocation {
    /// Invocation with a one-message user conversation and no tool
    pub fn new(system_prompt: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            search: None,
            conversation: vec![Message::user(input)],
        }
    }

    /// Attach the search tool capped at `max_results`, or detach it with `None`
    pub fn with_search(mut self, max_results: Option<u32>) -> Self {
        self.search = max_results.map(|max_results| SearchSpec { max_results });
        self
    }
}

/// Chat-completion interface bound to one provider and model
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Run an invocation and return the transcript it produced, excluding
    /// the system prompt and the input conversation
    async fn invoke(&self, invocation: &Invocation) -> AgentResult<Vec<Message>>;
}

/// Builds chat clients for a provider and model
pub trait ClientFactory: Send + Sync {
    fn build_client(
        &self,
        provider: LlmProviderType,
        model_id: &str,
    ) -> AgentResult<Arc<dyn ChatClient>>;
}

/// Factory backed by the provider registry and a web search backend
#[derive(Clone)]
pub struct DefaultClientFactory {
    registry: ProviderRegistry,
    search: SearchToolFactory,
    base_urls: HashMap<LlmProviderType, String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    max_tool_iterations: u32,
}

impl DefaultClientFactory {
    pub fn new(registry: ProviderRegistry, search: SearchToolFactory) -> Self {
        Self {
            registry,
            search,
            base_urls: HashMap::new(),
            temperature: None,
            max_tokens: None,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }

    /// Point a provider at a non-default endpoint
    pub fn with_base_url(mut self, provider: LlmProviderType, url: impl Into<String>) -> Self {
        self.base_urls.insert(provider, url.into());
        self
    }

    pub fn with_generation(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_tool_iterations(mut self, max: u32) -> Self {
        self.max_tool_iterations = max;
        self
    }

    fn provider_config(&self, provider: LlmProviderType, model_id: &str) -> LlmProviderConfig {
        LlmProviderConfig {
            base_url: self.base_urls.get(&provider).cloned(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            ..LlmProviderConfig::new(provider, model_id)
        }
    }
}

impl ClientFactory for DefaultClientFactory {
    fn build_client(
        &self,
        provider: LlmProviderType,
        model_id: &str,
    ) -> AgentResult<Arc<dyn ChatClient>> {
        let config = self.provider_config(provider, model_id);
        let llm = self.registry.create(&config)?;

        tracing::debug!(provider = %provider, model = %model_id, "Built chat client");

        Ok(Arc::new(ToolCallingClient::new(
            llm,
            self.search.clone(),
            self.max_tool_iterations,
        )))
    }
}
