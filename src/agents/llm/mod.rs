//! LLM provider implementations
//!
//! A unified, non-streaming chat-completion interface over the hosted
//! providers a request may name:
//! - Groq (OpenAI-compatible endpoint)
//! - OpenAI
//! - Google Gemini

mod gemini;
mod groq;
mod openai;

pub use gemini::GeminiProvider;
pub use groq::GroqProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::agents::config::{LlmProviderConfig, LlmProviderType};
use crate::agents::domain::{Message, ToolDefinition};
use crate::agents::error::{LlmError, LlmResult};

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;

    /// Check if tool/function calling is supported
    fn supports_tools(&self) -> bool {
        true
    }

    /// Complete a request
    async fn complete(&self, request: CompletionRequest) -> LlmResult<CompletionResponse>;
}

/// Request for LLM completion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Messages in the conversation, system prompt first
    pub messages: Vec<Message>,
    /// Model to use (overrides provider default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Tools available for calling. `None` or empty sends no tools field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

impl CompletionRequest {
    /// Tools to send, if any
    pub fn tool_list(&self) -> Option<&[ToolDefinition]> {
        self.tools.as_deref().filter(|tools| !tools.is_empty())
    }
}

/// Response from LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated message
    pub message: Message,
    /// Reason the completion stopped
    pub finish_reason: FinishReason,
    /// Token usage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Reason completion stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop
    Stop,
    /// Hit max tokens
    Length,
    /// Tool call requested
    ToolCalls,
    /// Content filtered
    ContentFilter,
}

/// Token usage information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Read a provider's API key from its environment variable
fn api_key_from_env(config: &LlmProviderConfig) -> LlmResult<SecretString> {
    let env_var = config.key_env();
    std::env::var(env_var)
        .map(SecretString::from)
        .map_err(|_| LlmError::Authentication(format!("Environment variable {} not set", env_var)))
}

/// Constructor for a provider
pub type ProviderConstructor = fn(&LlmProviderConfig) -> LlmResult<Arc<dyn LlmProvider>>;

/// Maps provider types to their constructors
#[derive(Clone)]
pub struct ProviderRegistry {
    constructors: HashMap<LlmProviderType, ProviderConstructor>,
}

impl ProviderRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registry with every built-in provider
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LlmProviderType::Groq, |config| {
            Ok(Arc::new(GroqProvider::new(config)?))
        });
        registry.register(LlmProviderType::OpenAI, |config| {
            Ok(Arc::new(OpenAiProvider::new(config)?))
        });
        registry.register(LlmProviderType::Gemini, |config| {
            Ok(Arc::new(GeminiProvider::new(config)?))
        });
        registry
    }

    pub fn register(&mut self, provider: LlmProviderType, constructor: ProviderConstructor) {
        self.constructors.insert(provider, constructor);
    }

    pub fn is_registered(&self, provider: LlmProviderType) -> bool {
        self.constructors.contains_key(&provider)
    }

    /// Create an LLM provider from configuration
    pub fn create(&self, config: &LlmProviderConfig) -> LlmResult<Arc<dyn LlmProvider>> {
        let constructor = self
            .constructors
            .get(&config.provider)
            .ok_or_else(|| LlmError::ProviderNotFound(config.provider.to_string()))?;
        constructor(config)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
