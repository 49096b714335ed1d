//! Groq LLM Provider

use async_trait::async_trait;

use super::{openai::OpenAiProvider, CompletionRequest, CompletionResponse, LlmProvider};
use crate::agents::config::LlmProviderConfig;
use crate::agents::error::LlmResult;

/// Groq LLM Provider
/// Uses the OpenAI chat-completions format against Groq's endpoint
pub struct GroqProvider {
    inner: OpenAiProvider,
}

impl GroqProvider {
    /// Create a new Groq provider from configuration
    pub fn new(config: &LlmProviderConfig) -> LlmResult<Self> {
        Ok(Self {
            inner: OpenAiProvider::compatible(config, "groq")?,
        })
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    /// Groq's compound models run their own built-in tools and reject
    /// client-supplied ones
    fn supports_tools(&self) -> bool {
        !self.inner.model().starts_with("groq/compound")
    }

    async fn complete(&self, request: CompletionRequest) -> LlmResult<CompletionResponse> {
        self.inner.complete(request).await
    }
}
