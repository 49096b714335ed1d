//! Configuration types for LLM providers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::AgentError;

/// LLM provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmProviderConfig {
    /// Provider type
    pub provider: LlmProviderType,
    /// Model name/identifier
    pub model: String,
    /// Environment variable containing the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Custom base URL (for proxied endpoints or test servers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Default temperature for completions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Default max tokens for completions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl LlmProviderConfig {
    /// Configuration with provider defaults for the given model
    pub fn new(provider: LlmProviderType, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key_env: None,
            base_url: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Environment variable the API key is read from
    pub fn key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.default_key_env())
    }

    /// Base URL, falling back to the provider's public endpoint
    pub fn endpoint(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.provider.default_base_url().to_string())
    }
}

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Groq (OpenAI-compatible API)
    Groq,
    /// OpenAI
    #[serde(rename = "openai")]
    OpenAI,
    /// Google Gemini
    #[serde(alias = "google")]
    Gemini,
}

impl LlmProviderType {
    /// All provider types, in registry order
    pub const ALL: [LlmProviderType; 3] = [
        LlmProviderType::Groq,
        LlmProviderType::OpenAI,
        LlmProviderType::Gemini,
    ];

    pub fn default_key_env(&self) -> &'static str {
        match self {
            LlmProviderType::Groq => "GROQ_API_KEY",
            LlmProviderType::OpenAI => "OPENAI_API_KEY",
            LlmProviderType::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProviderType::Groq => "https://api.groq.com/openai/v1",
            LlmProviderType::OpenAI => "https://api.openai.com/v1",
            LlmProviderType::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }
}

impl std::fmt::Display for LlmProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderType::Groq => write!(f, "groq"),
            LlmProviderType::OpenAI => write!(f, "openai"),
            LlmProviderType::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for LlmProviderType {
    type Err = AgentError;

    /// Parse a provider tag as sent by clients ("Groq", "OpenAI", "Gemini")
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(LlmProviderType::Groq),
            "openai" => Ok(LlmProviderType::OpenAI),
            "gemini" | "google" => Ok(LlmProviderType::Gemini),
            _ => Err(AgentError::Configuration(format!(
                "Unsupported model provider: {}",
                tag
            ))),
        }
    }
}
