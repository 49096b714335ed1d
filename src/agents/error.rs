//! Error types for the agent system

use thiserror::Error;

/// Errors that can occur while answering a query
#[derive(Debug, Error)]
pub enum AgentError {
    /// Configuration error (unknown provider tag, missing credential)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Web search tool error
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// A stage did not finish within its deadline
    #[error("Operation timed out after {0}s")]
    Timeout(u64),

    /// Request validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Prompt composition or other execution error
    #[error("Execution error: {0}")]
    Execution(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors specific to LLM provider operations
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider not registered
    #[error("LLM provider not found: {0}")]
    ProviderNotFound(String),

    /// API error
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,
}

/// Errors raised by the web search tool
#[derive(Debug, Error)]
pub enum SearchError {
    /// Missing API key
    #[error("Search authentication error: {0}")]
    Authentication(String),

    /// Non-success response from the search API
    #[error("Search API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Transport failure
    #[error("Search network error: {0}")]
    Network(String),

    /// Tool called with bad arguments
    #[error("Invalid search arguments: {0}")]
    InvalidArguments(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_connect() {
            LlmError::Network(format!("Connection error: {}", err))
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::Serialization(err.to_string())
    }
}

impl From<tera::Error> for AgentError {
    fn from(err: tera::Error) -> Self {
        AgentError::Execution(format!("Failed to compose stage input: {}", err))
    }
}

impl AgentError {
    /// Whether the failure originated upstream (provider or search API)
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AgentError::Llm(LlmError::Api { .. })
                | AgentError::Llm(LlmError::Network(_))
                | AgentError::Llm(LlmError::Parse(_))
                | AgentError::Llm(LlmError::Timeout)
                | AgentError::Search(SearchError::Api { .. })
                | AgentError::Search(SearchError::Network(_))
        )
    }

    /// Whether a credential was missing from the environment
    pub fn is_missing_credential(&self) -> bool {
        matches!(
            self,
            AgentError::Llm(LlmError::Authentication(_))
                | AgentError::Search(SearchError::Authentication(_))
        )
    }
}

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Result type alias for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;
