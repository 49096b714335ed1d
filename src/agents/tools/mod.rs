//! Tools a model may call mid-generation
//!
//! Only web search exists. It is built per invocation, so the search
//! credential is read the first time a stage actually asks for the tool.

mod tavily;

pub use tavily::{TavilyConfig, TavilySearch};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::agents::domain::{ToolCall, ToolDefinition};
use crate::agents::error::SearchError;

/// Name the search tool is offered under
pub const WEB_SEARCH_TOOL: &str = "web_search";

/// Web search backend
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// Run a query, returning at most `max_results` hits as JSON
    async fn search(&self, query: &str, max_results: u32) -> Result<Value, SearchError>;
}

/// Builds a search tool on demand
pub type SearchToolFactory =
    Arc<dyn Fn() -> Result<Arc<dyn SearchTool>, SearchError> + Send + Sync>;

/// Factory for the Tavily backend
pub fn tavily_factory(config: TavilyConfig) -> SearchToolFactory {
    Arc::new(move || Ok(Arc::new(TavilySearch::new(&config)?) as Arc<dyn SearchTool>))
}

/// Tool definition sent to the model
pub fn web_search_definition() -> ToolDefinition {
    ToolDefinition::with_string_params(
        WEB_SEARCH_TOOL,
        "Search the web for current information. Returns titles, URLs and content snippets.",
        &[("query", "The search query")],
    )
}

/// The query a search call carries
pub fn query_argument(call: &ToolCall) -> Result<&str, SearchError> {
    call.str_argument("query")
        .ok_or_else(|| SearchError::InvalidArguments("missing string field 'query'".to_string()))
}
