//! Provider-backed chat client with a bounded tool-calling loop

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ChatClient, Invocation, SearchSpec};
use crate::agents::domain::{Message, ToolCall};
use crate::agents::error::AgentResult;
use crate::agents::llm::{CompletionRequest, LlmProvider};
use crate::agents::tools::{
    query_argument, web_search_definition, SearchTool, SearchToolFactory, WEB_SEARCH_TOOL,
};

/// Chat client that lets the model call web search between completions
pub struct ToolCallingClient {
    llm: Arc<dyn LlmProvider>,
    search: SearchToolFactory,
    max_iterations: u32,
}

impl ToolCallingClient {
    pub fn new(llm: Arc<dyn LlmProvider>, search: SearchToolFactory, max_iterations: u32) -> Self {
        Self {
            llm,
            search,
            max_iterations: max_iterations.max(1),
        }
    }

    /// Build the search tool if this invocation wants one
    fn attach_search(
        &self,
        spec: Option<SearchSpec>,
    ) -> AgentResult<Option<(Arc<dyn SearchTool>, SearchSpec)>> {
        let Some(spec) = spec else {
            return Ok(None);
        };

        if !self.llm.supports_tools() {
            tracing::warn!(
                model = %self.llm.model(),
                "Model does not accept tools, invoking without web search"
            );
            return Ok(None);
        }

        Ok(Some(((self.search)()?, spec)))
    }

    async fn execute_tool(tool: &dyn SearchTool, spec: SearchSpec, call: &ToolCall) -> Value {
        if call.name != WEB_SEARCH_TOOL {
            return json!({ "error": format!("Unknown tool: {}", call.name) });
        }

        let outcome = match query_argument(call) {
            Ok(query) => {
                tracing::info!(query = %query, max_results = spec.max_results, "Running web search");
                tool.search(query, spec.max_results).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "Web search failed");
                json!({ "error": e.to_string() })
            }
        }
    }
}

#[async_trait]
impl ChatClient for ToolCallingClient {
    async fn invoke(&self, invocation: &Invocation) -> AgentResult<Vec<Message>> {
        let search = self.attach_search(invocation.search)?;
        let tools = search.as_ref().map(|_| vec![web_search_definition()]);

        let mut messages = Vec::with_capacity(invocation.conversation.len() + 1);
        messages.push(Message::system(&invocation.system_prompt));
        messages.extend(invocation.conversation.iter().cloned());

        let mut transcript = Vec::new();

        for iteration in 0..self.max_iterations {
            let started = Instant::now();
            let request = CompletionRequest {
                messages: messages.clone(),
                tools: tools.clone(),
                ..Default::default()
            };

            let response = self.llm.complete(request).await?;

            tracing::debug!(
                provider = %self.llm.name(),
                iteration = iteration + 1,
                elapsed_ms = started.elapsed().as_millis() as u64,
                finish_reason = ?response.finish_reason,
                "Completion received"
            );

            let message = response.message;
            let tool_calls = message.tool_calls.clone().unwrap_or_default();
            messages.push(message.clone());
            transcript.push(message);

            let Some((tool, spec)) = &search else {
                break;
            };
            if tool_calls.is_empty() {
                break;
            }

            for call in &tool_calls {
                let output = Self::execute_tool(tool.as_ref(), *spec, call).await;
                let result = Message::tool_result(call, &output);
                messages.push(result.clone());
                transcript.push(result);
            }

            if iteration + 1 == self.max_iterations {
                tracing::warn!(
                    max_iterations = self.max_iterations,
                    "Tool loop hit its iteration cap"
                );
            }
        }

        Ok(transcript)
    }
}
