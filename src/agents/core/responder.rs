//! Single-agent round trip

use crate::agents::config::LlmProviderType;
use crate::agents::domain::last_assistant_text;
use crate::agents::error::AgentResult;

use super::{ChatClient, ClientFactory, Invocation};

/// Search result cap for single-agent answers
pub const SINGLE_AGENT_SEARCH_RESULTS: u32 = 2;

/// Answer a query with one invocation under the caller's system prompt
///
/// Returns the last assistant-authored text of the transcript. A transcript
/// without one yields the empty string.
pub async fn respond(
    client: &dyn ChatClient,
    query: &str,
    allow_search: bool,
    system_prompt: &str,
) -> AgentResult<String> {
    let invocation = Invocation::new(system_prompt, query)
        .with_search(allow_search.then_some(SINGLE_AGENT_SEARCH_RESULTS));

    let transcript = client.invoke(&invocation).await?;

    Ok(last_assistant_text(&transcript).unwrap_or_else(|| {
        tracing::warn!(
            transcript_len = transcript.len(),
            "No assistant text in single-agent transcript"
        );
        String::new()
    }))
}

/// Build a client for `provider`/`model_id` and answer with it
pub async fn respond_with(
    factory: &dyn ClientFactory,
    model_id: &str,
    query: &str,
    allow_search: bool,
    system_prompt: &str,
    provider: LlmProviderType,
) -> AgentResult<String> {
    let client = factory.build_client(provider, model_id)?;
    respond(client.as_ref(), query, allow_search, system_prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::core::SearchSpec;
    use crate::agents::domain::{Message, ToolCall};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct CannedClient {
        transcript: Vec<Message>,
        seen: Mutex<Vec<Invocation>>,
    }

    impl CannedClient {
        fn new(transcript: Vec<Message>) -> Self {
            Self {
                transcript,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatClient for CannedClient {
        async fn invoke(&self, invocation: &Invocation) -> AgentResult<Vec<Message>> {
            self.seen.lock().unwrap().push(invocation.clone());
            Ok(self.transcript.clone())
        }
    }

    struct CannedFactory(Arc<CannedClient>);

    impl ClientFactory for CannedFactory {
        fn build_client(
            &self,
            _provider: LlmProviderType,
            _model_id: &str,
        ) -> AgentResult<Arc<dyn ChatClient>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_respond_skips_tool_traffic() {
        let call = ToolCall::new("call_1", "web_search", json!({ "query": "q" }));
        let client = CannedClient::new(vec![
            Message::assistant_with_tools("", vec![call.clone()]),
            Message::tool_result(&call, &json!({ "results": [] })),
            Message::assistant("The answer."),
        ]);

        let text = respond(&client, "What?", true, "Be brief.").await.unwrap();
        assert_eq!(text, "The answer.");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system_prompt, "Be brief.");
        assert_eq!(seen[0].conversation, vec![Message::user("What?")]);
        assert_eq!(seen[0].search, Some(SearchSpec { max_results: 2 }));
    }

    #[tokio::test]
    async fn test_respond_without_search_attaches_no_tool() {
        let client = CannedClient::new(vec![Message::assistant("ok")]);
        respond(&client, "What?", false, "sys").await.unwrap();
        assert!(client.seen.lock().unwrap()[0].search.is_none());
    }

    #[tokio::test]
    async fn test_empty_transcript_yields_empty_string() {
        let client = CannedClient::new(vec![]);
        let text = respond(&client, "What?", false, "sys").await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_respond_with_builds_one_client() {
        let client = Arc::new(CannedClient::new(vec![Message::assistant("hi")]));
        let factory = CannedFactory(client.clone());

        let text = respond_with(
            &factory,
            "llama-3.3-70b-versatile",
            "Hello",
            false,
            "sys",
            LlmProviderType::Groq,
        )
        .await
        .unwrap();

        assert_eq!(text, "hi");
        assert_eq!(client.seen.lock().unwrap().len(), 1);
    }
}
