//! `POST /chat`: allow-list check, then single agent or a multi-agent pipeline

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use super::AppState;
use crate::agents::config::LlmProviderType;
use crate::agents::core::respond_with;
use crate::agents::domain::AgentMode;
use crate::agents::error::AgentError;
use crate::agents::orchestration::MultiAgentOrchestrator;

/// Body returned for a model outside the allow-list
pub const MODEL_NOT_ALLOWED: &str = "Model not allowed. Please choose a valid model.";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatRequest {
    pub model_name: String,
    pub model_provider: String,
    /// Used by the single agent only
    pub system_prompt: String,
    /// The first entry is the query
    pub messages: Vec<String>,
    pub allow_search: bool,
    #[serde(default)]
    pub use_multi_agent: Option<bool>,
    /// "sequential" (default) or "debate"
    #[serde(default)]
    pub agent_mode: Option<String>,
}

/// Error rendered as `{"error": ...}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        let status = status_for(&err);
        if status.is_server_error() {
            tracing::error!(error = %err, status = status.as_u16(), "Chat request failed");
        } else {
            tracing::warn!(error = %err, status = status.as_u16(), "Chat request rejected");
        }

        let message = match err {
            AgentError::Configuration(message) | AgentError::Validation(message) => message,
            other => other.to_string(),
        };
        Self::new(status, message)
    }
}

/// HTTP status for an agent failure
pub fn status_for(err: &AgentError) -> StatusCode {
    if err.is_missing_credential() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match err {
        AgentError::Llm(_) | AgentError::Search(_) => StatusCode::BAD_GATEWAY,
        AgentError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        AgentError::Configuration(_) => StatusCode::BAD_REQUEST,
        AgentError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AgentError::Execution(_) | AgentError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let span = tracing::info_span!(
        "chat",
        request_id = %Uuid::new_v4(),
        model = %request.model_name,
        provider = %request.model_provider,
        multi_agent = request.use_multi_agent.unwrap_or(false),
        mode = request.agent_mode.as_deref().unwrap_or("sequential"),
    );

    handle_chat(state, request).instrument(span).await
}

async fn handle_chat(state: AppState, request: ChatRequest) -> Result<Response, ApiError> {
    if !state.models.is_allowed(&request.model_name) {
        tracing::warn!("Rejected model outside the allow-list");
        return Ok((StatusCode::OK, Json(json!({ "error": MODEL_NOT_ALLOWED }))).into_response());
    }

    let query = request
        .messages
        .first()
        .ok_or_else(|| AgentError::Validation("messages must contain the query".to_string()))?;

    let provider: LlmProviderType = request.model_provider.parse()?;

    let mut allow_search = request.allow_search;
    if allow_search && !state.models.accepts_tools(&request.model_name) {
        tracing::warn!("Model does not support tools, disabling web search");
        allow_search = false;
    }

    if !request.use_multi_agent.unwrap_or(false) {
        let text = respond_with(
            state.factory.as_ref(),
            &request.model_name,
            query,
            allow_search,
            &request.system_prompt,
            provider,
        )
        .await?;

        tracing::info!(response_len = text.len(), "Single-agent response ready");
        return Ok(Json(json!({ "final_response": text })).into_response());
    }

    let mode = AgentMode::from_tag(request.agent_mode.as_deref());
    let client = state.factory.build_client(provider, &request.model_name)?;
    let orchestrator = MultiAgentOrchestrator::new(client, allow_search)
        .with_stage_timeout(state.orchestration.stage_timeout())
        .with_parallel_debate(state.orchestration.parallel_debate);

    let result = orchestrator.run(mode, query).await?;

    tracing::info!(steps = result.steps().len(), "Multi-agent response ready");
    Ok(Json(result).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::error::{LlmError, SearchError};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AgentError::Llm(LlmError::Api {
                    status: 500,
                    message: "x".to_string(),
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AgentError::Search(SearchError::Network("x".to_string())),
                StatusCode::BAD_GATEWAY,
            ),
            (AgentError::Timeout(120), StatusCode::GATEWAY_TIMEOUT),
            (
                AgentError::Configuration("Unsupported model provider: X".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AgentError::Llm(LlmError::Authentication("GROQ_API_KEY".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AgentError::Validation("messages must contain the query".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(status_for(&err), expected, "{}", err);
        }
    }

    #[test]
    fn test_configuration_message_is_bare() {
        let err = ApiError::from(AgentError::Configuration(
            "Unsupported model provider: Foo".to_string(),
        ));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Unsupported model provider: Foo");
    }

    #[test]
    fn test_request_defaults() {
        let request: ChatRequest = serde_json::from_value(json!({
            "model_name": "llama-3.3-70b-versatile",
            "model_provider": "Groq",
            "system_prompt": "Act as a helpful assistant.",
            "messages": ["hi"],
            "allow_search": false
        }))
        .unwrap();
        assert_eq!(request.use_multi_agent, None);
        assert_eq!(request.agent_mode, None);
    }
}
