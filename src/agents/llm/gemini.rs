//! Google Gemini LLM Provider

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{api_key_from_env, CompletionRequest, CompletionResponse, FinishReason, LlmProvider, TokenUsage};
use crate::agents::config::LlmProviderConfig;
use crate::agents::domain::{Message, Role, ToolCall};
use crate::agents::error::{LlmError, LlmResult};

/// Google Gemini LLM Provider
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    default_temperature: Option<f32>,
    default_max_tokens: Option<u32>,
}

impl GeminiProvider {
    /// Create a new Gemini provider from configuration
    pub fn new(config: &LlmProviderConfig) -> LlmResult<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key_from_env(config)?,
            base_url: config.endpoint().trim_end_matches('/').to_string(),
            model: config.model.clone(),
            default_temperature: config.temperature,
            default_max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for Gemini API
    fn build_request_body(&self, request: &CompletionRequest) -> Value {
        let system: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let mut body = json!({
            "contents": self.convert_messages(&request.messages),
        });

        if !system.is_empty() {
            body["systemInstruction"] = json!({
                "parts": [{ "text": system.join("\n\n") }]
            });
        }

        // Generation config
        let mut generation_config = json!({});

        if let Some(temp) = request.temperature.or(self.default_temperature) {
            generation_config["temperature"] = json!(temp);
        }

        if let Some(max_tokens) = request.max_tokens.or(self.default_max_tokens) {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }

        if generation_config.as_object().map_or(false, |o| !o.is_empty()) {
            body["generationConfig"] = generation_config;
        }

        // Tools (function declarations)
        if let Some(tools) = request.tool_list() {
            body["tools"] = json!([{
                "functionDeclarations": tools.iter().map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters
                    })
                }).collect::<Vec<_>>()
            }]);
        }

        body
    }

    /// Convert internal messages to Gemini contents; system messages travel separately
    fn convert_messages(&self, messages: &[Message]) -> Vec<Value> {
        let mut contents = Vec::new();

        for m in messages {
            match m.role {
                Role::System => {}
                Role::User => {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{ "text": m.content }]
                    }));
                }
                Role::Assistant => {
                    let mut parts = Vec::new();

                    if !m.content.is_empty() {
                        parts.push(json!({ "text": m.content }));
                    }

                    if let Some(tool_calls) = &m.tool_calls {
                        for tc in tool_calls {
                            parts.push(json!({
                                "functionCall": {
                                    "name": tc.name,
                                    "args": tc.arguments
                                }
                            }));
                        }
                    }

                    if !parts.is_empty() {
                        contents.push(json!({
                            "role": "model",
                            "parts": parts
                        }));
                    }
                }
                Role::Tool => {
                    let tool_name = m.name.clone().unwrap_or_else(|| "tool".to_string());
                    let response_value: Value = serde_json::from_str(&m.content)
                        .unwrap_or_else(|_| json!({ "result": m.content }));

                    contents.push(json!({
                        "role": "user",
                        "parts": [{
                            "functionResponse": {
                                "name": tool_name,
                                "response": response_value
                            }
                        }]
                    }));
                }
            }
        }

        contents
    }

    /// Parse a generateContent response
    fn parse_response(&self, response: GeminiResponse) -> LlmResult<CompletionResponse> {
        let candidate = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Parse("No candidates in response".to_string()))?;

        let mut content = String::new();
        let mut tool_calls = Vec::new();

        let parts = candidate.content.and_then(|c| c.parts).unwrap_or_default();
        for (index, part) in parts.into_iter().enumerate() {
            if let Some(text) = part.text {
                content.push_str(&text);
            }
            if let Some(fc) = part.function_call {
                tool_calls.push(ToolCall {
                    id: format!("call_{}", index),
                    name: fc.name,
                    arguments: fc.args.unwrap_or(Value::Object(Default::default())),
                });
            }
        }

        let finish_reason = if !tool_calls.is_empty() {
            FinishReason::ToolCalls
        } else {
            match candidate.finish_reason.as_deref() {
                Some("MAX_TOKENS") => FinishReason::Length,
                Some("SAFETY") | Some("RECITATION") => FinishReason::ContentFilter,
                _ => FinishReason::Stop,
            }
        };

        let usage = response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count.unwrap_or(0),
            completion_tokens: u.candidates_token_count.unwrap_or(0),
            total_tokens: u.total_token_count.unwrap_or(0),
        });

        Ok(CompletionResponse {
            message: Message::assistant_with_tools(content, tool_calls),
            finish_reason,
            usage,
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> LlmResult<CompletionResponse> {
        let body = self.build_request_body(&request);
        let model = request.model.as_ref().unwrap_or(&self.model);
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse response: {}", e)))?;

        self.parse_response(gemini_response)
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    args: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::domain::ToolDefinition;

    fn provider() -> GeminiProvider {
        GeminiProvider {
            client: reqwest::Client::new(),
            api_key: SecretString::from("g-test".to_string()),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            default_temperature: Some(0.2),
            default_max_tokens: None,
        }
    }

    #[test]
    fn test_system_prompt_goes_to_system_instruction() {
        let request = CompletionRequest {
            messages: vec![Message::system("You are a Mediator."), Message::user("Q?")],
            ..Default::default()
        };
        let body = provider().build_request_body(&request);

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are a Mediator.");
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(body.get("tools").is_none());
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_function_declarations_when_tools_present() {
        let request = CompletionRequest {
            messages: vec![Message::user("Q?")],
            tools: Some(vec![ToolDefinition::new("web_search", "Search", json!({ "type": "object" }))]),
            ..Default::default()
        };
        let body = provider().build_request_body(&request);
        assert_eq!(body["tools"][0]["functionDeclarations"][0]["name"], "web_search");
    }

    #[test]
    fn test_tool_result_becomes_function_response() {
        let call = ToolCall::new("call_0", "web_search", json!({ "query": "x" }));
        let contents = provider().convert_messages(&[
            Message::assistant_with_tools("", vec![call.clone()]),
            Message::tool_result(&call, &json!({ "results": [1] })),
        ]);

        assert_eq!(contents[0]["role"], "model");
        assert_eq!(contents[0]["parts"][0]["functionCall"]["name"], "web_search");
        assert_eq!(contents[1]["parts"][0]["functionResponse"]["name"], "web_search");
        assert_eq!(contents[1]["parts"][0]["functionResponse"]["response"]["results"][0], 1);
    }

    #[test]
    fn test_parse_function_call_response() {
        let raw: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "functionCall": { "name": "web_search", "args": { "query": "q" } } }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 3, "candidatesTokenCount": 4, "totalTokenCount": 7 }
        }))
        .unwrap();

        let parsed = provider().parse_response(raw).unwrap();
        assert_eq!(parsed.finish_reason, FinishReason::ToolCalls);
        assert!(parsed.message.is_tool_request());
        assert_eq!(parsed.usage.unwrap().total_tokens, 7);
    }

    #[test]
    fn test_parse_without_candidates() {
        let raw: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(provider().parse_response(raw), Err(LlmError::Parse(_))));
    }
}
