//! Message and transcript types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ToolCall;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (instructions to the LLM)
    System,
    /// User message
    User,
    /// Assistant (LLM) message
    Assistant,
    /// Tool result message
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Message content (text)
    pub content: String,
    /// Tool calls made by the assistant (if any)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// ID of the tool call this message is responding to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool name, on tool result messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create an assistant message with tool calls
    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            ..Self::with_role(Role::Assistant, content)
        }
    }

    /// Create a tool result message
    pub fn tool_result(tool_call: &ToolCall, result: &Value) -> Self {
        Self {
            tool_call_id: Some(tool_call.id.clone()),
            name: Some(tool_call.name.clone()),
            ..Self::with_role(
                Role::Tool,
                serde_json::to_string(result).unwrap_or_else(|_| "{}".to_string()),
            )
        }
    }

    /// Assistant message that asks for tool execution
    pub fn is_tool_request(&self) -> bool {
        self.role == Role::Assistant
            && self.tool_calls.as_ref().map_or(false, |calls| !calls.is_empty())
    }
}

/// Final assistant-authored text of a transcript.
///
/// Walks backwards, skipping tool results and tool-call requests, and
/// returns the content of the last plain assistant message that has text.
/// `None` when the transcript holds no such message.
pub fn last_assistant_text(transcript: &[Message]) -> Option<String> {
    transcript
        .iter()
        .rev()
        .filter(|m| m.role == Role::Assistant && !m.is_tool_request())
        .find(|m| !m.content.trim().is_empty())
        .map(|m| m.content.clone())
}
