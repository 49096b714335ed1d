//! Function-calling payloads exchanged with providers

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A function call the model asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Echoed back on the matching tool result
    pub id: String,
    pub name: String,
    /// Decoded JSON arguments; an empty object when the model sent none
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// A non-blank string argument
    pub fn str_argument(&self, key: &str) -> Option<&str> {
        self.arguments
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// A function offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Definition whose arguments are all required strings, given as
    /// `(name, description)` pairs
    pub fn with_string_params(
        name: impl Into<String>,
        description: impl Into<String>,
        params: &[(&str, &str)],
    ) -> Self {
        let properties: Map<String, Value> = params
            .iter()
            .map(|(param, about)| {
                (
                    param.to_string(),
                    json!({ "type": "string", "description": about }),
                )
            })
            .collect();
        let required: Vec<&str> = params.iter().map(|(param, _)| *param).collect();

        Self::new(
            name,
            description,
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_argument_skips_blank_and_non_strings() {
        let call = ToolCall::new(
            "call_0",
            "web_search",
            json!({ "query": "tidal energy", "blank": "  ", "count": 3 }),
        );
        assert_eq!(call.str_argument("query"), Some("tidal energy"));
        assert_eq!(call.str_argument("blank"), None);
        assert_eq!(call.str_argument("count"), None);
        assert_eq!(call.str_argument("missing"), None);
    }

    #[test]
    fn test_string_params_schema() {
        let def = ToolDefinition::with_string_params(
            "lookup",
            "Look something up",
            &[("term", "What to look up"), ("locale", "Result language")],
        );
        assert_eq!(def.parameters["type"], "object");
        assert_eq!(def.parameters["properties"]["term"]["type"], "string");
        assert_eq!(def.parameters["required"], json!(["term", "locale"]));
    }
}
