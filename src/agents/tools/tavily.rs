//! Tavily web search client

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::SearchTool;
use crate::agents::error::SearchError;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Tavily connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TavilyConfig {
    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Custom base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_api_key_env() -> String {
    "TAVILY_API_KEY".to_string()
}

impl Default for TavilyConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: None,
        }
    }
}

/// Tavily search tool
pub struct TavilySearch {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl TavilySearch {
    pub fn new(config: &TavilyConfig) -> Result<Self, SearchError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            SearchError::Authentication(format!(
                "Environment variable {} not set",
                config.api_key_env
            ))
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key: SecretString::from(api_key),
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl SearchTool for TavilySearch {
    async fn search(&self, query: &str, max_results: u32) -> Result<Value, SearchError> {
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&json!({
                "api_key": self.api_key.expose_secret(),
                "query": query,
                "max_results": max_results,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Network(format!("Failed to parse response: {}", e)))?;

        let results: Vec<TavilyResult> = parsed
            .results
            .into_iter()
            .take(max_results as usize)
            .collect();

        Ok(json!({ "query": query, "results": results }))
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize, Serialize)]
struct TavilyResult {
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool(base_url: String) -> TavilySearch {
        TavilySearch {
            client: reqwest::Client::new(),
            api_key: SecretString::from("tvly-test".to_string()),
            base_url,
        }
    }

    #[tokio::test]
    async fn test_search_caps_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(json!({
                "api_key": "tvly-test",
                "query": "4-day week",
                "max_results": 2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": "4-day week",
                "results": [
                    { "title": "A", "url": "https://a.example", "content": "a", "score": 0.9 },
                    { "title": "B", "url": "https://b.example", "content": "b", "score": 0.8 },
                    { "title": "C", "url": "https://c.example", "content": "c", "score": 0.7 }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let value = tool(server.uri()).search("4-day week", 2).await.unwrap();
        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1]["url"], "https://b.example");
        assert!(results[0].get("score").is_none());
    }

    #[tokio::test]
    async fn test_search_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = tool(server.uri()).search("q", 3).await.unwrap_err();
        assert!(matches!(err, SearchError::Api { status: 401, .. }));
    }

    #[test]
    fn test_missing_key() {
        let config = TavilyConfig {
            api_key_env: "AGORA_TEST_UNSET_TAVILY_91c2".to_string(),
            base_url: None,
        };
        assert!(matches!(
            TavilySearch::new(&config),
            Err(SearchError::Authentication(_))
        ));
    }
}
