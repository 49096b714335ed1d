//! `/health`, `/health/live` and `/health/ready`
//!
//! Credentials are only checked for presence; no upstream is contacted.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::agents::config::LlmProviderType;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub allowed_models: usize,
    /// Provider name to "configured" or "missing"
    pub providers: BTreeMap<String, String>,
}

pub struct HealthHandler {
    allowed_models: usize,
    started: Instant,
}

impl HealthHandler {
    pub fn new(allowed_models: usize) -> Self {
        Self {
            allowed_models,
            started: Instant::now(),
        }
    }

    fn providers() -> BTreeMap<String, String> {
        LlmProviderType::ALL
            .iter()
            .map(|provider| {
                let state = if std::env::var_os(provider.default_key_env()).is_some() {
                    "configured"
                } else {
                    "missing"
                };
                (provider.to_string(), state.to_string())
            })
            .collect()
    }

    /// Always 200 while the process serves requests
    pub async fn health(&self) -> impl IntoResponse {
        let report = HealthReport {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.started.elapsed().as_secs(),
            allowed_models: self.allowed_models,
            providers: Self::providers(),
        };

        (StatusCode::OK, Json(report))
    }

    pub async fn live(&self) -> impl IntoResponse {
        (StatusCode::OK, Json(json!({ "status": "alive" })))
    }

    /// 503 until at least one provider credential is present
    pub async fn ready(&self) -> impl IntoResponse {
        let providers = Self::providers();
        let configured: Vec<&String> = providers
            .iter()
            .filter(|(_, state)| state.as_str() == "configured")
            .map(|(name, _)| name)
            .collect();

        if configured.is_empty() {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not_ready", "reason": "no provider credentials set" })),
            )
        } else {
            (
                StatusCode::OK,
                Json(json!({ "status": "ready", "providers": configured })),
            )
        }
    }
}
