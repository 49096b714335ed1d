//! # Agora - multi-agent chat backend
//!
//! Agora answers chat queries with hosted LLMs (Groq, OpenAI, Gemini),
//! either through one agent or through a small multi-agent pipeline.
//!
//! ## Features
//!
//! - **Single agent**: one invocation under the caller's system prompt
//! - **Sequential pipeline**: researcher, analyzer, writer
//! - **Debate**: optimist, skeptic and neutral perspectives reconciled by a mediator
//! - **Web search**: optional Tavily search tool on eligible stages
//! - **Model allow-list**: unknown models are rejected before any network call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agora::adapters::AppState;
//! use agora::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load("agora.toml".as_ref())?;
//!     let app = agora::create_app(AppState::from_settings(&settings));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:9999").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Agents**: providers, search tool, chat client seam, orchestration
//! - **Adapters**: HTTP handlers
//! - **Config**: layered settings and validation

pub mod adapters;
pub mod agents;
pub mod cli;
pub mod config;

use crate::adapters::health_handler::HealthHandler;
use crate::adapters::{chat_handler, models_handler, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates the Axum application router with all endpoints configured.
pub fn create_app(state: AppState) -> Router {
    let health_handler = Arc::new(HealthHandler::new(state.models.allowed.len()));

    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }));

    let api_router = Router::new()
        .route("/chat", post(chat_handler::chat))
        .route("/models", get(models_handler::list_models))
        .with_state(state);

    health_router
        .merge(api_router)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}
