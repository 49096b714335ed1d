//! Agent system for Agora
//!
//! This module answers chat queries with hosted LLMs, either directly or
//! through a small multi-agent pipeline:
//! - Single agent (one invocation under the caller's system prompt)
//! - Sequential pipeline (research → analyze → write)
//! - Debate (optimist, skeptic, neutral → mediator)
//!
//! ## Architecture
//!
//! - `domain/` - Core types (Message, AgentRole table, progress and results)
//! - `llm/` - LLM provider implementations and the provider registry
//! - `tools/` - Web search tool
//! - `core/` - Chat client seam, tool-calling client, single-agent responder
//! - `orchestration/` - Multi-agent pipelines

pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod llm;
pub mod orchestration;
pub mod tools;

// Re-export commonly used types
pub use config::*;
pub use domain::*;
pub use error::*;
