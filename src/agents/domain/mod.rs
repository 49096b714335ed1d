//! Domain types for the agent system
//!
//! Messages and transcripts, tool calls, the fixed role table, and the
//! progress/result payloads the orchestrator hands back.

mod message;
mod response;
mod role;
mod tool_call;

pub use message::*;
pub use response::*;
pub use role::*;
pub use tool_call::*;
