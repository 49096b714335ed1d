//! Multi-agent orchestration
//!
//! Two fixed pipelines over a single chat client:
//! - Sequential: researcher, analyzer and writer, each fed the previous outputs
//! - Debate: three independent perspectives, then a mediator
//!
//! Every stage is one invocation of a role from the role table. A stage that
//! yields no assistant text is replaced by the role's placeholder; a stage
//! that fails or overruns its deadline aborts the whole run.

mod debate;
mod sequential;

pub use debate::DebateOrchestrator;
pub use sequential::SequentialOrchestrator;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::agents::core::{ChatClient, Invocation};
use crate::agents::domain::{
    last_assistant_text, AgentMode, AgentRole, OrchestrationResult, StageContext,
};
use crate::agents::error::{AgentError, AgentResult};

/// Default deadline for a single stage
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the research pipeline or a debate against one chat client
pub struct MultiAgentOrchestrator {
    client: Arc<dyn ChatClient>,
    allow_search: bool,
    stage_timeout: Duration,
    parallel_debate: bool,
}

impl MultiAgentOrchestrator {
    pub fn new(client: Arc<dyn ChatClient>, allow_search: bool) -> Self {
        Self {
            client,
            allow_search,
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
            parallel_debate: true,
        }
    }

    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Run debate perspectives concurrently (default) or one after another
    pub fn with_parallel_debate(mut self, parallel: bool) -> Self {
        self.parallel_debate = parallel;
        self
    }

    pub fn allow_search(&self) -> bool {
        self.allow_search
    }

    /// Run the pipeline selected by `mode`
    pub async fn run(&self, mode: AgentMode, query: &str) -> AgentResult<OrchestrationResult> {
        tracing::info!(
            mode = ?mode,
            search_enabled = self.allow_search,
            "Starting multi-agent run"
        );

        match mode {
            AgentMode::Sequential => SequentialOrchestrator::execute(self, query)
                .await
                .map(OrchestrationResult::Sequential),
            AgentMode::Debate => DebateOrchestrator::execute(self, query, self.parallel_debate)
                .await
                .map(OrchestrationResult::Debate),
        }
    }

    /// Invoke one role and return its text, or its placeholder when empty
    async fn run_stage(&self, role: &AgentRole, ctx: &StageContext<'_>) -> AgentResult<String> {
        let input = role.compose(ctx)?;
        let invocation = Invocation::new(role.system_prompt, input)
            .with_search(role.search_results(self.allow_search));

        tracing::info!(
            role = role.name,
            search = invocation.search.is_some(),
            "Stage started"
        );
        let started = Instant::now();

        let transcript = tokio::time::timeout(self.stage_timeout, self.client.invoke(&invocation))
            .await
            .map_err(|_| {
                tracing::error!(role = role.name, "Stage timed out");
                AgentError::Timeout(self.stage_timeout.as_secs())
            })?
            .map_err(|e| {
                tracing::error!(role = role.name, error = %e, "Stage failed");
                e
            })?;

        let text = match last_assistant_text(&transcript) {
            Some(text) => text,
            None => {
                tracing::warn!(role = role.name, "Stage produced no text, using placeholder");
                role.placeholder.to_string()
            }
        };

        tracing::info!(
            role = role.name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            output_len = text.len(),
            "Stage completed"
        );

        Ok(text)
    }
}
