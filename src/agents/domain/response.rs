//! Progress and result payloads returned by the orchestrator

use serde::{Deserialize, Serialize};

use super::{AgentRole, Phase};

/// Status of a progress step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    InProgress,
    Completed,
}

/// Observational record of pipeline advancement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStep {
    pub phase: Phase,
    /// Perspective name, on debate steps only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    pub status: StepStatus,
    pub message: String,
}

impl ProgressStep {
    /// Step appended before a role is invoked
    pub fn started(role: &AgentRole) -> Self {
        Self::new(role, StepStatus::InProgress, role.started_text())
    }

    /// Step appended after a role returned
    pub fn completed(role: &AgentRole) -> Self {
        Self::new(role, StepStatus::Completed, role.completed_text())
    }

    fn new(role: &AgentRole, status: StepStatus, message: String) -> Self {
        Self {
            phase: role.phase,
            agent: (role.phase == Phase::Debate).then(|| role.name.to_string()),
            status,
            message,
        }
    }
}

/// Pipeline flavour requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    /// Research, analyze, write
    #[default]
    Sequential,
    /// Three perspectives and a mediator
    Debate,
}

impl AgentMode {
    /// Mode from a request tag; anything but "debate" selects sequential
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(t) if t.trim().eq_ignore_ascii_case("debate") => AgentMode::Debate,
            _ => AgentMode::Sequential,
        }
    }
}

/// One debate perspective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveResponse {
    pub agent: String,
    pub emoji: String,
    pub response: String,
}

impl PerspectiveResponse {
    pub fn new(role: &AgentRole, response: impl Into<String>) -> Self {
        Self {
            agent: role.name.to_string(),
            emoji: role.emoji.to_string(),
            response: response.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequentialMetadata {
    pub total_agents: u32,
    pub search_enabled: bool,
}

/// Result of the research → analyze → write pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequentialOutcome {
    pub final_response: String,
    pub research_data: String,
    pub analysis: String,
    pub steps: Vec<ProgressStep>,
    pub metadata: SequentialMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateMetadata {
    pub mode: AgentMode,
    pub agents_participated: u32,
    pub search_enabled: bool,
}

/// Result of a debate followed by mediation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateOutcome {
    pub final_response: String,
    pub debate_responses: Vec<PerspectiveResponse>,
    pub steps: Vec<ProgressStep>,
    pub metadata: DebateMetadata,
}

/// Aggregate returned by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OrchestrationResult {
    Sequential(SequentialOutcome),
    Debate(DebateOutcome),
}

impl OrchestrationResult {
    pub fn final_response(&self) -> &str {
        match self {
            OrchestrationResult::Sequential(o) => &o.final_response,
            OrchestrationResult::Debate(o) => &o.final_response,
        }
    }

    pub fn steps(&self) -> &[ProgressStep] {
        match self {
            OrchestrationResult::Sequential(o) => &o.steps,
            OrchestrationResult::Debate(o) => &o.steps,
        }
    }
}
