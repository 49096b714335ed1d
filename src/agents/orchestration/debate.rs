//! Three-perspective debate followed by mediation

use futures::future::try_join_all;

use crate::agents::domain::{
    AgentMode, AgentRole, DebateMetadata, DebateOutcome, PerspectiveResponse, ProgressStep,
    RoleKind, StageContext,
};
use crate::agents::error::AgentResult;

use super::MultiAgentOrchestrator;

/// Debate orchestrator: perspectives see only the query, the mediator sees them all
pub struct DebateOrchestrator;

impl DebateOrchestrator {
    pub async fn execute(
        orchestrator: &MultiAgentOrchestrator,
        query: &str,
        parallel: bool,
    ) -> AgentResult<DebateOutcome> {
        let roles: Vec<&AgentRole> = RoleKind::PERSPECTIVES
            .iter()
            .map(|kind| AgentRole::get(*kind))
            .collect();

        let texts = if parallel {
            try_join_all(
                roles.iter().map(|role| async move {
                    orchestrator.run_stage(role, &StageContext::query(query)).await
                }),
            )
            .await?
        } else {
            let mut texts = Vec::with_capacity(roles.len());
            for role in &roles {
                texts.push(orchestrator.run_stage(role, &StageContext::query(query)).await?);
            }
            texts
        };

        // Emitted in table order whatever order the stages finished in
        let mut steps = Vec::with_capacity(2 * roles.len() + 2);
        let mut debate_responses = Vec::with_capacity(roles.len());
        for (role, text) in roles.iter().zip(texts) {
            steps.push(ProgressStep::started(role));
            steps.push(ProgressStep::completed(role));
            debate_responses.push(PerspectiveResponse::new(role, text));
        }

        let mediator = AgentRole::get(RoleKind::Mediator);
        steps.push(ProgressStep::started(mediator));
        let final_response = orchestrator
            .run_stage(
                mediator,
                &StageContext {
                    perspectives: &debate_responses,
                    ..StageContext::query(query)
                },
            )
            .await?;
        steps.push(ProgressStep::completed(mediator));

        Ok(DebateOutcome {
            final_response,
            debate_responses,
            steps,
            metadata: DebateMetadata {
                mode: AgentMode::Debate,
                agents_participated: roles.len() as u32 + 1,
                search_enabled: orchestrator.allow_search(),
            },
        })
    }
}
