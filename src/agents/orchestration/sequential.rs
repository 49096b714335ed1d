//! Research → analyze → write pipeline

use crate::agents::domain::{
    AgentRole, ProgressStep, RoleKind, SequentialMetadata, SequentialOutcome, StageContext,
};
use crate::agents::error::AgentResult;

use super::MultiAgentOrchestrator;

/// Sequential orchestrator: each stage reads every earlier stage's output
pub struct SequentialOrchestrator;

impl SequentialOrchestrator {
    pub async fn execute(
        orchestrator: &MultiAgentOrchestrator,
        query: &str,
    ) -> AgentResult<SequentialOutcome> {
        let researcher = AgentRole::get(RoleKind::Researcher);
        let analyzer = AgentRole::get(RoleKind::Analyzer);
        let writer = AgentRole::get(RoleKind::Writer);

        let mut steps = Vec::with_capacity(6);

        steps.push(ProgressStep::started(researcher));
        let research = orchestrator
            .run_stage(researcher, &StageContext::query(query))
            .await?;
        steps.push(ProgressStep::completed(researcher));

        steps.push(ProgressStep::started(analyzer));
        let analysis = orchestrator
            .run_stage(
                analyzer,
                &StageContext {
                    research: Some(research.as_str()),
                    ..StageContext::query(query)
                },
            )
            .await?;
        steps.push(ProgressStep::completed(analyzer));

        steps.push(ProgressStep::started(writer));
        let final_response = orchestrator
            .run_stage(
                writer,
                &StageContext {
                    research: Some(research.as_str()),
                    analysis: Some(analysis.as_str()),
                    ..StageContext::query(query)
                },
            )
            .await?;
        steps.push(ProgressStep::completed(writer));

        Ok(SequentialOutcome {
            final_response,
            research_data: research,
            analysis,
            steps,
            metadata: SequentialMetadata {
                total_agents: RoleKind::PIPELINE.len() as u32,
                search_enabled: orchestrator.allow_search(),
            },
        })
    }
}
