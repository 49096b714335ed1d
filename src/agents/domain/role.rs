//! Fixed agent roles
//!
//! Every stage of a pipeline is one invocation of a role: a system prompt,
//! a rule for whether the web search tool may be attached, and a template
//! that composes the stage input from the query and earlier stage outputs.
//! Orchestration code only walks this table; adding a perspective means
//! adding a row here.

use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use super::PerspectiveResponse;
use crate::agents::error::AgentResult;

/// Identity of a fixed role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Researcher,
    Analyzer,
    Writer,
    Optimist,
    Skeptic,
    Neutral,
    Mediator,
}

impl RoleKind {
    /// Sequential pipeline stages, in execution order
    pub const PIPELINE: [RoleKind; 3] = [RoleKind::Researcher, RoleKind::Analyzer, RoleKind::Writer];

    /// Debate perspectives, in output order
    pub const PERSPECTIVES: [RoleKind; 3] = [RoleKind::Optimist, RoleKind::Skeptic, RoleKind::Neutral];
}

/// Pipeline phase a role reports progress under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Research,
    Analysis,
    Writing,
    Debate,
    Consensus,
}

/// Whether a role may receive the web search tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEligibility {
    /// Never attached, whatever the request asked for
    Never,
    /// Attached iff search is enabled for the request
    WhenEnabled { max_results: u32 },
}

/// A fixed role configuration
#[derive(Debug)]
pub struct AgentRole {
    pub kind: RoleKind,
    /// Short name ("Optimist"), reported on debate responses
    pub name: &'static str,
    /// Display label used in progress messages
    pub label: &'static str,
    pub emoji: &'static str,
    pub phase: Phase,
    pub system_prompt: &'static str,
    pub search: SearchEligibility,
    /// Tera template for the stage input
    pub context_template: &'static str,
    /// Substituted when the stage yields no assistant text
    pub placeholder: &'static str,
    pub started_message: &'static str,
    pub completed_message: &'static str,
}

/// Values available to context templates
#[derive(Debug, Default, Serialize)]
pub struct StageContext<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<&'a str>,
    pub perspectives: &'a [PerspectiveResponse],
}

impl<'a> StageContext<'a> {
    pub fn query(query: &'a str) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }
}

impl AgentRole {
    /// Look up a role in the table
    pub fn get(kind: RoleKind) -> &'static AgentRole {
        ROLES
            .iter()
            .find(|role| role.kind == kind)
            .unwrap_or(&ROLES[0])
    }

    /// Compose this role's stage input
    pub fn compose(&self, ctx: &StageContext<'_>) -> AgentResult<String> {
        let context = Context::from_serialize(ctx)?;
        Ok(Tera::one_off(self.context_template, &context, false)?)
    }

    /// Search result cap for this stage, or `None` when no tool is attached
    pub fn search_results(&self, allow_search: bool) -> Option<u32> {
        match self.search {
            SearchEligibility::WhenEnabled { max_results } if allow_search => Some(max_results),
            _ => None,
        }
    }

    pub fn started_text(&self) -> String {
        format!("{} **{}** {}", self.emoji, self.label, self.started_message)
    }

    pub fn completed_text(&self) -> String {
        format!("✅ **{}** {}", self.label, self.completed_message)
    }
}

const QUERY_ONLY: &str = "{{ query }}";

pub static ROLES: [AgentRole; 7] = [
    AgentRole {
        kind: RoleKind::Researcher,
        name: "Researcher",
        label: "Research Agent",
        emoji: "🔍",
        phase: Phase::Research,
        system_prompt: "You are a Data Collector. Your ONLY job is to:
1. Find and extract RAW facts, statistics, and information
2. List sources and URLs when using web search
3. Present data in bullet points WITHOUT any interpretation
4. Include dates, numbers, quotes, and concrete details
5. DO NOT analyze, summarize, or give opinions - just collect raw data

Format: Return ONLY factual data points with sources.",
        search: SearchEligibility::WhenEnabled { max_results: 3 },
        context_template: QUERY_ONLY,
        placeholder: "No research data found.",
        started_message: "is collecting raw data and facts...",
        completed_message: "collected data from multiple sources",
    },
    AgentRole {
        kind: RoleKind::Analyzer,
        name: "Analyzer",
        label: "Analyzer Agent",
        emoji: "🧠",
        phase: Phase::Analysis,
        system_prompt: "You are a Critical Analyst. Your job is to:
1. Identify PATTERNS and TRENDS in the raw data
2. Compare and CONTRAST different data points
3. Find CONTRADICTIONS or gaps in the information
4. Evaluate CREDIBILITY and potential biases
5. Generate INSIGHTS and deeper meanings
6. DO NOT write final answers - only provide analytical observations

Format: Return analysis in structured sections:
- Key Patterns:
- Important Insights:
- Contradictions/Gaps:
- Credibility Assessment:",
        search: SearchEligibility::Never,
        context_template: "Original Query: {{ query }}

Raw Research Data:
{{ research }}

Analyze this data critically. DO NOT answer the question - just analyze the data.",
        placeholder: "No analysis available.",
        started_message: "is finding patterns and insights...",
        completed_message: "identified key insights and patterns",
    },
    AgentRole {
        kind: RoleKind::Writer,
        name: "Writer",
        label: "Writer Agent",
        emoji: "✍️",
        phase: Phase::Writing,
        system_prompt: "You are a Professional Communicator. Your job is to:
1. SYNTHESIZE the research data and analysis into a coherent answer
2. Answer the original question DIRECTLY and COMPLETELY
3. Use proper formatting (headings, bullet points, bold text)
4. Make it engaging and easy to understand
5. Include examples and actionable takeaways
6. Cite sources when relevant

Format: Write a complete, well-structured response that actually answers the user's question.",
        search: SearchEligibility::Never,
        context_template: "Original User Question: {{ query }}

Raw Research Data:
{{ research }}

Critical Analysis:
{{ analysis }}

Now write a comprehensive answer to the user's question using the research and analysis above.",
        placeholder: "Unable to generate response.",
        started_message: "is synthesizing the final response...",
        completed_message: "completed the comprehensive response",
    },
    AgentRole {
        kind: RoleKind::Optimist,
        name: "Optimist",
        label: "Optimist Agent",
        emoji: "🌟",
        phase: Phase::Debate,
        system_prompt: "You are an optimistic analyst. Focus on positive aspects, opportunities, success stories, and future potential. Be hopeful but balanced.",
        search: SearchEligibility::WhenEnabled { max_results: 2 },
        context_template: QUERY_ONLY,
        placeholder: "No response",
        started_message: "is analyzing...",
        completed_message: "shared perspective",
    },
    AgentRole {
        kind: RoleKind::Skeptic,
        name: "Skeptic",
        label: "Skeptic Agent",
        emoji: "⚠️",
        phase: Phase::Debate,
        system_prompt: "You are a critical skeptic. Focus on risks, downsides, past failures, and limitations. Be cautious but fair.",
        search: SearchEligibility::WhenEnabled { max_results: 2 },
        context_template: QUERY_ONLY,
        placeholder: "No response",
        started_message: "is analyzing...",
        completed_message: "shared perspective",
    },
    AgentRole {
        kind: RoleKind::Neutral,
        name: "Neutral",
        label: "Neutral Agent",
        emoji: "📊",
        phase: Phase::Debate,
        system_prompt: "You are an objective analyst. Present facts without bias, weigh pros and cons equally, use evidence-based reasoning.",
        search: SearchEligibility::WhenEnabled { max_results: 2 },
        context_template: QUERY_ONLY,
        placeholder: "No response",
        started_message: "is analyzing...",
        completed_message: "shared perspective",
    },
    AgentRole {
        kind: RoleKind::Mediator,
        name: "Mediator",
        label: "Mediator",
        emoji: "⚖️",
        phase: Phase::Consensus,
        system_prompt: "You are a Mediator. Synthesize all perspectives:
1. Summarize each viewpoint fairly
2. Identify points of AGREEMENT
3. Identify points of DISAGREEMENT
4. Provide BALANCED CONCLUSION
5. Give final recommendation

Format with clear sections: Agreement, Disagreement, Conclusion, Recommendation.",
        search: SearchEligibility::Never,
        context_template: "Question: {{ query }}

Perspectives:
{% for p in perspectives %}{% if not loop.first %}

{% endif %}**{{ p.agent }}:**
{{ p.response }}{% endfor %}

Synthesize into consensus.",
        placeholder: "Unable to reach consensus",
        started_message: "is building consensus...",
        completed_message: "reached conclusion",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_row() {
        for kind in RoleKind::PIPELINE.iter().chain(RoleKind::PERSPECTIVES.iter()) {
            assert_eq!(AgentRole::get(*kind).kind, *kind);
        }
        assert_eq!(AgentRole::get(RoleKind::Mediator).kind, RoleKind::Mediator);
    }

    #[test]
    fn test_search_eligibility() {
        let researcher = AgentRole::get(RoleKind::Researcher);
        assert_eq!(researcher.search_results(true), Some(3));
        assert_eq!(researcher.search_results(false), None);

        for kind in [RoleKind::Analyzer, RoleKind::Writer, RoleKind::Mediator] {
            assert_eq!(AgentRole::get(kind).search_results(true), None);
        }
        for kind in RoleKind::PERSPECTIVES {
            assert_eq!(AgentRole::get(kind).search_results(true), Some(2));
        }
    }

    #[test]
    fn test_compose_analyzer_input() {
        let role = AgentRole::get(RoleKind::Analyzer);
        let input = role
            .compose(&StageContext {
                research: Some("- 61 companies trialled it"),
                ..StageContext::query("Should companies adopt a 4-day work week?")
            })
            .unwrap();

        assert!(input.starts_with("Original Query: Should companies adopt a 4-day work week?"));
        assert!(input.contains("Raw Research Data:\n- 61 companies trialled it\n"));
        assert!(input.ends_with("just analyze the data."));
    }

    #[test]
    fn test_compose_keeps_template_syntax_in_values_literal() {
        let role = AgentRole::get(RoleKind::Researcher);
        let input = role.compose(&StageContext::query("what is {{ x }}?")).unwrap();
        assert_eq!(input, "what is {{ x }}?");
    }

    #[test]
    fn test_compose_mediator_joins_perspectives_in_order() {
        let perspectives = vec![
            PerspectiveResponse::new(AgentRole::get(RoleKind::Optimist), "upside"),
            PerspectiveResponse::new(AgentRole::get(RoleKind::Skeptic), "downside"),
            PerspectiveResponse::new(AgentRole::get(RoleKind::Neutral), "both"),
        ];
        let input = AgentRole::get(RoleKind::Mediator)
            .compose(&StageContext {
                perspectives: &perspectives,
                ..StageContext::query("Q?")
            })
            .unwrap();

        assert_eq!(
            input,
            "Question: Q?\n\nPerspectives:\n**Optimist:**\nupside\n\n**Skeptic:**\ndownside\n\n**Neutral:**\nboth\n\nSynthesize into consensus."
        );
    }

    #[test]
    fn test_progress_texts() {
        let role = AgentRole::get(RoleKind::Researcher);
        assert_eq!(
            role.started_text(),
            "🔍 **Research Agent** is collecting raw data and facts..."
        );
        assert_eq!(
            role.completed_text(),
            "✅ **Research Agent** collected data from multiple sources"
        );
    }
}
