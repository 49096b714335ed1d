use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub mod validator;

use crate::agents::config::LlmProviderType;
use crate::agents::core::DEFAULT_MAX_TOOL_ITERATIONS;
use crate::agents::tools::TavilyConfig;
use crate::cli::Cli;

/// Prefix for environment overrides, e.g. `AGORA__SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "AGORA";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub models: ModelSettings,
    #[serde(default)]
    pub providers: ProviderSettings,
    /// Web search backend
    #[serde(default)]
    pub search: TavilyConfig,
    #[serde(default)]
    pub orchestration: OrchestrationSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9999,
        }
    }
}

/// Which models a request may name
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelSettings {
    /// Allow-list checked before any client is built
    #[serde(default = "default_allowed_models")]
    pub allowed: Vec<String>,
    /// Models that fail when a tool is attached; search is switched off for them
    #[serde(default = "default_no_tool_models")]
    pub no_tool_models: Vec<String>,
    /// Entries served by `GET /models`
    #[serde(default = "default_catalog")]
    pub catalog: Vec<ModelInfo>,
}

impl ModelSettings {
    pub fn is_allowed(&self, model: &str) -> bool {
        self.allowed.iter().any(|m| m == model)
    }

    pub fn accepts_tools(&self, model: &str) -> bool {
        !self.no_tool_models.iter().any(|m| m == model)
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            allowed: default_allowed_models(),
            no_tool_models: default_no_tool_models(),
            catalog: default_catalog(),
        }
    }
}

/// A model offered to clients
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub provider: LlmProviderType,
    pub supports_search: bool,
    pub best_for: String,
    pub speed: String,
}

impl ModelInfo {
    fn new(
        id: &str,
        provider: LlmProviderType,
        supports_search: bool,
        best_for: &str,
        speed: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            provider,
            supports_search,
            best_for: best_for.to_string(),
            speed: speed.to_string(),
        }
    }
}

fn default_allowed_models() -> Vec<String> {
    [
        "llama3-70b-8192",
        "groq/compound-mini",
        "llama-3.3-70b-versatile",
        "gemini-2.0-flash",
        "gemini-2.5-pro",
        "openai/gpt-oss-120b",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_no_tool_models() -> Vec<String> {
    vec!["groq/compound-mini".to_string()]
}

fn default_catalog() -> Vec<ModelInfo> {
    use LlmProviderType::{Gemini, Groq};

    vec![
        ModelInfo::new("llama-3.3-70b-versatile", Groq, true, "General use", "Very fast"),
        ModelInfo::new("groq/compound-mini", Groq, false, "Speed", "Ultra fast"),
        ModelInfo::new("openai/gpt-oss-120b", Groq, true, "Quality", "Fast"),
        ModelInfo::new("llama3-70b-8192", Groq, true, "General use", "Very fast"),
        ModelInfo::new("gemini-2.0-flash", Gemini, true, "Balance", "Medium"),
        ModelInfo::new("gemini-2.5-pro", Gemini, true, "Research", "Slow"),
    ]
}

/// Endpoint and sampling overrides shared by all providers
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groq_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ProviderSettings {
    /// Configured base URL overrides, per provider
    pub fn base_urls(&self) -> Vec<(LlmProviderType, &str)> {
        [
            (LlmProviderType::Groq, &self.groq_base_url),
            (LlmProviderType::OpenAI, &self.openai_base_url),
            (LlmProviderType::Gemini, &self.gemini_base_url),
        ]
        .into_iter()
        .filter_map(|(provider, url)| url.as_deref().map(|url| (provider, url)))
        .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrchestrationSettings {
    #[serde(default = "default_stage_timeout")]
    pub stage_timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub parallel_debate: bool,
    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: u32,
}

impl OrchestrationSettings {
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_seconds)
    }
}

impl Default for OrchestrationSettings {
    fn default() -> Self {
        Self {
            stage_timeout_seconds: default_stage_timeout(),
            parallel_debate: true,
            max_tool_iterations: default_max_tool_iterations(),
        }
    }
}

fn default_stage_timeout() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

fn default_max_tool_iterations() -> u32 {
    DEFAULT_MAX_TOOL_ITERATIONS
}

impl Settings {
    /// Load settings from a config file (optional) and the environment
    pub fn load(config_path: &Path) -> Result<Self, anyhow::Error> {
        Self::build(config_path)?.validated()
    }

    /// Create settings from CLI arguments (config file, env vars, then CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::build(&cli.config)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.validated()
    }

    fn build(config_path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9999)?
            .add_source(File::from(config_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("models.allowed")
                    .with_list_parse_key("models.no_tool_models"),
            )
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(seconds) = cli.stage_timeout {
            self.orchestration.stage_timeout_seconds = seconds;
        }
    }

    fn validated(self) -> Result<Self, anyhow::Error> {
        validator::ConfigValidator::validate(&self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;
        Ok(self)
    }
}
