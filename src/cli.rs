use clap::Parser;
use std::path::PathBuf;

/// Agora chat backend: one agent, a research pipeline, or a debate
#[derive(Parser, Debug, Clone)]
#[command(name = "agora", version, about, long_about = None)]
pub struct Cli {
    /// Settings file; missing files fall back to defaults
    #[arg(short, long, env = "AGORA_CONFIG", default_value = "agora.toml")]
    pub config: PathBuf,

    /// Bind address, overrides `server.host`
    #[arg(long, env = "AGORA_HOST")]
    pub host: Option<String>,

    /// Bind port, overrides `server.port`
    #[arg(long, env = "AGORA_PORT")]
    pub port: Option<u16>,

    /// Per-stage deadline in seconds, overrides `orchestration.stage_timeout_seconds`
    #[arg(long, env = "AGORA_STAGE_TIMEOUT", value_name = "SECONDS")]
    pub stage_timeout: Option<u64>,

    /// Validate settings, print them as JSON and exit
    #[arg(long)]
    pub check_config: bool,
}
