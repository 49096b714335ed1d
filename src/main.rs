use agora::adapters::AppState;
use agora::cli::Cli;
use agora::config::Settings;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Parse CLI and load configuration
    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    if cli.check_config {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!(
        "Starting Agora on {}:{} ({} models allowed)",
        host,
        port,
        settings.models.allowed.len()
    );

    let app = agora::create_app(AppState::from_settings(&settings));

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
