use anyhow::Context;

use inbox_agent::api::{AppState, inbox_routes};
use inbox_agent::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let state = AppState::from_config(&config).context("Failed to initialize inbox agent")?;

    eprintln!("📬 Inbox Agent v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Identity: {}", config.identity);
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   Messages: {}", state.messages.read().await.len());
    eprintln!("   API: http://0.0.0.0:{}/api/emails", config.port);

    let app = inbox_routes(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Inbox Agent server started");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
