use anyhow::{Context, Result};
use edu_vision::{config::Config, server};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when variables come from the environment)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("edu_vision=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!("Starting EduVision server");

    let config = Config::from_env()?;
    let state = Arc::new(server::AppState::new(&config)?);
    let app = server::router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
