use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use weekly_payments::config::AppConfig;
use weekly_payments::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr;

    let state = initialize_backend(config).await?;
    let app = create_router(state)?;

    info!("🚀 Weekly payments server listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
