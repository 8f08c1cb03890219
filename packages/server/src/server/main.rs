// Main entry point for the intake bot server

use anyhow::{Context, Result};
use intake_core::{server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,intake_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting clan application bot");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        admin_chat_id = config.admin_chat_id,
        cooldown_hours = config.cooldown_hours,
        default_language = %config.default_language,
        "Configuration loaded"
    );

    // Build application
    let (app, _engine, telegram) = build_app(&config)?;

    // Register the webhook when we know our public address
    match config.webhook_url() {
        Some(url) => telegram
            .set_webhook(&url, config.webhook_secret.as_deref())
            .await
            .context("Failed to register webhook")?,
        None => tracing::warn!("PUBLIC_URL not set, webhook registration skipped"),
    }

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Webhook path: {}", config.webhook_path);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
