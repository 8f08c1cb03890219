//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use telegram::{TelegramOptions, TelegramService};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::common::Texts;
use crate::config::Config;
use crate::domains::intake::{IntakeEngine, APPLICATION_FORM};
use crate::kernel::{ServerDeps, TelegramAdapter};
use crate::server::routes::{health_handler, webhook_handler};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub engine: Arc<IntakeEngine>,
    pub webhook_secret: Option<String>,
}

/// Router with the health probes and the webhook receiver at `webhook_path`.
pub fn build_router(
    engine: Arc<IntakeEngine>,
    webhook_path: &str,
    webhook_secret: Option<String>,
) -> Router {
    let app_state = AxumAppState {
        engine,
        webhook_secret,
    };

    // GET routes answer HEAD as well. No request timeout layer: the webhook
    // future must not be dropped between delivering a report and recording it.
    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .route(webhook_path, post(webhook_handler))
        .layer(Extension(app_state))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Wire the production dependencies: Bot API client, in-memory stores,
/// bundled texts.
pub fn build_app(config: &Config) -> Result<(Router, Arc<IntakeEngine>, Arc<TelegramService>)> {
    let texts = Texts::bundled(&config.default_language)
        .context("DEFAULT_LANGUAGE must name a bundled language")?;

    let telegram = Arc::new(
        TelegramService::new(TelegramOptions {
            api_url: config.telegram_api_url.clone(),
            ..TelegramOptions::new(config.bot_token.clone())
        })
        .context("Failed to build Bot API client")?,
    );

    let server_deps = ServerDeps::in_memory(
        Arc::new(TelegramAdapter::new(telegram.clone())),
        Arc::new(texts),
        config.intake_settings()?,
    );
    let engine = Arc::new(IntakeEngine::new(server_deps, APPLICATION_FORM));

    let app = build_router(
        engine.clone(),
        &config.webhook_path,
        config.webhook_secret.clone(),
    );

    Ok((app, engine, telegram))
}
