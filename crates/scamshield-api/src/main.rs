mod coach;
mod config;
mod error;
mod model;
mod prompts;
mod server;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use scamshield_classifier::ArtifactBundle;
use scamshield_common::generation::Generator;
use scamshield_common::openai::{GenerationClient, GenerationConfig};

use coach::CoachService;
use config::Config;
use error::AppError;
use server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("starting scamshield api");

    let config = Config::from_env()?;
    let generation_config = GenerationConfig::from_env().map_err(AppError::from)?;
    info!(
        base_url = %generation_config.base_url,
        model = %generation_config.model,
        timeout_ms = generation_config.default_timeout.as_millis(),
        "generation client configured"
    );

    let bundle = ArtifactBundle::load(&config.bundle_path, config.bundle_sha256.as_deref())
        .map_err(AppError::from)?;

    let generator: Arc<dyn Generator> =
        Arc::new(GenerationClient::new(generation_config).map_err(AppError::from)?);
    let state = AppState {
        bundle: Arc::new(bundle),
        coach: CoachService::new(generator),
    };

    let app = build_router(state, config.cors_origin.clone());
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        cors_origin = ?config.cors_origin,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
