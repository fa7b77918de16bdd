//! Functor Engine server binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`functor-config.yaml` plus environment overrides)
//! 2. Initialize structured logging (tracing)
//! 3. Create the graph service with an empty world
//! 4. Build the engine if a language model credential is configured
//! 5. Serve HTTP until `Ctrl-C`, then shut the graph service down

use std::sync::Arc;

use anyhow::Context;
use functor_engine::{FunctorConfig, FunctorEngine};
use functor_graph::GraphService;
use functor_server::{AppState, ServerConfig, start_server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, config_path) = FunctorConfig::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("functor-server starting");
    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("No configuration file found, using defaults"),
    }

    let graph = Arc::new(GraphService::create());

    let engine = match FunctorEngine::from_config(Arc::clone(&graph), &config.llm) {
        Ok(engine) => Some(Arc::new(engine)),
        Err(e) => {
            warn!(
                error = %e,
                "Engine not initialized; world rebuilds and translation will return 503"
            );
            None
        }
    };

    let state = Arc::new(AppState::new(Arc::clone(&graph), engine));
    let server_config = ServerConfig::from(&config.server);

    start_server(&server_config, state, shutdown_signal())
        .await
        .context("server failed")?;

    graph.shutdown().await;
    info!("functor-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
