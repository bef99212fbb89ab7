pub mod api;
pub mod config;
pub mod core_state;
pub mod export;
pub mod models;
pub mod pipeline;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::ApiContext;
use crate::core_state::CoreState;
use crate::pipeline::extraction::{GeminiClient, InvoiceExtractor};

/// Start the service: tracing, configuration, shared state, API server.
/// Runs until interrupted.
pub async fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = config::Config::from_env();
    if cfg.api_key.is_none() {
        tracing::warn!(
            "{} is not set — extraction requests will fail until it is configured",
            config::API_KEY_VAR
        );
    }

    let core = Arc::new(CoreState::new());
    let client = GeminiClient::new(cfg.api_key.clone(), cfg.model.clone());
    let extractor = Arc::new(InvoiceExtractor::new(Arc::new(client)));
    let ctx = ApiContext::new(core, extractor);

    let mut server = api::start_server(ctx, cfg.bind)
        .await
        .expect("error while starting TxInvoice");

    tracing::info!(addr = %server.addr, model = %cfg.model, "TxInvoice ready");

    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for shutdown signal");
    tracing::info!("Shutdown requested");
    server.shutdown();
}
