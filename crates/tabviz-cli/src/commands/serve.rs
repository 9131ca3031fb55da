//! Serve command implementation.

use crate::cli::ServeArgs;
use crate::config::AppConfig;
use crate::error::Result;
use crate::runtime::build_store;
use crate::server::{serve, AppState};
use std::sync::Arc;
use tracing::info;

/// Execute the serve command.
pub async fn execute_serve(args: ServeArgs, mut config: AppConfig) -> Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.server.bind_port = port;
    }

    let store = Arc::new(build_store(&config)?);
    info!(
        "Starting tabviz server ({} exemplars, advisor {})",
        store.len(),
        if config.ollama.advisor_enabled { "enabled" } else { "disabled" }
    );

    let state = AppState::from_config(&config, store);
    serve(state, &config.bind_addr()).await
}
