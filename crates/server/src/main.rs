mod config;
mod form;
mod render;
mod routes;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use patrimoine_core::providers::registry::ProviderRegistry;
use patrimoine_core::Dashboard;

use config::ServerArgs;
use routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let args = ServerArgs::parse();
    config::init_tracing(args.log_json);

    let settings = args.settings()?;
    let store = args.build_store()?;
    let registry = ProviderRegistry::new_with_defaults();

    info!(
        store = store.name(),
        quote_providers = ?registry.quote_provider_names(),
        fx_providers = ?registry.fx_provider_names(),
        cache_ttl_secs = settings.cache_ttl.as_secs(),
        "starting dashboard"
    );

    let dashboard = Dashboard::new(store, registry, settings);
    let app = routes::router(AppState::new(dashboard));

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!(url = %format!("http://{}", args.bind), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
