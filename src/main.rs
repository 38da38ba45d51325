use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clickmap::api;
use clickmap::config::Config;
use clickmap::metrics::MetricsPipeline;
use clickmap::upstream::HttpGateway;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clickmap=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    let gateway = Arc::new(HttpGateway::from_config(&config.upstream)?);
    let pipeline = Arc::new(MetricsPipeline::from_config(gateway, &config));
    info!(
        "Upstream API: {} (timeout {}s, window {} days)",
        config.upstream.base_url, config.upstream.timeout_secs, config.metrics.window_days
    );

    let api_router = api::create_api_router(pipeline, &config.api_version);

    let api_addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("🚀 API version {} listening on http://{}", config.api_version, api_addr);
    info!(
        "   - Click metrics available at http://{}/api/{}/get-clicks",
        api_addr, config.api_version
    );

    axum::serve(api_listener, api_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Caught Ctrl+C, shutting down"),
        _ = terminate => info!("Caught SIGTERM, shutting down"),
    }
}
