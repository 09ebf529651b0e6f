//! Receiver service binary.

use std::net::SocketAddr;

use tracing::{error, info};

use stepguide_api::{create_receiver_router, logging, metrics, ReceiverConfig, ReceiverState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    logging::init_tracing();

    info!("Starting stepguide-receiver");

    let config = ReceiverConfig::from_env();
    info!(
        "Receiver config: host={}, port={}, store={} ({})",
        config.host,
        config.port,
        config.store_path.display(),
        config.store_mode
    );

    let state = match ReceiverState::new(config.clone()).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to open guide store: {}", e);
            std::process::exit(1);
        }
    };

    let metrics_enabled = std::env::var("METRICS_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);
    let metrics_handle = metrics_enabled.then(metrics::init_metrics);

    let app = create_receiver_router(state, metrics_handle);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid bind address");

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C handler");
            info!("Received shutdown signal");
        })
        .await
        .expect("Server error");

    info!("Server shutdown complete");
}
