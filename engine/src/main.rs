use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bidding_engine::{
    config::Config,
    redis_client::RedisCoefficientStore,
    routes::build_router,
    storage::{CoefficientStore, InMemoryCoefficientStore},
    BiddingEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bidding_engine=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load();
    info!("Loaded configuration: {:?}", config);

    // Initialize coefficient store
    let store: Arc<dyn CoefficientStore> = match &config.coefficients_file {
        Some(path) => {
            warn!("Serving coefficients from {} instead of Redis", path.display());
            Arc::new(InMemoryCoefficientStore::from_json_file(path)?)
        }
        None => Arc::new(RedisCoefficientStore::new(&config.redis_url, config.store_timeout).await?),
    };
    let engine = Arc::new(BiddingEngine::new(store));

    // Initialize metrics exporter
    let metrics_addr: SocketAddr = config.metrics_addr.parse()?;
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()?;

    let app = build_router(engine);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    info!("Starting bidding engine on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, starting graceful shutdown");
}
