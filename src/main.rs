use std::net::SocketAddr;
use std::time::Duration;

use payment_hub::{
    api::create_router,
    api::middleware::logging::init_tracing,
    config::Config,
    error::expose_internal_details,
    services::PaymentService,
    AppState,
};

const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_tracing(&config.logging.level, config.server.environment);

    tracing::info!("Starting Payment Hub v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(environment = ?config.server.environment, "Configuration loaded successfully");

    expose_internal_details(config.server.environment.is_development());

    // Build the provider registry
    let payment_service = PaymentService::from_config(&config)?;

    if payment_service.available_providers().is_empty() {
        tracing::warn!("No payment providers available; check RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid HOST/PORT: {}", e))?;

    let state = AppState::new(config, payment_service);

    let limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            limiter.cleanup();
        }
    });

    // Create router
    let app = create_router(state);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Health check: http://{}/api/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Payment Hub is ready to accept connections");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
