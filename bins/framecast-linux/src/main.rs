use std::sync::Arc;
use std::time::Duration;

use framecast_core::CameraPlatform;
use framecast_providers::{run_poller, MetricsClient, PatternCamera, SimulatedGasSensor};
use framecast_server::ServiceConfig;
use framecast_web::{control_router, stream_router, ServerState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,framecast_server=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("framecast starting...");

    let config = config_from_env()?;

    // Hardware camera drivers are injected here in a real deployment; the
    // pattern camera keeps the full pipeline exercisable without one.
    let platform: Arc<dyn CameraPlatform> = if std::env::var("FRAMECAST_RAW_CAPTURE").is_ok() {
        // Raw frames: every frame goes through the software encoder.
        Arc::new(PatternCamera::rgb(640, 480))
    } else {
        Arc::new(PatternCamera::jpeg(640, 480, config.jpeg_quality))
    };

    let state = ServerState::new(platform, config.clone());

    let control_listener = tokio::net::TcpListener::bind(config.control_addr).await?;
    let stream_listener = tokio::net::TcpListener::bind(config.stream_addr).await?;

    tracing::info!("Starting web server on port {}", config.control_addr.port());
    let control_handle = tokio::spawn({
        let state = state.clone();
        async move {
            if let Err(e) = axum::serve(control_listener, control_router(state)).await {
                tracing::error!("control server error: {e}");
            }
        }
    });

    tracing::info!("Starting stream server on port {}", config.stream_addr.port());
    let stream_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(stream_listener, stream_router(state)).await {
            tracing::error!("stream server error: {e}");
        }
    });

    // Optional air-quality poller pushing readings to a metrics endpoint.
    if let Ok(endpoint) = std::env::var("FRAMECAST_METRICS_URL") {
        tracing::info!("pushing sensor readings to {endpoint}");
        let sensor = SimulatedGasSensor::new(125, 420);
        let client = MetricsClient::new(endpoint);
        tokio::spawn(run_poller(sensor, client, Duration::from_secs(5)));
    }

    tracing::info!("framecast ready");
    tracing::info!(
        "   index:   http://localhost:{}/",
        config.control_addr.port()
    );
    tracing::info!(
        "   capture: http://localhost:{}/capture",
        config.control_addr.port()
    );
    tracing::info!(
        "   stream:  http://localhost:{}/stream",
        config.stream_addr.port()
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = control_handle => {
            tracing::warn!("control server stopped");
        }
        _ = stream_handle => {
            tracing::warn!("stream server stopped");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Build the service configuration from environment overrides.
fn config_from_env() -> anyhow::Result<ServiceConfig> {
    let mut config = ServiceConfig::default();

    if let Ok(addr) = std::env::var("FRAMECAST_CONTROL_ADDR") {
        config.control_addr = addr.parse()?;
        // Keep the stream listener on the next port unless overridden below.
        let mut stream_addr = config.control_addr;
        stream_addr.set_port(config.control_addr.port() + 1);
        config.stream_addr = stream_addr;
    }
    if let Ok(addr) = std::env::var("FRAMECAST_STREAM_ADDR") {
        config.stream_addr = addr.parse()?;
    }
    if let Ok(path) = std::env::var("FRAMECAST_SNAPSHOT_PATH") {
        config.snapshot_path = path.into();
    }

    Ok(config)
}
