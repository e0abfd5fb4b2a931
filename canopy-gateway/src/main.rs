use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, extract::State, routing::get};
use canopy_core::DeviceUid;
use canopy_gateway::{
    CloudConfig, CloudTransport, CommandProcessor, Config, DeviceRegistry, GatewayState,
    MockCloud, Scheduler, StateSnapshot, TcpCloudLink, TwinSynchronizer, default_fleet,
    run_inbound_dispatch,
};
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "canopy-gateway")]
#[command(about = "Canopy Gateway")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "canopy-gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tracing=info,canopy_gateway=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install crypto provider");

    let gateway_id = DeviceUid::from(config.gateway.unique_id.as_str());
    let devices = config.devices.clone().unwrap_or_else(default_fleet);
    let registry = Arc::new(DeviceRegistry::new(gateway_id.clone(), devices));

    info!(
        gateway_id = %gateway_id,
        device_count = registry.len(),
        http_addr = %config.server.http_addr,
        "Starting canopy-gateway"
    );

    match config.cloud.clone() {
        CloudConfig::Mock => {
            info!("Using mock cloud transport");
            let transport = MockCloud::new();
            run_gateway(config, transport, registry).await?;
        }
        CloudConfig::Tcp { addr, tls } => {
            // Missing credential material is the only fatal error class:
            // report and exit before the loop ever starts.
            for path in tls.credential_paths() {
                if !path.is_file() {
                    color_eyre::eyre::bail!("missing credential file: {}", path.display());
                }
            }

            info!(%addr, domain = %tls.domain, "Using TCP cloud transport");
            let transport = TcpCloudLink::new(addr, tls, gateway_id);
            run_gateway(config, transport, registry).await?;
        }
    }

    Ok(())
}

async fn run_gateway<T: CloudTransport>(
    config: Config,
    transport: T,
    registry: Arc<DeviceRegistry>,
) -> color_eyre::Result<()> {
    let cancel = CancellationToken::new();
    let state = GatewayState::new();
    let transport = Arc::new(transport);

    // Transport bracket: acquired once here, released exactly once after
    // both loops have exited.
    let inbound_rx = transport.start(cancel.clone()).await?;

    let scheduler = Scheduler::new(
        Duration::from_secs(config.gateway.upload_interval_secs),
        Duration::from_secs(config.gateway.retry_backoff_secs),
    );

    let scheduler_handle = {
        let transport = Arc::clone(&transport);
        let registry = Arc::clone(&registry);
        let state = state.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            scheduler
                .run(transport.as_ref(), registry.as_ref(), &state, cancel)
                .await;
        })
    };

    let dispatch_handle = {
        let transport = Arc::clone(&transport);
        let processor = CommandProcessor::new(Arc::clone(&registry));
        let state = state.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            run_inbound_dispatch(
                inbound_rx,
                processor,
                TwinSynchronizer,
                transport.as_ref(),
                state,
                cancel,
            )
            .await;
        })
    };

    // HTTP server
    let http_addr = config.server.http_addr;
    let axum_app = Router::new()
        .route("/health", get(health_handler))
        .route("/state", get(state_handler))
        .with_state(state.clone());
    let axum_listener = TcpListener::bind(http_addr).await?;
    info!(%http_addr, "HTTP server listening");

    let cancel_for_http = cancel.clone();

    tokio::select! {
        result = axum::serve(axum_listener, axum_app).with_graceful_shutdown(async move {
            cancel_for_http.cancelled().await;
        }) => {
            if let Err(e) = result {
                error!(error = ?e, "HTTP server error");
            }
            info!("HTTP server shut down");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            cancel.cancel();
        }
    }

    // Wait for background tasks to complete before releasing the transport
    let _ = scheduler_handle.await;
    let _ = dispatch_handle.await;

    if let Err(e) = transport.close().await {
        error!(error = %e, "failed to release transport");
    }

    info!("canopy-gateway shut down complete");
    Ok(())
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn state_handler(State(state): State<GatewayState>) -> Json<StateSnapshot> {
    Json(state.snapshot().await)
}
