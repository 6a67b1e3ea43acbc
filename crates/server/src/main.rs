use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qbank_core::{
    create_prober, load_config, validate_config, DirectoryTarget, PrintTarget, ProberBackend,
    Session,
};
use qbank_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("QBANK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    match config.prober.backend {
        ProberBackend::Http => info!(
            "Probing assets over HTTP at {} ({:?}, {}ms budget)",
            config.assets.base_url, config.prober.method, config.prober.timeout_ms
        ),
        ProberBackend::Filesystem => info!(
            "Probing assets on disk at {:?} ({}ms budget)",
            config.assets.root_dir, config.prober.timeout_ms
        ),
    }

    // Create prober and session
    let prober = create_prober(&config).context("Failed to create asset prober")?;
    info!(
        "Using {} prober, at most {} probes in flight",
        prober.name(),
        config.prober.max_concurrent_probes
    );
    let session = Session::from_config(&config, prober);

    // Print target if configured
    let print_target: Option<Arc<dyn PrintTarget>> = match &config.print.output_dir {
        Some(dir) => {
            info!("Print documents will be written to {:?}", dir);
            let mut target = DirectoryTarget::new(dir);
            // Files opened from disk read images straight from the local tree.
            if let Some(base) = config.assets.file_base() {
                target = target.with_asset_base(base);
            }
            Some(Arc::new(target))
        }
        None => {
            info!("No print directory configured, documents are returned inline only");
            None
        }
    };

    if let Some(root) = &config.assets.root_dir {
        info!("Serving assets from {:?}", root);
    }

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), session, print_target));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
}
