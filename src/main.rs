//! catalog-sync server
//!
//! Hosts the cascade engine behind a small HTTP API. Events are posted by the
//! source-catalog hook; the returned notifications are handed to the bus by
//! the caller.

use catalog_sync::config::{load_seed_tables, Settings};
use catalog_sync::routes::create_router;
use catalog_sync::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("🚀 Starting catalog-sync...");

    let settings = Settings::load()?;
    info!(
        "📋 Configuration loaded (cluster: {}, naming: {:?}, audit: {})",
        settings.sync.cluster_name, settings.sync.naming_style, settings.sync.audit_enabled
    );

    let state = match &settings.sync.seed_path {
        Some(path) => {
            let tables = load_seed_tables(path)?;
            info!("✅ Seeded live catalog with {} tables from {}", tables.len(), path.display());
            AppState::with_tables(settings.sync.clone(), tables)
        }
        None => {
            warn!("⚠️  CATALOG_SEED_PATH not set, live catalog starts empty");
            AppState::new(settings.sync.clone())
        }
    };

    let app = create_router(Arc::new(state), &settings);

    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   GET    /health                                - Health check");
    info!("   POST   /api/events                            - Process a schema event");
    info!("   PUT    /api/catalog/tables                    - Register a live table");
    info!("   GET    /api/catalog/tables/{{database}}/{{table}} - Fetch a live table");
    info!("   DELETE /api/catalog/tables/{{database}}/{{table}} - Remove a live table");
    info!("   GET    /api/known-objects                     - List known qualified names");
    info!("");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,catalog_sync=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
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
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
