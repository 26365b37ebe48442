use axum::{extract::Request, ServiceExt};
use server_http::{build_app, AppState};
use shared::config::Config;
use stash::users::{seed_users, SledUserRepository};
use std::path::Path;
use std::sync::Arc;
use storage_engine::StorageFactory;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[tokio::main]
async fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Stash HTTP Server...");

    // Load environment variables from .env file (if exists)
    match dotenvy::dotenv() {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    if let Err(e) = run().await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }

    #[cfg(feature = "dhat-heap")]
    {
        info!("Writing dhat profiling data...");
        drop(_profiler);
        info!("Profiling data written to dhat-heap.json");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    info!("Initializing {:?} cache store...", config.cache_store);
    let store = StorageFactory::from_config(&config).await?;

    let data_dir = Path::new(&config.data_dir);
    if let Err(e) = std::fs::create_dir_all(data_dir) {
        warn!("Failed to create data directory {}: {}", data_dir.display(), e);
    }
    let user_repo = Arc::new(SledUserRepository::new(data_dir.join("users.sled"))?);

    if config.seed_users > 0 {
        seed_users(user_repo.as_ref(), config.seed_users).await?;
    }

    let state = AppState::from_parts(&config, store, user_repo)?;
    info!(
        "User cache: enabled={}, ttl={}, decode fallback={:?}",
        config.user_cache_enabled, config.user_cache_ttl, config.decode_fallback
    );

    let app = build_app(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP Server listening on http://{}", addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

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
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}
