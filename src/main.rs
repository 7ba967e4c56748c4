use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};

use mood_tracker_api::{
    config::{Config, StoreConfig},
    db::{Database, InMemoryMoodStore, MoodStore},
    identity::PlaceholderOwnerResolver,
    middleware::init_tracing,
    routes::create_router,
    state::AppState,
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => {
            info!(
                production = config.environment.is_production(),
                "Configuration loaded successfully"
            );
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let store = match open_store(config.store.clone()).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open mood store: {}", e);
            std::process::exit(1);
        }
    };

    let owners = Arc::new(PlaceholderOwnerResolver::new(config.default_owner_id.clone()));
    let app = create_router(AppState::new(store.clone(), owners), &config.http);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server listening on {}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            store.close().await;
            std::process::exit(1);
        }
    };

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // The store outlives every request; release it only once serving has stopped
    store.close().await;

    if let Err(e) = served {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Connect the configured backend and prepare it for traffic
async fn open_store(store: StoreConfig) -> Result<Arc<dyn MoodStore>, mood_tracker_api::ApiError> {
    match store {
        StoreConfig::Postgres(database_config) => {
            let database = Database::new(database_config).await?;
            info!("Database connection established");

            database.migrate().await?;
            Ok(Arc::new(database))
        }
        StoreConfig::Memory => {
            info!("Using in-memory mood store; entries will not survive a restart");
            Ok(Arc::new(InMemoryMoodStore::new()))
        }
    }
}

/// Graceful shutdown signal handler
/// Listens for SIGTERM and SIGINT signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        },
    }
}
