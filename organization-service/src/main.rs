use organization_service::{
    build_router,
    config::{OrgConfig, StoreBackend},
    services::{IdentityStore, InMemoryStore, JwtService, MongoDb, OrganizationStore},
    AppState,
};
use service_core::error::AppError;
use service_core::observability::logging::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = OrgConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        store = ?config.store,
        "Starting organization service"
    );

    let (identities, organizations): (Arc<dyn IdentityStore>, Arc<dyn OrganizationStore>) =
        match config.store {
            StoreBackend::Mongodb => {
                let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
                db.initialize_indexes().await?;
                tracing::info!("Database initialized successfully");
                (Arc::new(db.clone()), Arc::new(db))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                let store = InMemoryStore::new();
                (Arc::new(store.clone()), Arc::new(store))
            }
        };

    let jwt = JwtService::new(&config.jwt)
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

    let state = AppState::new(config.clone(), jwt, identities, organizations);
    let app = build_router(state).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));

    let service_span = tracing::info_span!(
        "service",
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
    );
    let _guard = service_span.enter();

    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    service_core::axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Duration::from_secs(
            config.common.shutdown_grace_seconds,
        )))
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal(grace: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    // The listener keeps accepting for the grace period; draining starts after.
    tokio::time::sleep(grace).await;
}
