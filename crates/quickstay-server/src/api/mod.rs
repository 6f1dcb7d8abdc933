//! HTTP surface: router assembly, service routes and the server loop

pub mod response;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tracing::info;

use crate::config::{Backend, Config};
use crate::db;
use crate::error::AppError;
use crate::features::{
    self,
    listings::{InMemoryListingRepository, PgListingRepository, SharedListingRepository},
    uploads::UploadPolicy,
    FeatureState,
};
use crate::middleware::{self, auth::ApiAuth, rate_limit};
use crate::storage::{config::StorageConfig, InMemoryObjectStore, SharedObjectStore, Storage};
use response::ApiResponse;

/// Build repositories, bind and serve until a shutdown signal arrives.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let (listings, objects) = build_backends(&config).await?;

    let state = FeatureState {
        listings,
        objects,
        uploads: UploadPolicy::from(&config.uploads),
        auth: ApiAuth::from(&config.auth),
    };

    let app = create_router(state, &config);
    let app = rate_limit::apply(app, &config.rate_limit)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(());
    })
    .into_future();

    let grace = Duration::from_secs(config.server.shutdown_timeout_secs);
    let drain_deadline = async move {
        match signalled_rx.await {
            Ok(()) => tokio::time::sleep(grace).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = server => {
            result?;
            info!("Server shut down gracefully");
        },
        _ = drain_deadline => {
            tracing::warn!(
                timeout_secs = config.server.shutdown_timeout_secs,
                "Open connections did not finish in time, shutting down"
            );
        },
    }

    Ok(())
}

async fn build_backends(
    config: &Config,
) -> anyhow::Result<(SharedListingRepository, SharedObjectStore)> {
    match config.server.backend {
        Backend::Postgres => {
            let pool = db::create_pool(&config.database).await?;
            db::run_migrations(&pool).await?;

            let listings: SharedListingRepository = Arc::new(PgListingRepository::new(pool));
            let storage = Storage::new(StorageConfig::from_env()?)?;
            info!(bucket = storage.bucket(), "Object storage ready");
            let objects: SharedObjectStore = Arc::new(storage);

            Ok((listings, objects))
        },
        Backend::Memory => {
            tracing::warn!("Using in-memory backend, data is lost on restart");
            let listings: SharedListingRepository = Arc::new(InMemoryListingRepository::new());
            let objects: SharedObjectStore = Arc::new(InMemoryObjectStore::default());

            Ok((listings, objects))
        },
    }
}

/// Create the application router with all routes and middleware
///
/// Rate limiting is not part of this router; [`serve`] adds it because it
/// needs the peer address from connect info.
pub fn create_router(state: FeatureState, config: &Config) -> Router {
    let feature_routes = features::router(state.clone());

    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state.listings)
        .nest("/api/v1", feature_routes)
        .fallback(not_found);

    if !config.server.environment.is_production() {
        router = router.layer(axum::middleware::map_response(
            middleware::expose_error_detail,
        ));
    }

    // Apply layers from innermost to outermost
    router
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

async fn root() -> Response {
    ApiResponse::success(
        "QuickStay API",
        json!({
            "name": "QuickStay API",
            "version": env!("CARGO_PKG_VERSION"),
            "status": "running"
        }),
    )
    .into_response()
}

async fn health(State(listings): State<SharedListingRepository>) -> Response {
    match listings.ping().await {
        Ok(()) => ApiResponse::success(
            "Service healthy",
            json!({ "status": "healthy", "database": "connected" }),
        )
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            ApiResponse::failure(
                "Service unavailable",
                json!({ "status": "unhealthy", "database": "unreachable" }),
            )
            .with_status(StatusCode::SERVICE_UNAVAILABLE)
        },
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
