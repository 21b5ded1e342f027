mod error;
mod routes;

use crate::config::Config;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use crate::rest::error::Error;
use crate::rest::routes::ServerState;

const UPLOAD_BODY_LIMIT: usize = 64 * 1024 * 1024;

pub fn router(config: Arc<Config>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_route = Router::new()
        .route("/upload_csv", post(routes::upload_csv))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/busiest_slots", get(routes::busiest_slots))
        .route("/delay_stats", get(routes::delay_stats))
        .route("/top_cascade_flights", get(routes::top_cascade_flights))
        .route("/search_flights", get(routes::search_flights))
        .route("/optimize_schedule", post(routes::optimize_schedule))
        .merge(upload_route)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ServerState { config })
}

/// Serves the HTTP API until Ctrl-C is received.
pub async fn serve(config: Config) -> Result<(), Error> {
    let addr = config.addr;
    let router = router(Arc::new(config));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|cause| Error::IO {
            message: format!("Failed to listen on {addr}"),
            cause,
        })?;
    match listener.local_addr() {
        Ok(local) => info!("starting REST server: {local}"),
        Err(e) => error!("failed to resolve listening address: {e}"),
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|cause| Error::IO {
            message: "REST server terminated".to_string(),
            cause,
        })?;
    info!("REST server has been shut down.");
    Ok(())
}

/// Resolves on Ctrl-C, which starts axum's graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("starting graceful shutdown for REST server...");
}
