pub mod api;

use crate::services::{LoadReport, QueryService};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

/// Store snapshot taken right after loading, served by `/health`.
/// The store never changes afterwards, so the numbers are fixed for the
/// process lifetime.
#[derive(Debug)]
pub struct HealthState {
    pub symbols: usize,
    pub samples: usize,
    pub report: LoadReport,
    pub started_at: Instant,
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub query: Arc<QueryService>,
    pub health: Arc<HealthState>,
}

/// Start the axum server
pub async fn serve(
    query: Arc<QueryService>,
    health: Arc<HealthState>,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting cryptorec server");

    let app_state = AppState { query, health };

    // Read-only public API: any origin may GET
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    tracing::info!("Registering routes:");
    tracing::info!("  GET /crypto/stats/{{symbol}}");
    tracing::info!("  GET /crypto/top");
    tracing::info!("  GET /crypto/highest-range/{{date}}");
    tracing::info!("  GET /health");

    let app = Router::new()
        .route("/crypto/stats/{symbol}", get(api::stats_handler))
        .route("/crypto/top", get(api::top_symbols_handler))
        .route("/crypto/highest-range/{date}", get(api::highest_range_handler))
        .route("/health", get(api::health_handler))
        .layer(cors)
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
