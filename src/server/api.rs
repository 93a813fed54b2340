use crate::server::AppState;
use crate::services::StatsDocument;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use tracing::debug;

/// GET /crypto/stats/{symbol} - min/max price and oldest/newest timestamp
/// for one symbol
///
/// Returns `{}` when the symbol is unknown or has no samples.
pub async fn stats_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
) -> Json<StatsDocument> {
    debug!(%symbol, "stats request");
    Json(app_state.query.stats(&symbol))
}

/// GET /crypto/top - all symbols sorted by normalized range, most volatile
/// first
pub async fn top_symbols_handler(State(app_state): State<AppState>) -> Json<Vec<String>> {
    Json(app_state.query.top_symbols())
}

/// GET /crypto/highest-range/{date} - the most volatile symbol with a sample
/// at exactly `date` (epoch seconds)
///
/// Plain text body: a symbol, or "No data available". A non-integer date is
/// rejected by the extractor with 400.
pub async fn highest_range_handler(
    State(app_state): State<AppState>,
    Path(date): Path<i64>,
) -> String {
    debug!(date, "highest-range request");
    app_state.query.highest_range_on_date(date)
}

/// Health/readiness snapshot of the loaded data set
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub symbols: usize,
    pub samples: usize,
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub uptime_secs: u64,
}

/// GET /health - load outcome and uptime
pub async fn health_handler(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let health = &app_state.health;
    Json(HealthResponse {
        status: "ok".to_string(),
        symbols: health.symbols,
        samples: health.samples,
        sources_ok: health.report.sources_ok,
        sources_failed: health.report.sources_failed,
        uptime_secs: health.started_at.elapsed().as_secs(),
    })
}
