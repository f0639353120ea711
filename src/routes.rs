use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    history::{HistoricalRow, HistoricalStore},
    live::{
        cache::{fetch_or_refresh, SnapshotMap},
        format::format_departures,
        transportapi::TransportApiClient,
        types::DepartureRecord,
    },
    stations::{Station, StationRegistry},
    trend::{compare_event_days, moving_average, DelayComparison, SMOOTHING_WINDOW},
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub stations: Arc<StationRegistry>,
    pub live_client: Arc<TransportApiClient>,
    pub cache: Arc<Mutex<SnapshotMap>>,
    pub history: Option<Arc<HistoricalStore>>,
}

// Response types
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct DeparturesResponse {
    pub station: Station,
    pub departures: Vec<DepartureRecord>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub api_limit_exceeded: bool,
    pub notice: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub station: Station,
    pub rows: Vec<HistoricalRow>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TrendSection {
    pub rows: Vec<HistoricalRow>,
    /// Aligned with `rows`; leading entries without a full window are null.
    pub smoothed: Vec<Option<f64>>,
    pub comparison: DelayComparison,
}

#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub station: Station,
    pub trend: TrendSection,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub station: Station,
    pub departures: Vec<DepartureRecord>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub api_limit_exceeded: bool,
    pub notice: Option<String>,
    pub trend: Option<TrendSection>,
    pub trend_notice: Option<String>,
    pub generated_at: DateTime<Utc>,
}

struct LiveBoard {
    departures: Vec<DepartureRecord>,
    fetched_at: Option<DateTime<Utc>>,
    api_limit_exceeded: bool,
    notice: Option<String>,
}

/// One fetch-or-reuse pass for a station's departure board.
///
/// The cache lock is held across the fetch, so concurrent sessions polling
/// the same station share a single outbound call per freshness window.
async fn live_board(state: &AppState, station: &Station) -> LiveBoard {
    let mut cache = state.cache.lock().await;
    let snapshot = cache.entry(station.code.clone()).or_default();

    let outcome = fetch_or_refresh(
        snapshot,
        Utc::now(),
        Duration::minutes(state.config.cache_ttl_minutes),
        || state.live_client.live_departures(&station.code),
    )
    .await;

    let notice = match &snapshot.payload {
        Some(_) => outcome.notice().map(|n| n.to_string()),
        None => Some("No live train data available.".to_string()),
    };

    LiveBoard {
        departures: snapshot
            .payload
            .as_deref()
            .map(format_departures)
            .unwrap_or_default(),
        fetched_at: snapshot.fetched_at,
        api_limit_exceeded: snapshot.api_limit_exceeded,
        notice,
    }
}

fn trend_section(store: &HistoricalStore, station: &Station) -> TrendSection {
    let rows = store.for_station(&station.name);
    let delay_rates: Vec<f64> = rows.iter().map(|r| r.delay_rate_percent).collect();
    let smoothed = moving_average(&delay_rates, SMOOTHING_WINDOW);
    let comparison = compare_event_days(&rows);

    TrendSection {
        rows,
        smoothed,
        comparison,
    }
}

fn lookup_station(state: &AppState, code: &str) -> Result<Station, StatusCode> {
    state
        .stations
        .by_code(code)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)
}

// Route handlers
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn list_stations(State(state): State<AppState>) -> Json<Vec<Station>> {
    Json(state.stations.all().to_vec())
}

pub async fn get_departures(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<DeparturesResponse>, StatusCode> {
    let station = lookup_station(&state, &code)?;
    let board = live_board(&state, &station).await;

    Ok(Json(DeparturesResponse {
        station,
        departures: board.departures,
        fetched_at: board.fetched_at,
        api_limit_exceeded: board.api_limit_exceeded,
        notice: board.notice,
        generated_at: Utc::now(),
    }))
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<HistoryResponse>, StatusCode> {
    let station = lookup_station(&state, &code)?;
    let store = state
        .history
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(HistoryResponse {
        rows: store.for_station(&station.name),
        station,
        generated_at: Utc::now(),
    }))
}

pub async fn get_trend(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<TrendResponse>, StatusCode> {
    let station = lookup_station(&state, &code)?;
    let store = state
        .history
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(TrendResponse {
        trend: trend_section(store, &station),
        station,
        generated_at: Utc::now(),
    }))
}

/// Everything one render cycle of the dashboard needs, in a single payload.
/// A missing historical file degrades only the trend section.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<DashboardResponse>, StatusCode> {
    let station = lookup_station(&state, &code)?;
    let board = live_board(&state, &station).await;

    let (trend, trend_notice) = match state.history.as_ref() {
        Some(store) => (Some(trend_section(store, &station)), None),
        None => (
            None,
            Some("Historical delay data is not available.".to_string()),
        ),
    };

    Ok(Json(DashboardResponse {
        station,
        departures: board.departures,
        fetched_at: board.fetched_at,
        api_limit_exceeded: board.api_limit_exceeded,
        notice: board.notice,
        trend,
        trend_notice,
        generated_at: Utc::now(),
    }))
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations))
        .route("/departures/:code", get(get_departures))
        .route("/history/:code", get(get_history))
        .route("/trend/:code", get(get_trend))
        .route("/dashboard/:code", get(get_dashboard))
        .with_state(state)
}
