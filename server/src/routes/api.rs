use std::fmt::Write as _;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;
use housecup_shared::TimeWindow;
use serde::Deserialize;
use tracing::debug;

use crate::ledger::LedgerStats;
use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Default, Deserialize)]
pub struct PointsQuery {
    window: Option<String>,
}

/// Missing selector means all time; anything unrecognised is treated as the last hour.
fn resolve_window(raw: Option<&str>) -> TimeWindow {
    match raw {
        None => TimeWindow::AllTime,
        Some(raw) => TimeWindow::from_query(raw).unwrap_or(TimeWindow::OneHour),
    }
}

pub async fn get_points(
    State(state): State<AppState>,
    Query(query): Query<PointsQuery>,
) -> impl IntoResponse {
    state.observability.record_points_request();
    let window = resolve_window(query.window.as_deref());
    let scores = state.ledger.read().await.totals(window, Utc::now());
    debug!(window = window.as_query(), total = scores.total(), "served points");

    ([(header::CACHE_CONTROL, "no-store")], Json(scores))
}

pub async fn debug_stats(State(state): State<AppState>) -> Json<LedgerStats> {
    Json(state.ledger.read().await.stats())
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let total_records = state.ledger.read().await.total_records();
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "total_records": total_records,
        "persistence_available": state.db.is_some(),
        "persist_failures_total": observability.persist_failures_total,
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let (total_records, retained_records) = {
        let ledger = state.ledger.read().await;
        (ledger.total_records(), ledger.retained_records())
    };
    let persistence_available = state.db.is_some();
    let observability = state.observability.snapshot();

    let body = render_prometheus_metrics(
        total_records,
        retained_records,
        persistence_available,
        observability,
    );

    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn render_prometheus_metrics(
    total_records: u64,
    retained_records: usize,
    persistence_available: bool,
    observability: ObservabilitySnapshot,
) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "# HELP housecup_ledger_records Point events recorded, including those restored from storage."
    );
    let _ = writeln!(body, "# TYPE housecup_ledger_records gauge");
    let _ = writeln!(body, "housecup_ledger_records {total_records}");

    let _ = writeln!(
        body,
        "# HELP housecup_ledger_retained_records Point events still visible to windowed totals."
    );
    let _ = writeln!(body, "# TYPE housecup_ledger_retained_records gauge");
    let _ = writeln!(body, "housecup_ledger_retained_records {retained_records}");

    let _ = writeln!(
        body,
        "# HELP housecup_persistence_available Whether point events are persisted (1 or 0)."
    );
    let _ = writeln!(body, "# TYPE housecup_persistence_available gauge");
    let _ = writeln!(
        body,
        "housecup_persistence_available {}",
        u8::from(persistence_available)
    );

    let _ = writeln!(
        body,
        "# HELP housecup_points_requests_total Total points API requests."
    );
    let _ = writeln!(body, "# TYPE housecup_points_requests_total counter");
    let _ = writeln!(
        body,
        "housecup_points_requests_total {}",
        observability.points_requests_total
    );

    let _ = writeln!(
        body,
        "# HELP housecup_ingested_events_total Total generated point events ingested."
    );
    let _ = writeln!(body, "# TYPE housecup_ingested_events_total counter");
    let _ = writeln!(
        body,
        "housecup_ingested_events_total {}",
        observability.ingested_events_total
    );

    let _ = writeln!(
        body,
        "# HELP housecup_pruned_events_total Total point events dropped by retention."
    );
    let _ = writeln!(body, "# TYPE housecup_pruned_events_total counter");
    let _ = writeln!(
        body,
        "housecup_pruned_events_total {}",
        observability.pruned_events_total
    );

    let _ = writeln!(
        body,
        "# HELP housecup_persist_failures_total Total point events that failed to persist."
    );
    let _ = writeln!(body, "# TYPE housecup_persist_failures_total counter");
    let _ = writeln!(
        body,
        "housecup_persist_failures_total {}",
        observability.persist_failures_total
    );

    body
}
