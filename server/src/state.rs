use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::ledger::PointLedger;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RwLock<PointLedger>>,
    pub next_event_id: Arc<AtomicU64>,
    /// Durable `house_points` storage. None if DATABASE_URL is not set.
    pub db: Option<PgPool>,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    points_requests_total: AtomicU64,
    ingested_events_total: AtomicU64,
    pruned_events_total: AtomicU64,
    persist_failures_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub points_requests_total: u64,
    pub ingested_events_total: u64,
    pub pruned_events_total: u64,
    pub persist_failures_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            points_requests_total: self.points_requests_total.load(Ordering::Relaxed),
            ingested_events_total: self.ingested_events_total.load(Ordering::Relaxed),
            pruned_events_total: self.pruned_events_total.load(Ordering::Relaxed),
            persist_failures_total: self.persist_failures_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_points_request(&self) {
        self.points_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the running total including this event.
    pub fn record_ingested_event(&self) -> u64 {
        self.ingested_events_total.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_pruned_events(&self, count: u64) {
        self.pruned_events_total.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_persist_failure(&self) {
        self.persist_failures_total.fetch_add(1, Ordering::Relaxed);
    }
}

impl AppState {
    pub fn new(db: Option<PgPool>) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(PointLedger::new())),
            next_event_id: Arc::new(AtomicU64::new(1)),
            db,
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }

    pub fn allocate_event_id(&self) -> u64 {
        self.next_event_id.fetch_add(1, Ordering::Relaxed)
    }
}
