use chrono::{DateTime, Utc};
use housecup_shared::HouseId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::{
    INGEST_LOG_EVERY, MAX_EVENT_POINTS, MIN_EVENT_POINTS, event_interval, generator_enabled,
};
use crate::ledger::PointEvent;
use crate::state::AppState;
use crate::store;

/// Emits one random award per tick until the process exits.
pub async fn run(state: AppState) {
    if !generator_enabled() {
        info!("point generator disabled via GENERATOR_ENABLED");
        return;
    }

    let period = event_interval();
    info!(?period, "point generator started");

    let mut rng = StdRng::from_entropy();
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        let event = random_event(&mut rng, state.allocate_event_id(), Utc::now());
        ingest(&state, event).await;
    }
}

pub fn random_event<R: Rng>(rng: &mut R, id: u64, recorded_at: DateTime<Utc>) -> PointEvent {
    let house = HouseId::ALL[rng.gen_range(0..HouseId::ALL.len())];
    PointEvent {
        id,
        house,
        points: rng.gen_range(MIN_EVENT_POINTS..=MAX_EVENT_POINTS),
        recorded_at,
    }
}

/// Records `event` in memory, then in `house_points` when a database is configured.
/// A failed write is counted and logged; the in-memory ledger keeps the event.
pub async fn ingest(state: &AppState, event: PointEvent) {
    let (id, house, points) = (event.id, event.house, event.points);
    if let Some(pool) = state.db.as_ref()
        && let Err(e) = store::insert_event(pool, &event).await
    {
        state.observability.record_persist_failure();
        warn!(id, error = %e, "failed to persist point event");
    }
    state.ledger.write().await.record(event);

    let ingested = state.observability.record_ingested_event();
    debug!(id, house = house.house().display_name, points, "ingested event");
    if ingested % INGEST_LOG_EVERY == 0 {
        info!("Ingested {ingested} events so far");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use housecup_shared::{HouseId, TimeWindow};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sqlx::postgres::PgPoolOptions;

    use super::{ingest, random_event};
    use crate::config::{MAX_EVENT_POINTS, MIN_EVENT_POINTS};
    use crate::ledger::PointEvent;
    use crate::state::AppState;

    #[test]
    fn random_events_stay_in_range_and_cover_every_house() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();
        let mut seen = [false; 4];

        for id in 0..500 {
            let event = random_event(&mut rng, id, now);
            assert!((MIN_EVENT_POINTS..=MAX_EVENT_POINTS).contains(&event.points));
            assert_eq!(event.id, id);
            assert_eq!(event.recorded_at, now);
            seen[event.house.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[tokio::test]
    async fn ingest_records_into_ledger_and_counts() {
        let state = AppState::new(None);
        let mut rng = StdRng::seed_from_u64(11);
        let now = Utc::now();

        let mut expected = 0;
        for _ in 0..3 {
            let event = random_event(&mut rng, state.allocate_event_id(), now);
            expected += event.points;
            ingest(&state, event).await;
        }

        let ledger = state.ledger.read().await;
        assert_eq!(ledger.total_records(), 3);
        assert_eq!(ledger.totals(TimeWindow::AllTime, now).total(), expected);
        assert_eq!(state.observability.snapshot().ingested_events_total, 3);
        assert!(HouseId::ALL.iter().any(|h| ledger.stats().by_house[h.index()].count > 0));
    }

    #[tokio::test]
    async fn failed_persist_is_counted_and_event_kept_in_memory() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://housecup@127.0.0.1:1/housecup")
            .expect("lazy pool from valid url");
        let state = AppState::new(Some(pool));
        let now = Utc::now();

        ingest(
            &state,
            PointEvent {
                id: state.allocate_event_id(),
                house: HouseId::Gryff,
                points: 6,
                recorded_at: now,
            },
        )
        .await;

        assert_eq!(state.observability.snapshot().persist_failures_total, 1);
        let ledger = state.ledger.read().await;
        assert_eq!(ledger.total_records(), 1);
        assert_eq!(ledger.totals(TimeWindow::AllTime, now).get(HouseId::Gryff), 6);
    }
}
