use chrono::Utc;
use housecup_shared::TimeWindow;
use tracing::info;

use crate::config::retention_check_interval;
use crate::state::AppState;

/// Periodically drops in-memory point events older than the longest finite window.
/// Rows in `house_points` are kept; all-time totals are restored from them.
pub async fn run(state: AppState) {
    let period = retention_check_interval();
    info!(
        "Retention cleaner started (lookback: {}m, check interval: {}s)",
        TimeWindow::max_lookback().num_minutes(),
        period.as_secs()
    );

    let mut interval = tokio::time::interval(period);
    // Consume immediate tick so the first prune runs after one interval.
    interval.tick().await;

    loop {
        interval.tick().await;
        run_cleanup_once(&state).await;
    }
}

pub(crate) async fn run_cleanup_once(state: &AppState) -> usize {
    let (removed, retained) = {
        let mut ledger = state.ledger.write().await;
        let removed = ledger.prune(Utc::now());
        (removed, ledger.retained_records())
    };

    if removed > 0 {
        state.observability.record_pruned_events(removed as u64);
        info!("Retention cleanup: removed {removed} events ({retained} retained)");
    }
    removed
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use housecup_shared::{HouseId, TimeWindow};

    use super::run_cleanup_once;
    use crate::ledger::PointEvent;
    use crate::state::AppState;

    #[tokio::test]
    async fn cleanup_removes_only_expired_events() {
        let state = AppState::new(None);
        let now = Utc::now();
        {
            let mut ledger = state.ledger.write().await;
            ledger.record(PointEvent {
                id: 1,
                house: HouseId::Huff,
                points: 9,
                recorded_at: now - TimeDelta::hours(3),
            });
            ledger.record(PointEvent {
                id: 2,
                house: HouseId::Huff,
                points: 2,
                recorded_at: now,
            });
        }

        assert_eq!(run_cleanup_once(&state).await, 1);
        assert_eq!(state.observability.snapshot().pruned_events_total, 1);

        let ledger = state.ledger.read().await;
        assert_eq!(ledger.retained_records(), 1);
        assert_eq!(ledger.totals(TimeWindow::AllTime, now).get(HouseId::Huff), 11);
    }
}
