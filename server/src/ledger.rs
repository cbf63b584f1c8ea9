use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use housecup_shared::{HOUSE_COUNT, HouseId, HouseScores, TimeWindow};
use serde::Serialize;

/// One awarded batch of points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointEvent {
    pub id: u64,
    pub house: HouseId,
    pub points: u64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HouseTally {
    pub house: HouseId,
    pub count: u64,
    pub points: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub total_records: u64,
    pub retained_records: usize,
    pub by_house: Vec<HouseTally>,
}

/// In-memory record of awarded points.
///
/// All-time totals are kept as running sums. Individual events are only
/// retained as long as the longest finite window can still see them.
#[derive(Debug, Default)]
pub struct PointLedger {
    recent: VecDeque<PointEvent>,
    all_time: HouseScores,
    counts: [u64; HOUSE_COUNT],
    total_records: u64,
}

impl PointLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from stored per-house tallies plus the events still inside
    /// the longest finite window. `recent` must already be counted in `tallies`.
    pub fn restore(
        tallies: impl IntoIterator<Item = HouseTally>,
        recent: impl IntoIterator<Item = PointEvent>,
    ) -> Self {
        let mut ledger = Self::new();
        for tally in tallies {
            let idx = tally.house.index();
            ledger.counts[idx] += tally.count;
            ledger.all_time.add(tally.house, tally.points);
            ledger.total_records += tally.count;
        }
        ledger.recent.extend(recent);
        ledger
    }

    pub fn record(&mut self, event: PointEvent) {
        self.all_time.add(event.house, event.points);
        self.counts[event.house.index()] += 1;
        self.total_records += 1;
        self.recent.push_back(event);
    }

    /// Summed points per house for `window`, as seen at `now`.
    pub fn totals(&self, window: TimeWindow, now: DateTime<Utc>) -> HouseScores {
        let Some(lookback) = window.lookback() else {
            return self.all_time;
        };
        let cutoff = now - lookback;

        let mut scores = HouseScores::default();
        for event in self.recent.iter().filter(|e| e.recorded_at >= cutoff) {
            scores.add(event.house, event.points);
        }
        scores
    }

    /// Drops events no finite window can reach any more. Returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - TimeWindow::max_lookback();
        let before = self.recent.len();
        self.recent.retain(|e| e.recorded_at >= cutoff);
        before - self.recent.len()
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn retained_records(&self) -> usize {
        self.recent.len()
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            total_records: self.total_records,
            retained_records: self.recent.len(),
            by_house: HouseId::ALL
                .into_iter()
                .map(|house| HouseTally {
                    house,
                    count: self.counts[house.index()],
                    points: self.all_time.get(house),
                })
                .collect(),
        }
    }
}
