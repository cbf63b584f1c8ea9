use chrono::{DateTime, Utc};
use housecup_shared::{HouseId, TimeWindow};
use tracing::warn;

use crate::ledger::{HouseTally, PointEvent, PointLedger};

type TallyRow = (String, i64, i64);
type EventRow = (i64, String, i64, DateTime<Utc>);

/// Ledger rebuilt from `house_points`, plus the first unused event id.
#[derive(Debug)]
pub struct RestoredLedger {
    pub ledger: PointLedger,
    pub next_event_id: u64,
}

pub async fn insert_event(pool: &sqlx::PgPool, event: &PointEvent) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO house_points (id, house, points, recorded_at) \
         VALUES ($1, $2, $3, $4) ON CONFLICT (id) DO NOTHING",
    )
    .bind(i64::try_from(event.id).unwrap_or(i64::MAX))
    .bind(event.house.as_str())
    .bind(i64::try_from(event.points).unwrap_or(i64::MAX))
    .bind(event.recorded_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// All-time tallies come from aggregates; only events inside the longest finite
/// window are loaded individually.
pub async fn load_ledger(
    pool: &sqlx::PgPool,
    now: DateTime<Utc>,
) -> Result<RestoredLedger, sqlx::Error> {
    let tallies = sqlx::query_as::<_, TallyRow>(
        "SELECT house, COUNT(*), COALESCE(SUM(points), 0)::BIGINT \
         FROM house_points GROUP BY house",
    )
    .fetch_all(pool)
    .await?;

    let recent = sqlx::query_as::<_, EventRow>(
        "SELECT id, house, points, recorded_at FROM house_points \
         WHERE recorded_at >= $1 ORDER BY recorded_at, id",
    )
    .bind(now - TimeWindow::max_lookback())
    .fetch_all(pool)
    .await?;

    let max_id = sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(id) FROM house_points")
        .fetch_one(pool)
        .await?;

    Ok(restore_from_rows(tallies, recent, max_id))
}

fn parse_house(raw: &str) -> Option<HouseId> {
    let house = HouseId::parse(raw);
    if house.is_none() {
        warn!(house = raw, "skipping stored points for unknown house");
    }
    house
}

fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn restore_from_rows(
    tallies: Vec<TallyRow>,
    recent: Vec<EventRow>,
    max_id: Option<i64>,
) -> RestoredLedger {
    let tallies = tallies
        .into_iter()
        .filter_map(|(house, count, points)| {
            Some(HouseTally {
                house: parse_house(&house)?,
                count: non_negative(count),
                points: non_negative(points),
            })
        })
        .collect::<Vec<_>>();

    let recent = recent
        .into_iter()
        .filter_map(|(id, house, points, recorded_at)| {
            Some(PointEvent {
                id: non_negative(id),
                house: parse_house(&house)?,
                points: non_negative(points),
                recorded_at,
            })
        })
        .collect::<Vec<_>>();

    RestoredLedger {
        ledger: PointLedger::restore(tallies, recent),
        next_event_id: max_id.map_or(1, |id| non_negative(id).saturating_add(1)),
    }
}
