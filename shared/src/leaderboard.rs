use crate::house::House;
use crate::points::HouseScores;

/// Fraction of the track the leading bar fills.
pub const BAR_CEILING: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow<'a> {
    pub house: &'a House,
    pub score: u64,
    /// 1-based position after sorting.
    pub rank: usize,
    /// `score / max(max_score, 1)`, always within `[0, 1]`.
    pub magnitude: f64,
}

impl LeaderboardRow<'_> {
    pub fn is_leader(&self) -> bool {
        self.rank == 1
    }

    pub fn bar_width_percent(&self, ceiling: f64) -> f64 {
        self.magnitude * ceiling.clamp(0.0, 1.0) * 100.0
    }
}

/// Rank the catalog by score, highest first.
///
/// Houses with equal scores keep their catalog order, so re-rendering an
/// unchanged table never reshuffles ties. Without a snapshot every house
/// scores zero.
pub fn build_leaderboard<'a>(
    catalog: &'a [House],
    scores: Option<&HouseScores>,
) -> Vec<LeaderboardRow<'a>> {
    let mut joined: Vec<(&House, u64)> = catalog
        .iter()
        .map(|house| (house, scores.map_or(0, |s| s.get(house.id))))
        .collect();

    // `sort_by` is stable: tied houses keep catalog order.
    joined.sort_by(|a, b| b.1.cmp(&a.1));

    let max_score = joined.iter().map(|(_, s)| *s).max().unwrap_or(0).max(1);

    joined
        .into_iter()
        .enumerate()
        .map(|(idx, (house, score))| LeaderboardRow {
            house,
            score,
            rank: idx + 1,
            magnitude: score as f64 / max_score as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{BAR_CEILING, build_leaderboard};
    use crate::house::{HOUSES, HouseId};
    use crate::points::HouseScores;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    #[test]
    fn ranks_by_score_with_stable_ties() {
        let scores = HouseScores::new([10, 30, 30, 5]);
        let rows = build_leaderboard(&HOUSES, Some(&scores));

        let order: Vec<HouseId> = rows.iter().map(|r| r.house.id).collect();
        assert_eq!(
            order,
            vec![HouseId::Slyth, HouseId::Raven, HouseId::Gryff, HouseId::Huff]
        );
        let ranks: Vec<usize> = rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);

        assert_close(rows[0].magnitude, 1.0);
        assert_close(rows[1].magnitude, 1.0);
        assert_close(rows[2].magnitude, 1.0 / 3.0);
        assert_close(rows[3].magnitude, 1.0 / 6.0);
    }

    #[test]
    fn all_zero_scores_have_zero_magnitude() {
        let rows = build_leaderboard(&HOUSES, Some(&HouseScores::default()));
        assert!(rows.iter().all(|r| r.magnitude == 0.0));
        let order: Vec<HouseId> = rows.iter().map(|r| r.house.id).collect();
        assert_eq!(order, HouseId::ALL.to_vec());
    }

    #[test]
    fn missing_snapshot_renders_catalog_at_zero() {
        let rows = build_leaderboard(&HOUSES, None);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.score == 0));
        assert!(rows[0].is_leader());
        assert_eq!(rows[0].house.id, HouseId::Gryff);
    }

    #[test]
    fn bar_width_scales_by_ceiling() {
        let rows = build_leaderboard(&HOUSES, Some(&HouseScores::new([50, 100, 0, 25])));
        assert_close(rows[0].bar_width_percent(BAR_CEILING), 90.0);
        assert_close(rows[1].bar_width_percent(BAR_CEILING), 45.0);
        assert_close(rows[3].bar_width_percent(BAR_CEILING), 0.0);
    }

    #[test]
    fn rebuilding_unchanged_scores_is_identical() {
        let scores = HouseScores::new([7, 7, 7, 7]);
        assert_eq!(
            build_leaderboard(&HOUSES, Some(&scores)),
            build_leaderboard(&HOUSES, Some(&scores))
        );
    }

    proptest! {
        #[test]
        fn ranking_is_non_increasing_and_stable(raw in prop::array::uniform4(0u64..50)) {
            let scores = HouseScores::new(raw);
            let rows = build_leaderboard(&HOUSES, Some(&scores));

            for pair in rows.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].house.id.index() < pair[1].house.id.index());
                }
            }
            for (idx, row) in rows.iter().enumerate() {
                prop_assert_eq!(row.rank, idx + 1);
            }
        }

        #[test]
        fn magnitude_stays_in_unit_interval(raw in prop::array::uniform4(any::<u32>())) {
            let scores = HouseScores::new(raw.map(u64::from));
            let rows = build_leaderboard(&HOUSES, Some(&scores));
            for row in &rows {
                prop_assert!((0.0..=1.0).contains(&row.magnitude));
            }
            if scores.max() > 0 {
                prop_assert!((rows[0].magnitude - 1.0).abs() < 1e-12);
            }
        }
    }
}
