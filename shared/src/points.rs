use std::collections::HashMap;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::house::{HOUSE_COUNT, HouseId};

/// Score per house. Always complete: every catalog house has an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HouseScores([u64; HOUSE_COUNT]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("score missing for house {}", .0.as_str())]
pub struct MissingHouse(pub HouseId);

impl HouseScores {
    pub fn new(scores: [u64; HOUSE_COUNT]) -> Self {
        Self(scores)
    }

    pub fn get(&self, id: HouseId) -> u64 {
        self.0[id.index()]
    }

    pub fn set(&mut self, id: HouseId, score: u64) {
        self.0[id.index()] = score;
    }

    pub fn add(&mut self, id: HouseId, points: u64) {
        let slot = &mut self.0[id.index()];
        *slot = slot.saturating_add(points);
    }

    pub fn max(&self) -> u64 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (HouseId, u64)> + '_ {
        HouseId::ALL.into_iter().map(|id| (id, self.get(id)))
    }

    /// Build from a decoded `/api/points` object. Unknown keys are ignored.
    pub fn from_points_map(map: &HashMap<String, u64>) -> Result<Self, MissingHouse> {
        let mut scores = Self::default();
        for id in HouseId::ALL {
            let score = map.get(id.as_str()).copied().ok_or(MissingHouse(id))?;
            scores.set(id, score);
        }
        Ok(scores)
    }
}

impl Serialize for HouseScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(HOUSE_COUNT))?;
        for (id, score) in self.iter() {
            map.serialize_entry(id.as_str(), &score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HouseScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, u64>::deserialize(deserializer)?;
        Self::from_points_map(&raw).map_err(D::Error::custom)
    }
}
