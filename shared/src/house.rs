use serde::{Deserialize, Serialize};

pub const HOUSE_COUNT: usize = 4;

/// Wire identifier of a house, as used in `/api/points` payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HouseId {
    Gryff = 0,
    Slyth = 1,
    Raven = 2,
    Huff = 3,
}

impl HouseId {
    pub const ALL: [HouseId; HOUSE_COUNT] = [
        HouseId::Gryff,
        HouseId::Slyth,
        HouseId::Raven,
        HouseId::Huff,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gryff => "Gryff",
            Self::Slyth => "Slyth",
            Self::Raven => "Raven",
            Self::Huff => "Huff",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == raw)
    }

    /// Position in the static catalog.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn house(self) -> &'static House {
        &HOUSES[self.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct House {
    pub id: HouseId,
    pub display_name: &'static str,
    pub symbol: &'static str,
}

/// Fixed catalog, in display order. Ties on the leaderboard keep this order.
pub static HOUSES: [House; HOUSE_COUNT] = [
    House {
        id: HouseId::Gryff,
        display_name: "Gryffindor",
        symbol: "\u{1F981}",
    },
    House {
        id: HouseId::Slyth,
        display_name: "Slytherin",
        symbol: "\u{1F40D}",
    },
    House {
        id: HouseId::Raven,
        display_name: "Ravenclaw",
        symbol: "\u{1F985}",
    },
    House {
        id: HouseId::Huff,
        display_name: "Hufflepuff",
        symbol: "\u{1F9A1}",
    },
];
