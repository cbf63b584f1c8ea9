pub mod house;
pub mod leaderboard;
pub mod points;
pub mod window;

pub use house::{HOUSE_COUNT, HOUSES, House, HouseId};
pub use leaderboard::{BAR_CEILING, LeaderboardRow, build_leaderboard};
pub use points::{HouseScores, MissingHouse};
pub use window::TimeWindow;
