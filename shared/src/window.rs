use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Aggregation period requested from the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "1hour")]
    OneHour,
    #[default]
    #[serde(rename = "all")]
    AllTime,
}

impl TimeWindow {
    /// Button order in the UI.
    pub const ALL: [TimeWindow; 3] = [
        TimeWindow::FiveMinutes,
        TimeWindow::OneHour,
        TimeWindow::AllTime,
    ];

    /// Value of the `window` query parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            Self::FiveMinutes => "5min",
            Self::OneHour => "1hour",
            Self::AllTime => "all",
        }
    }

    pub fn from_query(raw: &str) -> Option<Self> {
        match raw.trim() {
            "5min" => Some(Self::FiveMinutes),
            "1hour" => Some(Self::OneHour),
            "all" => Some(Self::AllTime),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FiveMinutes => "5 min",
            Self::OneHour => "1 hour",
            Self::AllTime => "All Time",
        }
    }

    /// How far back the window reaches. `None` means unbounded.
    pub fn lookback(self) -> Option<TimeDelta> {
        match self {
            Self::FiveMinutes => Some(TimeDelta::minutes(5)),
            Self::OneHour => Some(TimeDelta::hours(1)),
            Self::AllTime => None,
        }
    }

    /// Longest finite lookback across all windows.
    pub fn max_lookback() -> TimeDelta {
        Self::ALL
            .into_iter()
            .filter_map(Self::lookback)
            .max()
            .unwrap_or_else(TimeDelta::zero)
    }
}
