use futures::FutureExt;
use futures::future::LocalBoxFuture;
use thiserror::Error;

use housecup_shared::{HouseScores, TimeWindow};

/// Why a score retrieval produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never completed (network unreachable, aborted, CORS).
    #[error("fetch error: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),
    /// The body was not a complete score object.
    #[error("parse error: {0}")]
    Decode(String),
}

/// Anything that can produce a score table for a window.
pub trait ScoreSource {
    fn fetch(&self, window: TimeWindow) -> LocalBoxFuture<'static, Result<HouseScores, FetchError>>;
}

/// Scoring service reached over HTTP with `gloo-net`.
#[derive(Debug, Clone, Default)]
pub struct HttpScoreSource {
    base: String,
}

impl HttpScoreSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn points_url(&self, window: TimeWindow) -> String {
        format!("{}/api/points?window={}", self.base, window.as_query())
    }
}

impl ScoreSource for HttpScoreSource {
    fn fetch(&self, window: TimeWindow) -> LocalBoxFuture<'static, Result<HouseScores, FetchError>> {
        let url = self.points_url(window);
        async move {
            let resp = gloo_net::http::Request::get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            if !resp.ok() {
                return Err(FetchError::Status(resp.status()));
            }

            let body = resp
                .text()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;
            decode_points(&body)
        }
        .boxed_local()
    }
}

pub fn decode_points(body: &str) -> Result<HouseScores, FetchError> {
    serde_json::from_str::<HouseScores>(body).map_err(|e| FetchError::Decode(e.to_string()))
}
