use crate::poller::{PollConfig, ResponseOrdering};

const API_BASE_META: &str = "housecup-api-base";
const ORDERING_META: &str = "housecup-response-ordering";

fn meta_content(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let meta = document
        .query_selector(&format!("meta[name=\"{name}\"]"))
        .ok()
        .flatten()?;
    meta.get_attribute("content")
}

/// Origin of the scoring service. Empty means same origin as the page.
pub fn api_base() -> String {
    meta_content(API_BASE_META)
        .map(|raw| normalize_api_base(&raw))
        .unwrap_or_default()
}

/// The poll period is fixed; only the response ordering is configurable.
pub fn poll_config() -> PollConfig {
    resolve_poll_config(meta_content(ORDERING_META).as_deref())
}

pub fn normalize_api_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn resolve_poll_config(ordering: Option<&str>) -> PollConfig {
    let defaults = PollConfig::default();
    let ordering = match ordering.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
        Some("latest-issued") => ResponseOrdering::LatestIssued,
        _ => defaults.ordering,
    };
    PollConfig {
        ordering,
        ..defaults
    }
}
