use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVER_PORT: u16 = 5001;
pub const DEFAULT_EVENT_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_STATIC_DIR: &str = "client/dist";
pub const RETENTION_CHECK_SECS: u64 = 60;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Awarded points per generated event, inclusive.
pub const MIN_EVENT_POINTS: u64 = 1;
pub const MAX_EVENT_POINTS: u64 = 10;
/// Every Nth ingested event is logged.
pub const INGEST_LOG_EVERY: u64 = 10;

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn event_interval() -> Duration {
    std::env::var("EVENT_INTERVAL_MS")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_millis)
        .unwrap_or_else(|| Duration::from_millis(DEFAULT_EVENT_INTERVAL_MS))
}

pub fn generator_enabled() -> bool {
    std::env::var("GENERATOR_ENABLED")
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            !matches!(normalized.as_str(), "0" | "false" | "no" | "off")
        })
        .unwrap_or(true)
}

pub fn retention_check_interval() -> Duration {
    std::env::var("RETENTION_CHECK_SECS")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(RETENTION_CHECK_SECS))
}

/// Postgres connection string. Unset or blank keeps the ledger memory-only.
pub fn database_url() -> Option<String> {
    std::env::var("DATABASE_URL")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn db_max_connections() -> u32 {
    std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
}

pub fn static_dir() -> PathBuf {
    std::env::var("STATIC_DIR")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        temp_env::with_vars_unset(
            [
                "SERVER_PORT",
                "EVENT_INTERVAL_MS",
                "GENERATOR_ENABLED",
                "RETENTION_CHECK_SECS",
                "STATIC_DIR",
                "DATABASE_URL",
                "DB_MAX_CONNECTIONS",
            ],
            || {
                assert_eq!(server_port(), 5001);
                assert_eq!(event_interval(), Duration::from_millis(1000));
                assert!(generator_enabled());
                assert_eq!(retention_check_interval(), Duration::from_secs(60));
                assert_eq!(static_dir(), PathBuf::from("client/dist"));
                assert_eq!(database_url(), None);
                assert_eq!(db_max_connections(), 5);
            },
        );
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        temp_env::with_vars(
            [
                ("SERVER_PORT", Some("not-a-port")),
                ("EVENT_INTERVAL_MS", Some("0")),
                ("RETENTION_CHECK_SECS", Some("-5")),
                ("STATIC_DIR", Some("   ")),
            ],
            || {
                assert_eq!(server_port(), DEFAULT_SERVER_PORT);
                assert_eq!(
                    event_interval(),
                    Duration::from_millis(DEFAULT_EVENT_INTERVAL_MS)
                );
                assert_eq!(
                    retention_check_interval(),
                    Duration::from_secs(RETENTION_CHECK_SECS)
                );
                assert_eq!(static_dir(), PathBuf::from(DEFAULT_STATIC_DIR));
            },
        );
    }

    #[test]
    fn overrides_are_parsed() {
        temp_env::with_vars(
            [
                ("SERVER_PORT", Some("8080")),
                ("EVENT_INTERVAL_MS", Some(" 250 ")),
                ("STATIC_DIR", Some("/srv/housecup")),
            ],
            || {
                assert_eq!(server_port(), 8080);
                assert_eq!(event_interval(), Duration::from_millis(250));
                assert_eq!(static_dir(), PathBuf::from("/srv/housecup"));
            },
        );
    }

    #[test]
    fn database_settings_are_trimmed_and_validated() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("  postgres://cup@localhost/housecup ")),
                ("DB_MAX_CONNECTIONS", Some("0")),
            ],
            || {
                assert_eq!(
                    database_url().as_deref(),
                    Some("postgres://cup@localhost/housecup")
                );
                assert_eq!(db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
            },
        );
        temp_env::with_var("DATABASE_URL", Some("   "), || {
            assert_eq!(database_url(), None);
        });
    }

    #[test]
    fn generator_can_be_switched_off() {
        for value in ["false", "0", "OFF", " no "] {
            temp_env::with_var("GENERATOR_ENABLED", Some(value), || {
                assert!(!generator_enabled(), "{value:?} should disable");
            });
        }
        temp_env::with_var("GENERATOR_ENABLED", Some("yes"), || {
            assert!(generator_enabled());
        });
    }
}
