//! Environment-driven configuration.
//!
//! Every knob has a default, so the dashboard runs with no setup:
//!   * `AGG_REALTIME_INTERVAL_SECS` - realtime sampling interval (3)
//!   * `AGG_FULL_INTERVAL_SECS`     - full refresh interval (10)
//!   * `CRYPTO_EXPORT_DIR`          - export directory (~/Desktop/CryptoData)
//!   * `AGG_LOG`                    - tracing filter for the log file (info)

use aggregator_data::PollConfig;
use std::{env, path::PathBuf, time::Duration};

pub const REALTIME_INTERVAL_VAR: &str = "AGG_REALTIME_INTERVAL_SECS";
pub const FULL_INTERVAL_VAR: &str = "AGG_FULL_INTERVAL_SECS";
pub const EXPORT_DIR_VAR: &str = "CRYPTO_EXPORT_DIR";
pub const LOG_VAR: &str = "AGG_LOG";

#[derive(Debug, Clone)]
pub struct Config {
    pub poll: PollConfig,
    pub export_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = PollConfig::default();
        Self {
            poll: PollConfig {
                realtime_interval: interval_from(
                    env::var(REALTIME_INTERVAL_VAR).ok(),
                    defaults.realtime_interval,
                ),
                full_interval: interval_from(
                    env::var(FULL_INTERVAL_VAR).ok(),
                    defaults.full_interval,
                ),
            },
            export_dir: export_dir_from(env::var(EXPORT_DIR_VAR).ok()),
        }
    }
}

fn interval_from(value: Option<String>, default: Duration) -> Duration {
    value
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(default)
}

fn export_dir_from(value: Option<String>) -> PathBuf {
    if let Some(dir) = value {
        return PathBuf::from(dir);
    }
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Desktop")
        .join("CryptoData")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from() {
        struct TestCase {
            input: Option<&'static str>,
            expected: Duration,
        }

        let default = Duration::from_secs(3);
        let tests = vec![
            // TC0: unset falls back to the default
            TestCase {
                input: None,
                expected: default,
            },
            // TC1: valid override
            TestCase {
                input: Some("7"),
                expected: Duration::from_secs(7),
            },
            // TC2: garbage falls back
            TestCase {
                input: Some("fast"),
                expected: default,
            },
            // TC3: zero would spin the loop, fall back
            TestCase {
                input: Some("0"),
                expected: default,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = interval_from(test.input.map(String::from), default);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_export_dir_override() {
        let dir = export_dir_from(Some("/tmp/exports".to_string()));
        assert_eq!(dir, PathBuf::from("/tmp/exports"));

        let fallback = export_dir_from(None);
        assert!(fallback.ends_with("Desktop/CryptoData"));
    }
}
