//! Application configuration loaded from environment variables.
//!
//! All settings have defaults suitable for the production deployment:
//! - `KEBUBBI_API_BASE_URL` — base URL of the order backlog service
//! - `KEBUBBI_POLL_INTERVAL_SECS` — backlog poll cadence in seconds
//! - `KEBUBBI_DATA_DIR` — directory for held orders and cached settings
//! - `KEBUBBI_RESET_SECRET` — shared secret gating the stats reset
//!
//! When `KEBUBBI_RESET_SECRET` is unset, every reset attempt is
//! rejected.

use std::path::PathBuf;
use std::time::Duration;

/// Default backlog service endpoint.
const DEFAULT_API_BASE_URL: &str = "https://daniankebubbi.onrender.com";

/// Default poll cadence.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default directory for local persisted state.
const DEFAULT_DATA_DIR: &str = ".kebubbi";

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub data_dir: PathBuf,
    pub reset_secret: Option<String>,
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`KebubbiError::Config`](crate::KebubbiError::Config) if
/// `KEBUBBI_POLL_INTERVAL_SECS` is set but not a positive integer.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let api_base_url =
        non_empty_var("KEBUBBI_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    let poll_interval_secs = match non_empty_var("KEBUBBI_POLL_INTERVAL_SECS") {
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                return Err(crate::KebubbiError::Config(format!(
                    "KEBUBBI_POLL_INTERVAL_SECS must be a positive integer, got {raw:?}"
                )));
            }
        },
        None => DEFAULT_POLL_INTERVAL_SECS,
    };

    let data_dir = non_empty_var("KEBUBBI_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    Ok(AppConfig {
        api_base_url,
        poll_interval: Duration::from_secs(poll_interval_secs),
        data_dir,
        reset_secret: non_empty_var("KEBUBBI_RESET_SECRET"),
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper that temporarily sets env vars, runs `f`, then restores originals.
    ///
    /// # Safety
    ///
    /// Tests using this helper must run with `--test-threads=1` or otherwise
    /// ensure no other threads read these env vars concurrently.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let originals: Vec<(&str, Option<String>)> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            // SAFETY: config tests run single-threaded (see test runner config).
            unsafe {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values, same single-threaded context.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(
            &[
                ("KEBUBBI_API_BASE_URL", None),
                ("KEBUBBI_POLL_INTERVAL_SECS", None),
                ("KEBUBBI_DATA_DIR", None),
                ("KEBUBBI_RESET_SECRET", None),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
                assert_eq!(config.poll_interval, Duration::from_secs(5));
                assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
                assert!(config.reset_secret.is_none());
            },
        );
    }

    #[test]
    fn custom_base_url_and_interval() {
        with_env(
            &[
                ("KEBUBBI_API_BASE_URL", Some("http://localhost:5000")),
                ("KEBUBBI_POLL_INTERVAL_SECS", Some("2")),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.api_base_url, "http://localhost:5000");
                assert_eq!(config.poll_interval, Duration::from_secs(2));
            },
        );
    }

    #[test]
    fn rejects_non_numeric_interval() {
        with_env(&[("KEBUBBI_POLL_INTERVAL_SECS", Some("fast"))], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("KEBUBBI_POLL_INTERVAL_SECS"));
        });
    }

    #[test]
    fn rejects_zero_interval() {
        with_env(&[("KEBUBBI_POLL_INTERVAL_SECS", Some("0"))], || {
            assert!(fetch_config().is_err());
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        with_env(
            &[
                ("KEBUBBI_API_BASE_URL", Some("")),
                ("KEBUBBI_POLL_INTERVAL_SECS", Some("")),
                ("KEBUBBI_RESET_SECRET", Some("")),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
                assert_eq!(config.poll_interval, Duration::from_secs(5));
                assert!(config.reset_secret.is_none());
            },
        );
    }

    #[test]
    fn reset_secret_loaded_when_set() {
        with_env(&[("KEBUBBI_RESET_SECRET", Some("2025"))], || {
            let config = fetch_config().unwrap();
            assert_eq!(config.reset_secret.as_deref(), Some("2025"));
        });
    }
}
