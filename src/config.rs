//! Process-wide configuration, read once at startup
//!
//! Environment variables:
//! - UPTIME_TARGET_URL: URL to probe (required)
//! - UPTIME_EXPECTED_STATUS: expected status code (default: 200)
//! - UPTIME_EXPECTED_KEYWORD: substring the body must contain (default: empty)
//! - UPTIME_MAX_RESPONSE_TIME_MS: latency threshold (default: 5000)
//! - UPTIME_PROBE_TIMEOUT_MS: hard request timeout (default: 10000)
//! - UPTIME_CHECK_INTERVAL_SECS: probe period (default: 300)
//! - UPTIME_STORE: `memory` or a JSON Lines file path (default: ./uptime_data/checks.jsonl)
//! - UPTIME_STORE_TIMEOUT_MS: store call timeout (default: 5000)
//! - UPTIME_NOTIFY: `log` or a webhook URL (default: log)
//! - UPTIME_NOTIFY_TIMEOUT_MS: notification timeout (default: 5000)
//! - UPTIME_HOST: bind address (default: 0.0.0.0)
//! - UPTIME_PORT: port number (default: 8080)

use std::str::FromStr;
use std::time::Duration;

use crate::alerts::NotifyTarget;
use crate::probe::{CycleTimeouts, ProbeConfig};
use crate::storage::StoreLocation;

/// Everything the monitor needs, fixed for the life of the process
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub probe: ProbeConfig,
    pub store: StoreLocation,
    pub notify: NotifyTarget,
    pub timeouts: CycleTimeouts,
    pub check_interval: Duration,
    pub host: String,
    pub port: u16,
}

impl MonitorConfig {
    /// Defaults for everything but the target
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            probe: ProbeConfig::new(target_url),
            store: StoreLocation::default(),
            notify: NotifyTarget::default(),
            timeouts: CycleTimeouts::default(),
            check_interval: Duration::from_secs(300),
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }

    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_store(mut self, store: StoreLocation) -> Self {
        self.store = store;
        self
    }

    pub fn with_notify(mut self, notify: NotifyTarget) -> Self {
        self.notify = notify;
        self
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value. Unset and blank variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = get("UPTIME_TARGET_URL").ok_or(ConfigError::Missing("UPTIME_TARGET_URL"))?;
        validate_url("UPTIME_TARGET_URL", &url)?;

        let mut config = Self::new(url.trim());

        if let Some(status) = parse::<u16>(&get, "UPTIME_EXPECTED_STATUS")? {
            if !(100..=599).contains(&status) {
                return Err(ConfigError::invalid(
                    "UPTIME_EXPECTED_STATUS",
                    status.to_string(),
                    "not an HTTP status code",
                ));
            }
            config.probe.expected_status = status;
        }
        // The keyword is taken verbatim; surrounding spaces can be significant
        if let Some(keyword) = lookup("UPTIME_EXPECTED_KEYWORD") {
            config.probe.expected_keyword = keyword;
        }
        if let Some(max_ms) = parse::<u64>(&get, "UPTIME_MAX_RESPONSE_TIME_MS")? {
            config.probe.max_response_time_ms = max_ms;
        }
        if let Some(ms) = parse_positive(&get, "UPTIME_PROBE_TIMEOUT_MS")? {
            config.probe.timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_positive(&get, "UPTIME_CHECK_INTERVAL_SECS")? {
            config.check_interval = Duration::from_secs(secs);
        }
        if let Some(store) = get("UPTIME_STORE") {
            config.store = StoreLocation::parse(&store);
        }
        if let Some(ms) = parse_positive(&get, "UPTIME_STORE_TIMEOUT_MS")? {
            config.timeouts.store = Duration::from_millis(ms);
        }
        if let Some(notify) = get("UPTIME_NOTIFY") {
            config.notify = NotifyTarget::parse(&notify).ok_or_else(|| {
                ConfigError::invalid("UPTIME_NOTIFY", notify.clone(), "expected `log` or a webhook URL")
            })?;
        }
        if let Some(ms) = parse_positive(&get, "UPTIME_NOTIFY_TIMEOUT_MS")? {
            config.timeouts.notify = Duration::from_millis(ms);
        }
        if let Some(host) = get("UPTIME_HOST") {
            config.host = host.trim().to_string();
        }
        if let Some(port) = parse::<u16>(&get, "UPTIME_PORT")? {
            config.port = port;
        }

        Ok(config)
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::invalid(key, raw.clone(), e.to_string())),
    }
}

fn parse_positive(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match parse::<u64>(get, key)? {
        Some(0) => Err(ConfigError::invalid(key, "0", "must be greater than zero")),
        other => Ok(other),
    }
}

fn validate_url(key: &'static str, raw: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(raw.trim())
        .map_err(|e| ConfigError::invalid(key, raw, e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::invalid(
            key,
            raw,
            format!("unsupported scheme `{}`", other),
        )),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<MonitorConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MonitorConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[("UPTIME_TARGET_URL", "https://example.com")]).unwrap();

        assert_eq!(config, MonitorConfig::new("https://example.com"));
        assert_eq!(config.probe.expected_status, 200);
        assert_eq!(config.notify, NotifyTarget::Log);
        assert_eq!(config.check_interval, Duration::from_secs(300));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_full_environment() {
        let config = from_pairs(&[
            ("UPTIME_TARGET_URL", "https://example.com/status"),
            ("UPTIME_EXPECTED_STATUS", "204"),
            ("UPTIME_EXPECTED_KEYWORD", "All systems"),
            ("UPTIME_MAX_RESPONSE_TIME_MS", "1500"),
            ("UPTIME_PROBE_TIMEOUT_MS", "3000"),
            ("UPTIME_CHECK_INTERVAL_SECS", "60"),
            ("UPTIME_STORE", "/tmp/checks.jsonl"),
            ("UPTIME_STORE_TIMEOUT_MS", "250"),
            ("UPTIME_NOTIFY", "https://hooks.example.com/x"),
            ("UPTIME_NOTIFY_TIMEOUT_MS", "750"),
            ("UPTIME_HOST", "127.0.0.1"),
            ("UPTIME_PORT", "9090"),
        ])
        .unwrap();

        assert_eq!(config.probe.url, "https://example.com/status");
        assert_eq!(config.probe.expected_status, 204);
        assert_eq!(config.probe.expected_keyword, "All systems");
        assert_eq!(config.probe.max_response_time_ms, 1500);
        assert_eq!(config.probe.timeout, Duration::from_secs(3));
        assert_eq!(config.check_interval, Duration::from_secs(60));
        assert_eq!(
            config.store,
            StoreLocation::File(PathBuf::from("/tmp/checks.jsonl"))
        );
        assert_eq!(config.timeouts.store, Duration::from_millis(250));
        assert_eq!(config.timeouts.notify, Duration::from_millis(750));
        assert!(matches!(config.notify, NotifyTarget::Webhook { .. }));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_missing_target() {
        let err = from_pairs(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("UPTIME_TARGET_URL")));
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            ("UPTIME_TARGET_URL", "ftp://example.com"),
            ("UPTIME_TARGET_URL", "not a url"),
            ("UPTIME_EXPECTED_STATUS", "abc"),
            ("UPTIME_EXPECTED_STATUS", "42"),
            ("UPTIME_MAX_RESPONSE_TIME_MS", "-1"),
            ("UPTIME_CHECK_INTERVAL_SECS", "0"),
            ("UPTIME_NOTIFY", "sns:topic"),
            ("UPTIME_PORT", "70000"),
        ];

        for (key, value) in cases {
            let mut pairs = vec![("UPTIME_TARGET_URL", "https://example.com")];
            pairs.retain(|(k, _)| *k != key);
            pairs.push((key, value));

            let err = from_pairs(&pairs).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key: k, .. } if k == key),
                "{}={} gave {:?}",
                key,
                value,
                err
            );
        }
    }

    #[test]
    fn test_keyword_kept_verbatim() {
        let config = from_pairs(&[
            ("UPTIME_TARGET_URL", "https://example.com"),
            ("UPTIME_EXPECTED_KEYWORD", " ok "),
        ])
        .unwrap();
        assert_eq!(config.probe.expected_keyword, " ok ");
    }
}
