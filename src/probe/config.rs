//! Probe target and validation thresholds

use std::time::Duration;

/// What to probe and what a healthy response looks like
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// Target URL (http or https)
    pub url: String,
    /// Status code a healthy target answers with
    pub expected_status: u16,
    /// Substring the body must contain; empty matches any body
    pub expected_keyword: String,
    /// Slowest acceptable response in milliseconds
    pub max_response_time_ms: u64,
    /// Hard limit on the whole request, after which it is a transport error
    pub timeout: Duration,
}

impl ProbeConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            expected_status: 200,
            expected_keyword: String::new(),
            max_response_time_ms: 5000,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_expected_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.expected_keyword = keyword.into();
        self
    }

    pub fn with_max_response_time(mut self, max_ms: u64) -> Self {
        self.max_response_time_ms = max_ms;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
