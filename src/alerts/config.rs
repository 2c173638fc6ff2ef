//! Alert payload and notification targets

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::{timestamp_format, CheckRecord, CheckStatus};

/// A failed check, as handed to notification targets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Monitored URL
    pub target: String,
    pub status: CheckStatus,
    pub error_message: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
    pub response_time: u64,
}

impl Alert {
    /// Build the alert for a stored record
    pub fn from_record(target: impl Into<String>, record: &CheckRecord) -> Self {
        Self {
            target: target.into(),
            status: record.status,
            error_message: record.error_message.clone(),
            timestamp: record.timestamp,
            response_time: record.response_time_or_zero(),
        }
    }

    /// One-line subject
    pub fn subject(&self) -> String {
        format!("Website Issue: {}", self.target)
    }

    /// Multi-line human-readable body
    pub fn message(&self) -> String {
        format!(
            "Website: {}\nStatus: {}\nError: {}\nChecked at: {}\nResponse time: {}ms",
            self.target,
            self.status,
            self.error_message,
            timestamp_format::format(&self.timestamp),
            self.response_time
        )
    }
}

/// Where failure alerts go
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyTarget {
    /// Log to tracing
    Log,
    /// HTTP webhook
    Webhook {
        url: String,
        headers: HashMap<String, String>,
    },
}

impl NotifyTarget {
    /// Parse a destination identifier: `log`, or an http(s) webhook URL
    pub fn parse(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim();
        if identifier.eq_ignore_ascii_case("log") {
            Some(NotifyTarget::Log)
        } else if identifier.starts_with("http://") || identifier.starts_with("https://") {
            Some(NotifyTarget::Webhook {
                url: identifier.to_string(),
                headers: HashMap::new(),
            })
        } else {
            None
        }
    }
}

impl Default for NotifyTarget {
    fn default() -> Self {
        NotifyTarget::Log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{FailureReason, Verdict};
    use chrono::TimeZone;

    fn failed_record() -> CheckRecord {
        CheckRecord::from_verdict(
            &Verdict::Failure(FailureReason::InvalidStatus { actual: 502 }),
            340,
            Utc.with_ymd_and_hms(2026, 10, 16, 8, 15, 0).unwrap(),
        )
    }

    #[test]
    fn test_alert_text() {
        let alert = Alert::from_record("https://example.com", &failed_record());

        assert_eq!(alert.subject(), "Website Issue: https://example.com");
        assert_eq!(
            alert.message(),
            "Website: https://example.com\nStatus: FAILURE\nError: Invalid status: 502\n\
             Checked at: 2026-10-16T08:15:00.000Z\nResponse time: 340ms"
        );
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(NotifyTarget::parse("log"), Some(NotifyTarget::Log));
        assert_eq!(
            NotifyTarget::parse("https://hooks.example.com/abc"),
            Some(NotifyTarget::Webhook {
                url: "https://hooks.example.com/abc".to_string(),
                headers: HashMap::new(),
            })
        );
        assert_eq!(NotifyTarget::parse("arn:aws:sns:topic"), None);
    }
}
