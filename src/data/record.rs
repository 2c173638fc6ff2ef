//! Check records written once per probe cycle

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::probe::Verdict;

/// Outcome of a single probe cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Success,
    Failure,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Success => "SUCCESS",
            CheckStatus::Failure => "FAILURE",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CheckStatus::Failure)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored probe result.
///
/// Records are immutable once appended. `status` is `Failure` exactly when
/// `error_message` is non-empty; [`CheckRecord::from_verdict`] is the only
/// constructor the probe cycle uses, which keeps the two in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecord {
    /// Opaque unique ID (UUID v4)
    pub id: String,
    /// When the check completed, millisecond precision
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
    pub status: CheckStatus,
    /// Elapsed milliseconds; `None` when a stored value could not be read
    #[serde(default, with = "response_time_format")]
    pub response_time: Option<u64>,
    #[serde(default)]
    pub error_message: String,
}

impl CheckRecord {
    /// Build a fresh record for a classified probe
    pub fn from_verdict(verdict: &Verdict, response_time_ms: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: timestamp.trunc_subsecs(3),
            status: verdict.status(),
            response_time: Some(response_time_ms),
            error_message: verdict.message(),
        }
    }

    /// Response time with unreadable values reported as 0
    pub fn response_time_or_zero(&self) -> u64 {
        self.response_time.unwrap_or(0)
    }
}

/// RFC 3339 timestamps in UTC with millisecond precision and a `Z` suffix.
///
/// Strings in this form sort in the same order as the instants they encode.
pub mod timestamp_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(timestamp: &DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(timestamp))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Lenient reader for stored response times.
///
/// Accepts integers, floats and numeric strings; anything negative, NaN or
/// non-numeric reads as `None` instead of failing the whole record.
mod response_time_format {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ms) => serializer.serialize_u64(*ms),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(match raw {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_millis)),
            Value::String(s) => parse_millis(&s),
            _ => None,
        })
    }

    fn parse_millis(raw: &str) -> Option<u64> {
        let trimmed = raw.trim();
        trimmed
            .parse::<u64>()
            .ok()
            .or_else(|| trimmed.parse::<f64>().ok().and_then(whole_millis))
    }

    fn whole_millis(value: f64) -> Option<u64> {
        if value.is_finite() && value >= 0.0 {
            Some(value.trunc() as u64)
        } else {
            None
        }
    }
}
