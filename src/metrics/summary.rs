//! Calendar-month uptime summary

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{timestamp_format, CheckRecord, CheckStatus};
use crate::probe::INVALID_STATUS_MARKER;

/// Aggregate metrics for the current calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    /// Percentage of successful checks, two decimals; 0 with no checks
    pub uptime: f64,
    /// Failures whose message reports an unexpected status code
    pub invalid_status_count: usize,
    /// Rounded mean response time over readable values
    pub avg_response_time: u64,
    pub total_checks: usize,
    pub successful_checks: usize,
    pub failed_checks: usize,
    /// When this summary was computed
    #[serde(with = "timestamp_format")]
    pub last_updated: DateTime<Utc>,
}

/// Summarise the records that fall in `now`'s UTC calendar month.
///
/// This is a calendar boundary, not a rolling 30-day window: on the 1st of
/// the month only that day's checks count.
pub fn monthly_metrics(records: &[CheckRecord], now: DateTime<Utc>) -> MetricsSummary {
    let month: Vec<&CheckRecord> = records
        .iter()
        .filter(|r| same_month(&r.timestamp, &now))
        .collect();

    let total_checks = month.len();
    let successful_checks = month
        .iter()
        .filter(|r| r.status == CheckStatus::Success)
        .count();
    let failed_checks = month
        .iter()
        .filter(|r| r.status == CheckStatus::Failure)
        .count();
    let invalid_status_count = month
        .iter()
        .filter(|r| r.error_message.contains(INVALID_STATUS_MARKER))
        .count();

    let uptime = if total_checks > 0 {
        round2(successful_checks as f64 / total_checks as f64 * 100.0)
    } else {
        0.0
    };

    // Summed in u128 so extreme stored values cannot overflow
    let (sum, count) = month
        .iter()
        .filter_map(|r| r.response_time)
        .fold((0u128, 0u128), |(sum, count), ms| (sum + u128::from(ms), count + 1));
    let avg_response_time = if count > 0 {
        u64::try_from((sum + count / 2) / count).unwrap_or(u64::MAX)
    } else {
        0
    };

    MetricsSummary {
        uptime,
        invalid_status_count,
        avg_response_time,
        total_checks,
        successful_checks,
        failed_checks,
        last_updated: now,
    }
}

fn same_month(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    timestamp.year() == now.year() && timestamp.month() == now.month()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
