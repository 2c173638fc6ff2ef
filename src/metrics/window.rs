//! Recent-window and full-history views over the record set

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{timestamp_format, CheckRecord, CheckStatus};

/// Lookback of the recent-pings view
pub const RECENT_WINDOW_MINUTES: i64 = 30;

/// A record as shown in the recent-pings view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPing {
    pub id: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
    pub status: CheckStatus,
    pub response_time: u64,
    pub error_message: String,
}

impl From<CheckRecord> for RecentPing {
    fn from(record: CheckRecord) -> Self {
        Self {
            response_time: record.response_time_or_zero(),
            id: record.id,
            timestamp: record.timestamp,
            status: record.status,
            error_message: record.error_message,
        }
    }
}

/// Records from the last 30 minutes, newest first
pub fn recent_pings(records: Vec<CheckRecord>, now: DateTime<Utc>) -> Vec<RecentPing> {
    let cutoff = now - Duration::minutes(RECENT_WINDOW_MINUTES);

    let recent = records
        .into_iter()
        .filter(|record| record.timestamp >= cutoff)
        .collect();

    newest_first(recent).into_iter().map(RecentPing::from).collect()
}

/// Sort by timestamp descending. The sort is stable, so records with equal
/// timestamps keep the order the store returned them in.
pub fn newest_first(mut records: Vec<CheckRecord>) -> Vec<CheckRecord> {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}
