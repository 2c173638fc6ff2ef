//! Read-side aggregation
//!
//! Every function here is pure: it takes the full record set from
//! [`ResultStore::scan_all`](crate::storage::ResultStore::scan_all) plus an
//! explicit `now`, and nothing is cached between calls.

pub mod summary;
pub mod window;

pub use summary::{monthly_metrics, MetricsSummary};
pub use window::{newest_first, recent_pings, RecentPing, RECENT_WINDOW_MINUTES};
