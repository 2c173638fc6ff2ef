//! Uptime Monitor: periodic HTTP health checks with a metrics API
//!
//! Probes a single target URL on a fixed interval, classifies each response
//! against an expected status code, an optional body keyword and a latency
//! threshold, keeps an append-only history of check records, alerts on
//! failures, and serves aggregate views of the history over HTTP.
//!
//! # Features
//!
//! - **Probe cycle**: request, classify, persist, alert
//! - **Pluggable storage**: in-memory or JSON Lines file
//! - **Alerts**: log events or webhook POSTs on every failed check
//! - **Metrics API**: monthly uptime, recent pings, full history
//! - **Dashboard**: embedded single-page UI
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use uptime_monitor::alerts::Notifier;
//! use uptime_monitor::probe::{CycleTimeouts, ProbeConfig, ProbeCycle};
//! use uptime_monitor::storage::MemoryStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProbeConfig::new("https://example.com")
//!     .with_keyword("Example Domain")
//!     .with_max_response_time(2000);
//!
//! let cycle = ProbeCycle::new(
//!     config,
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(Notifier::default()),
//!     CycleTimeouts::default(),
//! )?;
//!
//! let summary = cycle.run_once().await;
//! println!("{} in {}ms", summary.status, summary.response_time);
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod api;
pub mod config;
pub mod data;
pub mod metrics;
pub mod probe;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigError, MonitorConfig};
pub use data::{CheckRecord, CheckStatus};
pub use metrics::{monthly_metrics, recent_pings, MetricsSummary, RecentPing};
pub use probe::{CycleSummary, ProbeConfig, ProbeCycle, ProbeScheduler, Verdict};
pub use storage::{open_store, ResultStore, StoreError, StoreLocation};
