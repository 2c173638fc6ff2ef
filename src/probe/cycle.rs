//! One probe cycle: probe, classify, store, alert

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;

use super::classifier::classify;
use super::config::ProbeConfig;
use super::executor::{ProbeError, ProbeExecutor};
use crate::alerts::{Alert, AlertNotifier, NotifierError};
use crate::data::{CheckRecord, CheckStatus};
use crate::storage::{ResultStore, StoreError};

/// What a cycle reports back to whoever triggered it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSummary {
    pub status: CheckStatus,
    pub response_time: u64,
    pub error_message: String,
    /// Set when the record could not be stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
    /// Set when the failure alert could not be delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_error: Option<String>,
}

/// Timeouts applied to the store and notifier calls of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTimeouts {
    pub store: Duration,
    pub notify: Duration,
}

impl Default for CycleTimeouts {
    fn default() -> Self {
        Self {
            store: Duration::from_secs(5),
            notify: Duration::from_secs(5),
        }
    }
}

/// Runs probe cycles against one target.
///
/// Cycles never overlap: each one holds `running` for its whole duration.
pub struct ProbeCycle {
    config: ProbeConfig,
    executor: ProbeExecutor,
    store: Arc<dyn ResultStore>,
    notifier: Arc<dyn AlertNotifier>,
    timeouts: CycleTimeouts,
    running: Mutex<()>,
}

impl ProbeCycle {
    pub fn new(
        config: ProbeConfig,
        store: Arc<dyn ResultStore>,
        notifier: Arc<dyn AlertNotifier>,
        timeouts: CycleTimeouts,
    ) -> Result<Self, ProbeError> {
        let executor = ProbeExecutor::new(&config)?;

        Ok(Self {
            config,
            executor,
            store,
            notifier,
            timeouts,
            running: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run a cycle, waiting for any in-flight cycle to finish first
    pub async fn run_once(&self) -> CycleSummary {
        let _running = self.running.lock().await;
        self.run_exclusive().await
    }

    /// Run a cycle unless one is already in flight
    pub async fn try_run_once(&self) -> Option<CycleSummary> {
        let _running = self.running.try_lock().ok()?;
        Some(self.run_exclusive().await)
    }

    async fn run_exclusive(&self) -> CycleSummary {
        let outcome = self.executor.execute().await;
        let verdict = classify(&outcome, &self.config);
        let record = CheckRecord::from_verdict(&verdict, outcome.elapsed_ms, Utc::now());

        match verdict.reason() {
            None => tracing::info!(
                url = %self.config.url,
                response_time_ms = outcome.elapsed_ms,
                "Check succeeded"
            ),
            Some(reason) => tracing::warn!(
                url = %self.config.url,
                response_time_ms = outcome.elapsed_ms,
                reason = %reason,
                "Check failed"
            ),
        }

        // Persistence and notification fail independently; a store error
        // must not suppress the alert.
        let persist_error = match self.persist(&record).await {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(
                    store = %self.store.location(),
                    record_id = %record.id,
                    error = %e,
                    "Failed to store check record"
                );
                Some(e.to_string())
            }
        };

        let notify_error = if record.status.is_failure() {
            match self.alert(&record).await {
                Ok(()) => None,
                Err(e) => {
                    tracing::error!(
                        record_id = %record.id,
                        error = %e,
                        "Failed to send alert"
                    );
                    Some(e.to_string())
                }
            }
        } else {
            None
        };

        CycleSummary {
            status: record.status,
            response_time: outcome.elapsed_ms,
            error_message: record.error_message,
            persist_error,
            notify_error,
        }
    }

    async fn persist(&self, record: &CheckRecord) -> Result<(), StoreError> {
        match tokio::time::timeout(self.timeouts.store, self.store.append(record)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.timeouts.store.as_millis() as u64)),
        }
    }

    async fn alert(&self, record: &CheckRecord) -> Result<(), NotifierError> {
        let alert = Alert::from_record(&self.config.url, record);
        match tokio::time::timeout(self.timeouts.notify, self.notifier.notify(&alert)).await {
            Ok(result) => result,
            Err(_) => Err(NotifierError::Timeout(self.timeouts.notify.as_millis() as u64)),
        }
    }
}
