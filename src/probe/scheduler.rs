use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use super::cycle::ProbeCycle;

/// Background worker that runs a probe cycle on a fixed period
pub struct ProbeScheduler {
    cycle: Arc<ProbeCycle>,
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl ProbeScheduler {
    pub fn new(cycle: Arc<ProbeCycle>, interval: Duration) -> Self {
        Self {
            cycle,
            interval,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the background worker. The first cycle runs immediately; a
    /// cycle that overruns the period delays the next one rather than
    /// triggering a burst.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            tracing::info!(
                url = %self.cycle.config().url,
                "Probe scheduler started with interval {:?}",
                self.interval
            );

            let mut interval = time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            while self.running.load(Ordering::SeqCst) {
                interval.tick().await;

                if !self.running.load(Ordering::SeqCst) {
                    break;
                }

                let summary = self.cycle.run_once().await;
                tracing::debug!(
                    status = %summary.status,
                    response_time_ms = summary.response_time,
                    "Scheduled probe cycle finished"
                );
            }

            tracing::info!("Probe scheduler stopped");
        })
    }

    /// Stop the worker
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if worker is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::Notifier;
    use crate::probe::{CycleTimeouts, ProbeConfig};
    use crate::storage::{MemoryStore, ResultStore};

    #[tokio::test]
    async fn test_scheduler_runs_cycles_until_stopped() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("ok")
            .expect_at_least(1)
            .create_async()
            .await;

        let store = Arc::new(MemoryStore::new());
        let cycle = Arc::new(
            ProbeCycle::new(
                ProbeConfig::new(server.url()),
                store.clone(),
                Arc::new(Notifier::default()),
                CycleTimeouts::default(),
            )
            .unwrap(),
        );

        let scheduler = Arc::new(ProbeScheduler::new(cycle, Duration::from_millis(50)));
        let handle = Arc::clone(&scheduler).start();
        assert!(scheduler.is_running());

        tokio::time::sleep(Duration::from_millis(300)).await;
        scheduler.stop();
        assert!(!scheduler.is_running());

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();

        let stored = store.scan_all().await.unwrap().len();
        assert!(stored >= 2, "expected at least two cycles, got {}", stored);
    }
}
