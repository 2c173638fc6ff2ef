//! Probe pipeline: executor, classifier, cycle and scheduler
//!
//! A cycle issues one request to the target, classifies the outcome, appends
//! a [`CheckRecord`](crate::data::CheckRecord) to the store and, for
//! failures only, sends an alert.

pub mod classifier;
pub mod config;
pub mod cycle;
pub mod executor;
pub mod scheduler;

pub use classifier::{classify, classify_response, FailureReason, Verdict, INVALID_STATUS_MARKER};
pub use config::ProbeConfig;
pub use cycle::{CycleSummary, CycleTimeouts, ProbeCycle};
pub use executor::{ProbeError, ProbeExecutor, ProbeOutcome, ProbeResponse};
pub use scheduler::ProbeScheduler;
