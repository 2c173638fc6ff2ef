//! Failure alerting
//!
//! An alert is sent for every check that ends in a failure. Delivery is
//! fire-and-forget: errors are reported to the caller but never retried.

pub mod config;
pub mod notifier;

pub use config::{Alert, NotifyTarget};
pub use notifier::{AlertNotifier, Notifier, NotifierError};
