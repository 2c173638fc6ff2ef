//! Notification handlers for failed checks

use std::collections::HashMap;

use async_trait::async_trait;

use super::config::{Alert, NotifyTarget};

/// Sends alerts for failed checks
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifierError>;
}

/// Notifier delivering to the configured destination
pub struct Notifier {
    client: reqwest::Client,
    target: NotifyTarget,
}

impl Notifier {
    pub fn new(target: NotifyTarget) -> Self {
        Self {
            client: reqwest::Client::new(),
            target,
        }
    }

    pub fn target(&self) -> &NotifyTarget {
        &self.target
    }

    /// Send webhook notification
    async fn send_webhook(
        &self,
        alert: &Alert,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<(), NotifierError> {
        let payload = serde_json::json!({
            "subject": alert.subject(),
            "message": alert.message(),
            "alert": alert,
        });

        let mut request = self.client.post(url).json(&payload);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotifierError::Webhook(format!("Failed to send webhook: {}", e)))?;

        if !response.status().is_success() {
            return Err(NotifierError::Webhook(format!(
                "Webhook returned status {}",
                response.status()
            )));
        }

        tracing::debug!(url = %url, "Webhook notification sent");

        Ok(())
    }
}

#[async_trait]
impl AlertNotifier for Notifier {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifierError> {
        match &self.target {
            NotifyTarget::Log => {
                tracing::warn!(
                    target_url = %alert.target,
                    status = %alert.status,
                    response_time_ms = alert.response_time,
                    "{}: {}",
                    alert.subject(),
                    alert.error_message
                );
                Ok(())
            }
            NotifyTarget::Webhook { url, headers } => self.send_webhook(alert, url, headers).await,
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NotifyTarget::Log)
    }
}

/// Notifier errors
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Webhook error: {0}")]
    Webhook(String),

    #[error("Notification timed out after {0}ms")]
    Timeout(u64),
}
