//! Issues the single outbound request of a probe cycle

use std::time::{Duration, Instant};

use super::config::ProbeConfig;

/// Status and body of a received response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

/// Raw result of one probe, before classification
#[derive(Debug)]
pub struct ProbeOutcome {
    /// Milliseconds from request start to full body receipt or failure
    pub elapsed_ms: u64,
    pub result: Result<ProbeResponse, ProbeError>,
}

/// Executes probes against the configured target
pub struct ProbeExecutor {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl ProbeExecutor {
    /// Create an executor for the target in `config`
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        // Redirects are reported as-is so the status check sees them
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("uptime-monitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProbeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            timeout: config.timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Perform exactly one request. Never retries; a failed request is a
    /// normal outcome carrying the elapsed time up to the failure.
    pub async fn execute(&self) -> ProbeOutcome {
        let start = Instant::now();

        let result = match tokio::time::timeout(self.timeout, self.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout.as_millis() as u64)),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => tracing::debug!(
                url = %self.url,
                status = response.status,
                elapsed_ms,
                "Probe response received"
            ),
            Err(e) => tracing::debug!(
                url = %self.url,
                error = %e,
                elapsed_ms,
                "Probe request failed"
            ),
        }

        ProbeOutcome { elapsed_ms, result }
    }

    async fn fetch(&self) -> Result<ProbeResponse, ProbeError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ProbeError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProbeError::Body(e.to_string()))?;

        Ok(ProbeResponse { status, body })
    }
}

/// Transport-level probe failures
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    #[error("{0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_execute_returns_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<h1>Welcome</h1>")
            .create_async()
            .await;

        let executor = ProbeExecutor::new(&ProbeConfig::new(server.url())).unwrap();
        let outcome = executor.execute().await;

        let response = outcome.result.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<h1>Welcome</h1>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_a_response_not_a_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(503)
            .with_body("down")
            .create_async()
            .await;

        let url = format!("{}/health", server.url());
        let executor = ProbeExecutor::new(&ProbeConfig::new(url)).unwrap();
        let outcome = executor.execute().await;

        assert_eq!(outcome.result.unwrap().status, 503);
    }

    #[tokio::test]
    async fn test_redirects_are_not_followed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(301)
            .with_header("location", "/elsewhere")
            .create_async()
            .await;

        let executor = ProbeExecutor::new(&ProbeConfig::new(server.url())).unwrap();
        assert_eq!(executor.execute().await.result.unwrap().status, 301);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let executor =
            ProbeExecutor::new(&ProbeConfig::new(format!("http://{}", addr))).unwrap();
        let outcome = executor.execute().await;

        assert!(matches!(outcome.result, Err(ProbeError::Request(_))));
    }

    #[tokio::test]
    async fn test_unresponsive_target_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold connections without ever answering
        let hold = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = ProbeConfig::new(format!("http://{}", addr))
            .with_timeout(Duration::from_millis(200));
        let executor = ProbeExecutor::new(&config).unwrap();
        let outcome = executor.execute().await;

        assert!(matches!(outcome.result, Err(ProbeError::Timeout(200))));
        assert!(outcome.elapsed_ms >= 200);
        hold.abort();
    }
}
