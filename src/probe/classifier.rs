//! Turns a raw probe outcome into a verdict

use std::fmt;

use super::config::ProbeConfig;
use super::executor::ProbeOutcome;
use crate::data::CheckStatus;

/// Prefix shared by every invalid-status message. The monthly
/// `invalidStatusCount` metric matches on this text.
pub const INVALID_STATUS_MARKER: &str = "Invalid status";

/// Why a probe was judged a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Status code differed from the expected one
    InvalidStatus { actual: u16 },
    /// Body did not contain the expected keyword
    MissingKeyword { keyword: String },
    /// Response arrived, but slower than allowed
    SlowResponse { elapsed_ms: u64, max_ms: u64 },
    /// No usable response (connect failure, timeout, broken body)
    Transport { detail: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InvalidStatus { actual } => {
                write!(f, "{}: {}", INVALID_STATUS_MARKER, actual)
            }
            FailureReason::MissingKeyword { keyword } => {
                write!(f, "Keyword \"{}\" not found in response", keyword)
            }
            FailureReason::SlowResponse { elapsed_ms, max_ms } => write!(
                f,
                "Response time too high: {}ms (max allowed: {}ms)",
                elapsed_ms, max_ms
            ),
            FailureReason::Transport { detail } => write!(f, "Error: {}", detail),
        }
    }
}

/// Classification of one probe cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failure(FailureReason),
}

impl Verdict {
    pub fn status(&self) -> CheckStatus {
        match self {
            Verdict::Success => CheckStatus::Success,
            Verdict::Failure(_) => CheckStatus::Failure,
        }
    }

    /// Empty on success, the failure reason otherwise
    pub fn message(&self) -> String {
        match self {
            Verdict::Success => String::new(),
            Verdict::Failure(reason) => reason.to_string(),
        }
    }

    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            Verdict::Success => None,
            Verdict::Failure(reason) => Some(reason),
        }
    }
}

/// Classify a received response.
///
/// Checks run in a fixed order (status, keyword, latency) and stop at the
/// first violation, so the verdict names only that one.
pub fn classify_response(
    status_code: u16,
    body: &str,
    elapsed_ms: u64,
    config: &ProbeConfig,
) -> Verdict {
    if status_code != config.expected_status {
        return Verdict::Failure(FailureReason::InvalidStatus {
            actual: status_code,
        });
    }

    if !body.contains(config.expected_keyword.as_str()) {
        return Verdict::Failure(FailureReason::MissingKeyword {
            keyword: config.expected_keyword.clone(),
        });
    }

    if elapsed_ms > config.max_response_time_ms {
        return Verdict::Failure(FailureReason::SlowResponse {
            elapsed_ms,
            max_ms: config.max_response_time_ms,
        });
    }

    Verdict::Success
}

/// Classify a probe outcome, including transport failures
pub fn classify(outcome: &ProbeOutcome, config: &ProbeConfig) -> Verdict {
    match &outcome.result {
        Ok(response) => {
            classify_response(response.status, &response.body, outcome.elapsed_ms, config)
        }
        Err(e) => Verdict::Failure(FailureReason::Transport {
            detail: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::executor::{ProbeError, ProbeResponse};

    fn config() -> ProbeConfig {
        ProbeConfig::new("https://example.com")
            .with_expected_status(200)
            .with_keyword("Welcome")
            .with_max_response_time(1000)
    }

    #[test]
    fn test_healthy_response_is_success() {
        let verdict = classify_response(200, "<h1>Welcome home</h1>", 250, &config());
        assert_eq!(verdict, Verdict::Success);
        assert_eq!(verdict.status(), CheckStatus::Success);
        assert_eq!(verdict.message(), "");
    }

    #[test]
    fn test_latency_at_threshold_is_success() {
        let verdict = classify_response(200, "Welcome", 1000, &config());
        assert_eq!(verdict, Verdict::Success);
    }

    #[test]
    fn test_invalid_status() {
        let verdict = classify_response(503, "Welcome", 100, &config());
        assert_eq!(verdict.status(), CheckStatus::Failure);
        assert_eq!(verdict.message(), "Invalid status: 503");
    }

    #[test]
    fn test_missing_keyword() {
        let verdict = classify_response(200, "maintenance page", 100, &config());
        assert_eq!(
            verdict.message(),
            "Keyword \"Welcome\" not found in response"
        );
    }

    #[test]
    fn test_slow_response() {
        let verdict = classify_response(200, "Welcome", 1001, &config());
        assert_eq!(
            verdict.message(),
            "Response time too high: 1001ms (max allowed: 1000ms)"
        );
    }

    #[test]
    fn test_status_check_wins_over_latency() {
        let verdict = classify_response(500, "Welcome", 9000, &config());
        assert_eq!(
            verdict.reason(),
            Some(&FailureReason::InvalidStatus { actual: 500 })
        );
        assert_eq!(verdict.message(), "Invalid status: 500");
    }

    #[test]
    fn test_all_checks_failing_reports_status_only() {
        let verdict = classify_response(404, "not found", 9000, &config());
        assert_eq!(verdict.message(), "Invalid status: 404");
    }

    #[test]
    fn test_keyword_check_wins_over_latency() {
        let verdict = classify_response(200, "oops", 9000, &config());
        assert_eq!(
            verdict.reason(),
            Some(&FailureReason::MissingKeyword {
                keyword: "Welcome".to_string()
            })
        );
    }

    #[test]
    fn test_empty_keyword_matches_any_body() {
        let config = config().with_keyword("");
        assert_eq!(classify_response(200, "", 10, &config), Verdict::Success);
    }

    #[test]
    fn test_transport_error() {
        let outcome = ProbeOutcome {
            elapsed_ms: 10_000,
            result: Err(ProbeError::Timeout(10_000)),
        };
        let verdict = classify(&outcome, &config());
        assert_eq!(verdict.message(), "Error: request timed out after 10000ms");
    }

    #[test]
    fn test_classify_received_response() {
        let outcome = ProbeOutcome {
            elapsed_ms: 1500,
            result: Ok(ProbeResponse {
                status: 200,
                body: "Welcome".to_string(),
            }),
        };
        let verdict = classify(&outcome, &config());
        assert_eq!(
            verdict.reason(),
            Some(&FailureReason::SlowResponse {
                elapsed_ms: 1500,
                max_ms: 1000
            })
        );
    }

    #[test]
    fn test_invalid_status_message_carries_marker() {
        let message = FailureReason::InvalidStatus { actual: 418 }.to_string();
        assert!(message.contains(INVALID_STATUS_MARKER));
        for other in [
            FailureReason::MissingKeyword { keyword: "x".into() },
            FailureReason::SlowResponse { elapsed_ms: 2, max_ms: 1 },
            FailureReason::Transport { detail: "refused".into() },
        ] {
            assert!(!other.to_string().contains(INVALID_STATUS_MARKER));
        }
    }
}
