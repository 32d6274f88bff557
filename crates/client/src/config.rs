//! Client configuration.

use std::time::Duration;

/// Default analytics backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Path of the completion statistics endpoint.
pub const COMPLETION_STATS_PATH: &str = "/api/analytics/completion-stats";

/// Path of the productivity patterns endpoint.
pub const PRODUCTIVITY_PATTERNS_PATH: &str = "/api/analytics/productivity-patterns";

/// Path of the duration analysis endpoint.
pub const DURATION_ANALYSIS_PATH: &str = "/api/analytics/duration-analysis";

/// HTTP analytics client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without the `/api/...` suffix
    pub base_url: String,

    /// Per-request timeout. `None` waits for the backend indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Full URL of an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
