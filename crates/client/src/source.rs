//! Analytics source trait abstraction.

use async_trait::async_trait;
use taskdash_core::{CompletionStats, DurationAnalysis, ProductivityPatterns};

/// Error type for analytics reads.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while reading from the analytics backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Request could not be sent or the response body could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Response body was not the expected JSON
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configured base URL is unusable
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}

/// The three independent reads the dashboard needs.
///
/// Implementations must be side-effect free; every call is an independent
/// read that may be issued concurrently with the other two.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    /// Fetch task completion statistics.
    async fn completion_stats(&self) -> Result<CompletionStats>;

    /// Fetch task creation and completion-time patterns.
    async fn productivity_patterns(&self) -> Result<ProductivityPatterns>;

    /// Fetch the task duration analysis.
    async fn duration_analysis(&self) -> Result<DurationAnalysis>;
}
