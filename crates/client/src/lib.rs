//! Analytics backend access for taskdash.
//!
//! This crate provides a trait-based source interface with an HTTP
//! implementation over the backend's JSON endpoints.

#![warn(missing_docs)]

pub mod source;
pub mod config;
pub mod http;

pub use source::{AnalyticsSource, ClientError, Result};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, COMPLETION_STATS_PATH, PRODUCTIVITY_PATTERNS_PATH,
    DURATION_ANALYSIS_PATH,
};
pub use http::HttpAnalyticsClient;
