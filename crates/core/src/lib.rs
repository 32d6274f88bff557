//! taskdash core data models.
//!
//! This crate defines the analytics payloads, the per-cycle aggregation
//! outcome and the metrics derived from it. It performs no I/O.

#![warn(missing_docs)]

// Core identities
mod id;

// Backend payloads
mod analytics;

// Aggregation
mod outcome;
mod metrics;

// Re-exports
pub use id::CycleId;

pub use analytics::{
    CompletionStats, StatusCount, WeeklyCompletion, ProductivityPatterns, HourlyCount,
    DurationAnalysis, SUCCESS_STATUS,
};
pub use outcome::{
    AggregateOutcome, OutcomeStatus, SourceFailure, SourceKind, SourceResult,
    ALL_FAILED_MESSAGE, PARTIAL_MESSAGE,
};
pub use metrics::{DerivedMetrics, derive_metrics, format_avg_completion};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
