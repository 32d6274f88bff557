//! Aggregation outcome - the result of one three-source read cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analytics::{CompletionStats, DurationAnalysis, ProductivityPatterns};
use crate::id::CycleId;
use crate::Time;

/// Shown when every source failed. Blocks the dashboard.
pub const ALL_FAILED_MESSAGE: &str = "Failed to load any analytics data. Please check that the backend server is running at http://localhost:8000.";

/// Shown above the dashboard when some sources failed.
pub const PARTIAL_MESSAGE: &str =
    "Some analytics data could not be loaded. Showing partial results.";

/// One of the three analytics reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Completion statistics
    CompletionStats,
    /// Productivity patterns
    ProductivityPatterns,
    /// Duration analysis
    DurationAnalysis,
}

impl SourceKind {
    /// All sources, in page order.
    pub const ALL: [SourceKind; 3] = [
        SourceKind::CompletionStats,
        SourceKind::ProductivityPatterns,
        SourceKind::DurationAnalysis,
    ];

    /// Stable name used in logs and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::CompletionStats => "completion_stats",
            SourceKind::ProductivityPatterns => "productivity_patterns",
            SourceKind::DurationAnalysis => "duration_analysis",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source read that did not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind} failed: {cause}")]
pub struct SourceFailure {
    /// Which read failed
    pub kind: SourceKind,

    /// Why it failed (transport, status, decode...)
    pub cause: String,
}

impl SourceFailure {
    /// Create a failure for a source.
    pub fn new(kind: SourceKind, cause: impl fmt::Display) -> Self {
        Self {
            kind,
            cause: cause.to_string(),
        }
    }
}

/// Outcome of one source read.
pub type SourceResult<T> = std::result::Result<T, SourceFailure>;

/// Overall classification of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Every source succeeded
    AllOk,
    /// At least one source failed, at least one succeeded
    PartialOk,
    /// Every source failed
    AllFailed,
}

impl OutcomeStatus {
    /// Classify from the number of failed sources out of `total`.
    pub fn classify(failed: usize, total: usize) -> Self {
        if failed == 0 {
            OutcomeStatus::AllOk
        } else if failed >= total {
            OutcomeStatus::AllFailed
        } else {
            OutcomeStatus::PartialOk
        }
    }

    /// User-facing status message, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            OutcomeStatus::AllOk => None,
            OutcomeStatus::PartialOk => Some(PARTIAL_MESSAGE),
            OutcomeStatus::AllFailed => Some(ALL_FAILED_MESSAGE),
        }
    }

    /// Whether the status replaces the dashboard with an error panel.
    pub fn is_blocking(&self) -> bool {
        matches!(self, OutcomeStatus::AllFailed)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::AllOk => write!(f, "all_ok"),
            OutcomeStatus::PartialOk => write!(f, "partial_ok"),
            OutcomeStatus::AllFailed => write!(f, "all_failed"),
        }
    }
}

/// Unified result of one aggregation cycle.
///
/// Exactly the sources that succeeded have their slot populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateOutcome {
    /// Cycle that produced this outcome
    pub cycle: CycleId,

    /// When the last source settled
    pub settled_at: Time,

    /// Completion statistics, if that read succeeded
    pub completion_stats: Option<CompletionStats>,

    /// Productivity patterns, if that read succeeded
    pub productivity_patterns: Option<ProductivityPatterns>,

    /// Duration analysis, if that read succeeded
    pub duration_analysis: Option<DurationAnalysis>,

    /// Overall classification
    pub status: OutcomeStatus,

    /// Failed reads, in source order
    pub failures: Vec<SourceFailure>,
}

impl AggregateOutcome {
    /// Fold three settled reads into an outcome.
    pub fn from_results(
        completion_stats: SourceResult<CompletionStats>,
        productivity_patterns: SourceResult<ProductivityPatterns>,
        duration_analysis: SourceResult<DurationAnalysis>,
    ) -> Self {
        let mut failures = Vec::new();
        let completion_stats = settle(completion_stats, &mut failures);
        let productivity_patterns = settle(productivity_patterns, &mut failures);
        let duration_analysis = settle(duration_analysis, &mut failures);
        let status = OutcomeStatus::classify(failures.len(), SourceKind::ALL.len());

        Self {
            cycle: CycleId::new(),
            settled_at: chrono::Utc::now(),
            completion_stats,
            productivity_patterns,
            duration_analysis,
            status,
            failures,
        }
    }

    /// Tag the outcome with the cycle that produced it.
    pub fn with_cycle(mut self, cycle: CycleId) -> Self {
        self.cycle = cycle;
        self
    }

    /// User-facing status message, if any.
    pub fn message(&self) -> Option<&'static str> {
        self.status.message()
    }

    /// Whether a given source failed this cycle.
    pub fn failed(&self, kind: SourceKind) -> bool {
        self.failures.iter().any(|f| f.kind == kind)
    }

    /// Number of populated payload slots.
    pub fn loaded_count(&self) -> usize {
        usize::from(self.completion_stats.is_some())
            + usize::from(self.productivity_patterns.is_some())
            + usize::from(self.duration_analysis.is_some())
    }
}

fn settle<T>(result: SourceResult<T>, failures: &mut Vec<SourceFailure>) -> Option<T> {
    match result {
        Ok(payload) => Some(payload),
        Err(failure) => {
            failures.push(failure);
            None
        }
    }
}
