//! Derived dashboard metrics.

use serde::{Deserialize, Serialize};

use crate::analytics::StatusCount;
use crate::outcome::AggregateOutcome;

/// Headline numbers computed from the completion statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Share of tasks in the "success" status, as a whole percentage 0-100
    pub success_rate: u8,

    /// Sum of all status counts
    pub total_tasks: u64,
}

impl DerivedMetrics {
    /// Compute metrics from a status distribution.
    ///
    /// Absent and empty distributions both yield zeros. The rate rounds half
    /// away from zero (`f64::round`), so 33.33% is 33 and 66.67% is 67.
    pub fn from_status_distribution(distribution: Option<&[StatusCount]>) -> Self {
        let Some(distribution) = distribution else {
            return Self::default();
        };

        let total_tasks = distribution
            .iter()
            .fold(0u64, |sum, item| sum.saturating_add(item.count));

        // Summing keeps duplicate "success" rows order-independent.
        let success_count = distribution
            .iter()
            .filter(|item| item.is_success())
            .fold(0u64, |sum, item| sum.saturating_add(item.count));

        let success_rate = if total_tasks > 0 {
            ((success_count as f64 / total_tasks as f64) * 100.0)
                .round()
                .clamp(0.0, 100.0) as u8
        } else {
            0
        };

        Self {
            success_rate,
            total_tasks,
        }
    }
}

/// Compute the dashboard metrics for an outcome.
///
/// Only the completion statistics are consulted; any missing level yields the
/// zero defaults.
pub fn derive_metrics(outcome: &AggregateOutcome) -> DerivedMetrics {
    DerivedMetrics::from_status_distribution(
        outcome
            .completion_stats
            .as_ref()
            .and_then(|stats| stats.status_distribution.as_deref()),
    )
}

/// Format the average completion time card.
///
/// One decimal place when the backend sent a finite value, `"0"` otherwise.
pub fn format_avg_completion(hours: Option<f64>) -> String {
    match hours {
        Some(hours) if hours.is_finite() => format!("{hours:.1}"),
        _ => "0".to_string(),
    }
}
