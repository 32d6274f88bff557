//! Analytics payloads returned by the backend.
//!
//! Every collection field is optional: the backend may omit a section, and an
//! omitted section is not the same thing as an empty one. Chart-only sections
//! that arrive in an unexpected shape decode as absent rather than failing the
//! whole payload, and a `null` count reads as zero.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Status value that counts towards the success rate.
pub const SUCCESS_STATUS: &str = "success";

/// Task completion statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    /// Task counts per status
    #[serde(default)]
    pub status_distribution: Option<Vec<StatusCount>>,

    /// Completion counts per week, oldest first
    #[serde(default, deserialize_with = "lenient_section")]
    pub weekly_completion: Option<Vec<WeeklyCompletion>>,
}

/// Number of tasks in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// Status name (free-form, e.g. "success", "failure", "pending")
    pub status: String,

    /// Number of tasks in that status
    #[serde(default, deserialize_with = "null_as_zero")]
    pub count: u64,
}

impl StatusCount {
    /// Create a status count.
    pub fn new(status: impl Into<String>, count: u64) -> Self {
        Self {
            status: status.into(),
            count,
        }
    }

    /// Whether this entry counts as successful.
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

/// Completion figures for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCompletion {
    /// Week label as sent by the backend (usually the ISO date of its first day)
    pub week: String,

    /// Tasks completed that week
    #[serde(default, deserialize_with = "null_as_zero")]
    pub completed: u64,

    /// Tasks created that week
    #[serde(default)]
    pub total: Option<u64>,

    /// Completion rate, 0.0-1.0
    #[serde(default)]
    pub completion_rate: Option<f64>,
}

impl WeeklyCompletion {
    /// Completion rate for the week.
    ///
    /// Uses the backend's value when sent, otherwise `completed / total`.
    pub fn rate(&self) -> Option<f64> {
        if let Some(rate) = self.completion_rate.filter(|r| r.is_finite()) {
            return Some(rate.clamp(0.0, 1.0));
        }
        match self.total {
            Some(total) if total > 0 => Some((self.completed as f64 / total as f64).min(1.0)),
            _ => None,
        }
    }
}

/// When tasks get created and how long they take.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductivityPatterns {
    /// Average time from creation to completion, in hours
    #[serde(default)]
    pub avg_completion_time_hours: Option<f64>,

    /// Task creation counts per hour of day
    #[serde(default, deserialize_with = "lenient_section")]
    pub creation_hour_distribution: Option<Vec<HourlyCount>>,
}

/// Number of tasks created in one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyCount {
    /// Hour of day, 0-23
    pub hour: u8,

    /// Tasks created in that hour
    #[serde(default, deserialize_with = "null_as_zero")]
    pub count: u64,
}

/// Task duration analysis.
///
/// The dashboard never looks inside this payload; it hands it to the duration
/// chart as received. The default is JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationAnalysis(pub serde_json::Value);

impl DurationAnalysis {
    /// Borrow the raw payload.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Decode a chart section, treating a malformed one as absent.
fn lenient_section<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(raw) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(raw) {
        Ok(items) => Ok(Some(items)),
        Err(e) => {
            warn!("Ignoring malformed analytics section: {}", e);
            Ok(None)
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}
