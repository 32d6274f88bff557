//! Unique identifiers for taskdash entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for one aggregation cycle.
///
/// Every view activation gets a fresh cycle; the ID ties the per-source log
/// lines of that cycle to the outcome it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleId(Ulid);

impl CycleId {
    /// Generate a new CycleId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CycleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_ids_are_unique() {
        assert_ne!(CycleId::new(), CycleId::new());
    }

    #[test]
    fn test_cycle_id_logs_and_serializes_alike() {
        let id = CycleId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 26);
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::Value::String(text));
    }
}
