use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bookkeeping row written by every successful bulk load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRun {
    /// Pipeline work-item id of the run.
    pub run_id: String,
    pub loaded_at: DateTime<Utc>,
    pub source_rows: u64,
    pub entities: u64,
    pub addresses: u64,
}

impl LoadRun {
    #[must_use]
    pub fn new(run_id: impl Into<String>, source_rows: u64, entities: u64, addresses: u64) -> Self {
        Self {
            run_id: run_id.into(),
            loaded_at: Utc::now(),
            source_rows,
            entities,
            addresses,
        }
    }
}
