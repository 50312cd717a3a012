use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct PartitionStats {
    pub partition: usize,
    pub distinct_keys: usize,
    pub keys_reduced: usize,
    pub values_pulled: u64,
    /// Values a Reduce callback never pulled; discarded at release.
    pub residual_values: u64,
}

impl PartitionStats {
    pub fn new(partition: usize) -> Self {
        Self {
            partition,
            ..Default::default()
        }
    }
}

/// Summary of one completed run.
#[derive(Clone, Debug, Serialize)]
pub struct RunStats {
    pub started_at: DateTime<Local>,
    pub units: usize,
    pub units_per_mapper: Vec<usize>,
    pub emits: u64,
    pub dropped_emits: u64,
    pub map_elapsed_ms: u128,
    pub reduce_elapsed_ms: u128,
    pub partitions: Vec<PartitionStats>,
}

impl RunStats {
    pub fn distinct_keys(&self) -> usize {
        self.partitions.iter().map(|p| p.distinct_keys).sum()
    }

    pub fn values_pulled(&self) -> u64 {
        self.partitions.iter().map(|p| p.values_pulled).sum()
    }

    pub fn residual_values(&self) -> u64 {
        self.partitions.iter().map(|p| p.residual_values).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
