use serde::{Deserialize, Serialize};

/// Options for the generation engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Seed for reproducible runs; a random seed is drawn when absent.
    pub seed: Option<u64>,
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub rows_requested: u64,
    pub rows_generated: u64,
    /// Unique-field attempts beyond the first.
    pub retries: u64,
    /// Values replaced by the exhaustion marker.
    pub exhausted_values: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub job_name: String,
    pub seed: u64,
    pub tables: Vec<TableReport>,
    pub retries_total: u64,
    /// In-band strategy errors committed as field values.
    pub strategy_errors: u64,
    pub exhausted_total: u64,
    pub duration_ms: u64,
    /// Filled in by the output layer after rendering.
    pub bytes_written: u64,
}

impl GenerationReport {
    pub fn new(job_name: &str, seed: u64) -> Self {
        Self {
            job_name: job_name.to_string(),
            seed,
            tables: Vec::new(),
            retries_total: 0,
            strategy_errors: 0,
            exhausted_total: 0,
            duration_ms: 0,
            bytes_written: 0,
        }
    }
}
