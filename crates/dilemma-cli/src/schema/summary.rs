use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dilemma_engine::GenerationStats;
use serde::{Deserialize, Serialize};

/// Record of one `run` invocation, written as JSON on request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Timestamp when the run finished (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Grid file the run started from
    pub input: PathBuf,
    /// Temptation payoff `b`
    pub temptation: f64,
    /// Number of generations advanced
    pub steps: usize,
    pub rows: usize,
    pub cols: usize,
    /// Statistics of generations `0..=steps`, in order
    pub generations: Vec<GenerationStats>,
}
