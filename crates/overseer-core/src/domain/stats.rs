//! Report shapes produced by the pattern analyzer.

use serde::{Deserialize, Serialize};

/// Success rate of one subgroup of jobs, compared to the overall rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPattern {
    /// Human-readable predicate, e.g. `Job name length > 10`.
    pub pattern: String,
    pub match_count: usize,
    pub success_rate: f64,
    /// Signed, rounded percentage with a trailing `%`, e.g. `33%`, `-100%`.
    pub difference_from_average: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total_jobs: usize,
    pub overall_success_rate: f64,
    pub patterns: Vec<JobPattern>,
}
