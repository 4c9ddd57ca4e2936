use chrono::{DateTime, Utc};
use columns_training::{
    arena::ArenaConfig,
    tournament::{FitnessSummary, GenerationReport},
};
use serde::Serialize;

/// Saved result of `columns evaluate`
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport<'a> {
    /// Timestamp when the evaluation finished
    pub evaluated_at: DateTime<Utc>,
    /// Display name of each strategy, indexed like the report statistics
    pub strategies: &'a [String],
    pub catalog_len: usize,
    pub config: &'a ArenaConfig,
    pub summary: Option<FitnessSummary>,
    pub report: &'a GenerationReport,
}
