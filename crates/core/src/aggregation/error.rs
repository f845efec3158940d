//! Aggregation error types.

use tessera_shared::types::PeriodError;
use thiserror::Error;

/// Errors raised by the Cost Aggregator.
///
/// Missing or mismatched baselines and zero budgets are not errors; they are
/// reported on the panels themselves.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// Monthly series limit outside 1-12.
    #[error("Month limit must be between 1 and 12, got {0}")]
    InvalidLimit(u32),

    /// Year outside the supported range.
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),
}
