//! Rate configuration error types.

use rust_decimal::Decimal;
use tessera_shared::types::PeriodError;
use thiserror::Error;

/// Errors raised when validating monthly configuration.
#[derive(Debug, Error)]
pub enum RateError {
    /// Month or year out of range.
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),

    /// Working days outside 1-31.
    #[error("Working days must be between 1 and 31, got {0}")]
    InvalidWorkingDays(u32),

    /// Potential hours must be strictly positive.
    #[error("Potential hours must be greater than zero, got {0}")]
    InvalidPotentialHours(Decimal),
}
