//! Allocation error types.

use rust_decimal::Decimal;
use tessera_shared::types::PeriodError;
use thiserror::Error;

/// Errors raised when validating an allocation.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Month or year out of range.
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),

    /// Occupancy fraction below zero.
    #[error("Occupancy fraction cannot be negative, got {0}")]
    NegativeOccupancy(Decimal),

    /// Occupancy fraction above [`super::MAX_OCCUPANCY`].
    #[error("Occupancy fraction cannot exceed {max}, got {value}")]
    OccupancyTooLarge {
        /// Submitted fraction.
        value: Decimal,
        /// Upper bound.
        max: Decimal,
    },
}
