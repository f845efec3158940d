//! Allocation input validation.

use rust_decimal::Decimal;
use tessera_shared::types::MonthYear;

use super::error::AllocationError;
use super::types::{AllocationInput, ResourceAllocation};

/// Largest occupancy fraction a single allocation may carry.
pub const MAX_OCCUPANCY: Decimal = Decimal::TEN;

/// Validates allocation upsert requests.
pub struct AllocationValidator;

impl AllocationValidator {
    /// Validates an upsert request and builds the allocation record.
    ///
    /// Fractions above 1.0 are accepted; over-allocation is reported by
    /// [`super::OccupancyLedger`], never rejected here. Fractions above
    /// [`MAX_OCCUPANCY`] are input errors.
    pub fn validate(input: &AllocationInput) -> Result<ResourceAllocation, AllocationError> {
        let period = MonthYear::new(input.month, input.year)?;

        if input.occupancy < Decimal::ZERO {
            return Err(AllocationError::NegativeOccupancy(input.occupancy));
        }
        if input.occupancy > MAX_OCCUPANCY {
            return Err(AllocationError::OccupancyTooLarge {
                value: input.occupancy,
                max: MAX_OCCUPANCY,
            });
        }

        Ok(ResourceAllocation {
            user_id: input.user_id,
            workpackage_id: input.workpackage_id,
            period,
            occupancy: input.occupancy.normalize(),
            track: input.track,
        })
    }
}
