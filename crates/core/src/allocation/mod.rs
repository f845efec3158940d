//! Time-phased resource allocations.
//!
//! This module provides:
//! - Allocation records on the `real` and `submetido` tracks
//! - Input validation for idempotent upserts
//! - Over-allocation detection across workpackages

pub mod error;
pub mod occupancy;
pub mod types;
pub mod validation;

pub use error::AllocationError;
pub use occupancy::{OccupancyLedger, OccupancySummary};
pub use types::{AllocationInput, AllocationKey, ResourceAllocation, Track};
pub use validation::{AllocationValidator, MAX_OCCUPANCY};
