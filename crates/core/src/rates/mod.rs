//! Rate Resolver: converts occupancy fractions into money.
//!
//! Two mutually exclusive bases exist:
//! - salary: `monthly_salary × occupancy`, with implied hours from the month's
//!   potential hours
//! - ETI: `occupancy × eti_value` from the funding program

pub mod error;
pub mod resolver;
pub mod types;

pub use error::RateError;
pub use resolver::{RateResolver, ResolutionContext, saturating_sum};
pub use types::{CostBasis, MonthlyConfiguration, MonthlyDefaults, ResolvedAllocation, ResolvedCost};
