//! Rate resolution data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tessera_shared::types::MonthYear;

use crate::allocation::ResourceAllocation;
use crate::project::{CostingModel, FundingProgram};

use super::error::RateError;

/// Working-time parameters of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyConfiguration {
    /// Month the row applies to.
    #[serde(flatten)]
    pub period: MonthYear,
    /// Working days in the month.
    pub working_days: u32,
    /// Potential working hours in the month.
    pub potential_hours: Decimal,
}

impl MonthlyConfiguration {
    /// Creates a validated configuration row.
    ///
    /// # Errors
    ///
    /// Returns `RateError` for an invalid month, working days outside 1-31, or
    /// non-positive potential hours.
    pub fn new(
        month: u32,
        year: i32,
        working_days: u32,
        potential_hours: Decimal,
    ) -> Result<Self, RateError> {
        let period = MonthYear::new(month, year)?;
        if !(1..=31).contains(&working_days) {
            return Err(RateError::InvalidWorkingDays(working_days));
        }
        if potential_hours <= Decimal::ZERO {
            return Err(RateError::InvalidPotentialHours(potential_hours));
        }
        Ok(Self {
            period,
            working_days,
            potential_hours,
        })
    }
}

/// Fallback values for months without a configuration row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyDefaults {
    /// Working days.
    pub working_days: u32,
    /// Potential hours.
    pub potential_hours: Decimal,
}

impl Default for MonthlyDefaults {
    fn default() -> Self {
        Self {
            working_days: 20,
            potential_hours: Decimal::from(160),
        }
    }
}

/// How resource cost is priced for a workpackage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum CostBasis {
    /// Per-user monthly salary.
    Salary,
    /// Funding program ETI unit value.
    Eti {
        /// Cost of a 100% occupancy month.
        eti_value: Decimal,
    },
}

impl CostBasis {
    /// Returns the basis for a project funded by `program`.
    #[must_use]
    pub fn for_program(program: Option<&FundingProgram>) -> Self {
        match program {
            Some(p) if p.costing_model == CostingModel::EtiDb => Self::Eti {
                eti_value: p.eti_value,
            },
            _ => Self::Salary,
        }
    }

    /// Returns the costing model this basis implements.
    #[must_use]
    pub const fn costing_model(&self) -> CostingModel {
        match self {
            Self::Salary => CostingModel::Detailed,
            Self::Eti { .. } => CostingModel::EtiDb,
        }
    }
}

/// Monetary cost of one allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCost {
    /// Money cost.
    pub amount: Decimal,
    /// Implied hours (`potential_hours × occupancy`).
    pub hours: Decimal,
    /// Hourly rate for salary-based costs.
    pub hourly_rate: Option<Decimal>,
    /// Working days of the month used.
    pub working_days: u32,
    /// True when a salary-based allocation had no salary to price it.
    pub salary_missing: bool,
}

/// An allocation paired with its resolved cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAllocation {
    /// The allocation.
    pub allocation: ResourceAllocation,
    /// Its cost.
    pub cost: ResolvedCost,
}
