//! Rate Resolver.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tessera_shared::types::{MonthYear, UserId};

use crate::allocation::ResourceAllocation;

use super::types::{CostBasis, MonthlyConfiguration, MonthlyDefaults, ResolvedAllocation, ResolvedCost};

/// Lookup data needed to price a batch of allocations.
///
/// Built by the caller from the user and monthly-configuration stores.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    /// Monthly salary per user; `None` when the user has no salary.
    pub salaries: HashMap<UserId, Option<Decimal>>,
    /// Configuration rows per month.
    pub configs: HashMap<MonthYear, MonthlyConfiguration>,
}

impl ResolutionContext {
    /// Returns the salary of a user, if known.
    #[must_use]
    pub fn salary(&self, user_id: UserId) -> Option<Decimal> {
        self.salaries.get(&user_id).copied().flatten()
    }
}

/// Converts occupancy fractions into money.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateResolver {
    defaults: MonthlyDefaults,
}

impl RateResolver {
    /// Creates a resolver with the given fallback month parameters.
    #[must_use]
    pub const fn new(defaults: MonthlyDefaults) -> Self {
        Self { defaults }
    }

    /// Returns the configuration for `period`, or the defaults if none exists.
    #[must_use]
    pub fn effective_config(
        &self,
        period: MonthYear,
        config: Option<&MonthlyConfiguration>,
    ) -> MonthlyConfiguration {
        config.cloned().unwrap_or(MonthlyConfiguration {
            period,
            working_days: self.defaults.working_days,
            potential_hours: self.defaults.potential_hours,
        })
    }

    /// Prices an occupancy fraction against a monthly salary.
    ///
    /// `hourly_rate = salary / potential_hours` and `hours = potential_hours ×
    /// occupancy`; the amount is computed as `salary × occupancy` so it stays
    /// exact regardless of how the hourly rate rounds. Products saturate at
    /// `Decimal::MAX` instead of overflowing.
    #[must_use]
    pub fn resolve_salary(
        &self,
        salary: Option<Decimal>,
        occupancy: Decimal,
        config: &MonthlyConfiguration,
    ) -> ResolvedCost {
        let hours = config.potential_hours.saturating_mul(occupancy);

        match salary {
            Some(salary) => ResolvedCost {
                amount: salary.saturating_mul(occupancy),
                hours,
                hourly_rate: salary.checked_div(config.potential_hours),
                working_days: config.working_days,
                salary_missing: false,
            },
            None => ResolvedCost {
                amount: Decimal::ZERO,
                hours,
                hourly_rate: None,
                working_days: config.working_days,
                salary_missing: true,
            },
        }
    }

    /// Prices an occupancy fraction at the funding program's ETI value.
    #[must_use]
    pub fn resolve_eti(
        &self,
        eti_value: Decimal,
        occupancy: Decimal,
        config: &MonthlyConfiguration,
    ) -> ResolvedCost {
        ResolvedCost {
            amount: occupancy.saturating_mul(eti_value),
            hours: config.potential_hours.saturating_mul(occupancy),
            hourly_rate: None,
            working_days: config.working_days,
            salary_missing: false,
        }
    }

    /// Prices one allocation under the given basis.
    #[must_use]
    pub fn resolve(
        &self,
        basis: CostBasis,
        allocation: &ResourceAllocation,
        context: &ResolutionContext,
    ) -> ResolvedCost {
        let config = self.effective_config(allocation.period, context.configs.get(&allocation.period));

        match basis {
            CostBasis::Salary => {
                self.resolve_salary(context.salary(allocation.user_id), allocation.occupancy, &config)
            }
            CostBasis::Eti { eti_value } => {
                self.resolve_eti(eti_value, allocation.occupancy, &config)
            }
        }
    }

    /// Prices a batch of allocations under the given basis.
    #[must_use]
    pub fn resolve_all(
        &self,
        basis: CostBasis,
        allocations: Vec<ResourceAllocation>,
        context: &ResolutionContext,
    ) -> Vec<ResolvedAllocation> {
        allocations
            .into_iter()
            .map(|allocation| {
                let cost = self.resolve(basis, &allocation, context);
                ResolvedAllocation { allocation, cost }
            })
            .collect()
    }
}

/// Sums amounts, saturating at `Decimal::MAX`.
pub fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
