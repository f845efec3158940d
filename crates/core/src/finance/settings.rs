//! Finance service settings.

use rust_decimal::Decimal;
use tessera_shared::config::FinanceConfig;

use crate::rates::MonthlyDefaults;

/// Tunables of the finance service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinanceSettings {
    /// Month parameters used when no configuration row exists.
    pub monthly_defaults: MonthlyDefaults,
    /// Days ahead of a workpackage end date that raise a deadline alert.
    pub deadline_alert_days: i64,
}

impl Default for FinanceSettings {
    fn default() -> Self {
        Self::from(&FinanceConfig::default())
    }
}

impl From<&FinanceConfig> for FinanceSettings {
    fn from(config: &FinanceConfig) -> Self {
        Self {
            monthly_defaults: MonthlyDefaults {
                working_days: config.default_working_days,
                potential_hours: Decimal::from(config.default_potential_hours),
            },
            deadline_alert_days: config.deadline_alert_days,
        }
    }
}
