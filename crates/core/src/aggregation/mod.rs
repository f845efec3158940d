//! Cost Aggregator.
//!
//! Combines resolved allocation costs and material lines into realized totals,
//! and compares them against the frozen snapshot of each workpackage.
//!
//! All functions here are pure: callers fetch the data, the aggregator only
//! sums and divides.

pub mod error;
pub mod service;
pub mod types;


pub use error::AggregationError;
pub use service::{CostAggregator, CostSource, WorkpackageInput};
pub use types::{
    BaselineStatus, DetailedPanel, EtiPanel, MonthlyExpense, MonthlyExpenses,
    MonthlyResourceCost, ProjectPanel, ProjectTotals, RealizedBreakdown, RubricTotals,
    RubricUtilization, UnsalariedAllocation, Utilization, WorkpackagePanel, YearlyCost,
};
