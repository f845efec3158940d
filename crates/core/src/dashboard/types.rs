//! Dashboard data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tessera_shared::types::{ProjectId, WorkpackageId};

use crate::aggregation::{BaselineStatus, ProjectTotals};
use crate::allocation::OccupancySummary;
use crate::project::{CostingModel, Rubric};

/// Project dashboard response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDashboard {
    /// Project ID.
    pub project_id: ProjectId,
    /// Costing model.
    pub costing_model: CostingModel,
    /// Project totals.
    pub totals: ProjectTotals,
    /// Overall display percentage.
    pub percent: Decimal,
    /// One bar per workpackage.
    pub progress: Vec<ProgressBar>,
    /// Alerts, most urgent first.
    pub alerts: Vec<Alert>,
    /// Occupancy per user and month on the project.
    pub occupancy: Vec<OccupancySummary>,
}

/// Per-workpackage progress bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressBar {
    /// Workpackage ID.
    pub workpackage_id: WorkpackageId,
    /// Workpackage name.
    pub name: String,
    /// Display percentage (0-100).
    pub percent: Decimal,
    /// Planned amount.
    pub previsto: Decimal,
    /// Realized amount.
    pub realizado: Decimal,
    /// True when realized exceeds the baseline.
    pub over_budget: bool,
    /// Baseline availability.
    pub baseline_status: BaselineStatus,
}

/// Alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertKind {
    /// Realized exceeds the baseline, overall or in one rubric.
    OverBudget {
        /// Rubric in overrun; `None` for the whole baseline.
        rubric: Option<Rubric>,
        /// Unclamped `realized / planned` ratio.
        ratio: Decimal,
    },
    /// No snapshot has been taken.
    MissingBaseline,
    /// Snapshot shape does not match the costing model.
    InconsistentBaseline,
    /// End date within the alert window.
    DeadlineApproaching,
}

/// Dashboard alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Workpackage ID.
    pub workpackage_id: WorkpackageId,
    /// Workpackage name.
    pub workpackage_name: String,
    /// What is wrong.
    #[serde(flatten)]
    pub kind: AlertKind,
    /// Days until the workpackage ends; `None` without an end date.
    pub days_until_deadline: Option<i64>,
}

/// Annual expense chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearOverview {
    /// Year.
    pub year: i32,
    /// Month labels (`YYYY-MM`).
    pub labels: Vec<String>,
    /// Resource cost per month.
    pub resources: Vec<Decimal>,
    /// Scheduled material cost per month.
    pub materials: Vec<Decimal>,
    /// Running total of resources and materials.
    pub cumulative: Vec<Decimal>,
    /// Material cost with no month of use.
    pub unscheduled_materials: Decimal,
    /// Total of the year.
    pub total: Decimal,
}
