//! Aggregation result types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tessera_shared::types::{MonthYear, ProjectId, UserId, WorkpackageId};

use crate::project::CostingModel;

/// Whether a panel could be compared against a usable baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineStatus {
    /// A snapshot of the right shape exists.
    Present,
    /// No snapshot has been taken yet.
    Missing,
    /// The snapshot was taken under the other costing model.
    ShapeMismatch,
}

impl BaselineStatus {
    /// Returns true when the panel is degraded.
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        !matches!(self, Self::Present)
    }
}

/// Budget consumption of one planned/realized pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utilization {
    /// Planned amount.
    pub budget: Decimal,
    /// Realized amount.
    pub spent: Decimal,
    /// Remaining budget (`budget - spent`); negative on overrun.
    pub variance: Decimal,
    /// `spent / budget`, unclamped; zero when the budget is zero.
    pub ratio: Decimal,
    /// Display percentage, clamped to 0-100.
    pub percent: Decimal,
    /// True when realized exceeds a positive budget.
    pub over_budget: bool,
}

impl Utilization {
    /// Computes consumption of `budget` by `spent`.
    ///
    /// A zero (or negative) budget yields a zero ratio and percentage.
    #[must_use]
    pub fn compute(budget: Decimal, spent: Decimal) -> Self {
        let ratio = if budget > Decimal::ZERO {
            spent.checked_div(budget).unwrap_or(Decimal::MAX)
        } else {
            Decimal::ZERO
        };
        let percent = (ratio.clamp(Decimal::ZERO, Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2);

        Self {
            budget,
            spent,
            variance: budget.saturating_sub(spent),
            ratio,
            percent,
            over_budget: ratio > Decimal::ONE,
        }
    }
}

/// Realized resource cost in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyResourceCost {
    /// Month.
    #[serde(flatten)]
    pub period: MonthYear,
    /// Resource cost.
    pub cost: Decimal,
    /// Implied hours.
    pub hours: Decimal,
}

/// Realized cost attributed to one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyCost {
    /// Year.
    pub year: i32,
    /// Resource cost.
    pub resources: Decimal,
    /// Material cost.
    pub materials: Decimal,
}

/// Realized totals split into the two rubrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricTotals {
    /// Human resources.
    pub resources: Decimal,
    /// Materials and equipment.
    pub materials: Decimal,
}

/// An allocation that contributed no cost because its user has no salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsalariedAllocation {
    /// User ID.
    pub user_id: UserId,
    /// Month.
    #[serde(flatten)]
    pub period: MonthYear,
    /// Occupancy fraction.
    pub occupancy: Decimal,
}

/// Realized cost broken down by month, year and rubric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedBreakdown {
    /// Resource cost per month, in chronological order.
    pub by_month: Vec<MonthlyResourceCost>,
    /// Resource and material cost per year, in chronological order.
    pub by_year: Vec<YearlyCost>,
    /// Rubric totals.
    pub by_rubric: RubricTotals,
    /// Total implied hours.
    pub total_hours: Decimal,
    /// Allocations priced at zero for lack of a salary.
    pub unsalaried: Vec<UnsalariedAllocation>,
}

/// Panel of a workpackage under the ETI model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtiPanel {
    /// Workpackage ID.
    pub workpackage_id: WorkpackageId,
    /// Frozen planned budget.
    pub orcamento_previsto_com_eti: Decimal,
    /// Realized resource cost.
    pub realizado_recursos: Decimal,
    /// Realized material cost.
    pub realizado_materiais: Decimal,
    /// Resources plus materials.
    pub total_gasto: Decimal,
    /// Consumption of the planned budget.
    pub utilization: Utilization,
    /// Baseline availability.
    pub baseline_status: BaselineStatus,
    /// Version of the snapshot compared against.
    pub snapshot_version: Option<u32>,
    /// Realized breakdown.
    pub breakdown: RealizedBreakdown,
}

/// Panel of a workpackage under the detailed model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedPanel {
    /// Workpackage ID.
    pub workpackage_id: WorkpackageId,
    /// Frozen planned resource cost.
    pub previsto_recursos_snapshot: Decimal,
    /// Frozen planned material cost.
    pub previsto_materiais_snapshot: Decimal,
    /// Realized resource cost.
    pub realizado_recursos: Decimal,
    /// Realized material cost.
    pub realizado_materiais: Decimal,
    /// Resources plus materials.
    pub total_gasto: Decimal,
    /// Consumption of the resources rubric.
    pub rh: Utilization,
    /// Consumption of the materials rubric.
    pub mat: Utilization,
    /// Baseline availability.
    pub baseline_status: BaselineStatus,
    /// Version of the snapshot compared against.
    pub snapshot_version: Option<u32>,
    /// Realized breakdown.
    pub breakdown: RealizedBreakdown,
}

impl DetailedPanel {
    /// Consumption of the combined planned budget.
    #[must_use]
    pub fn combined(&self) -> Utilization {
        Utilization::compute(
            self.previsto_recursos_snapshot
                .saturating_add(self.previsto_materiais_snapshot),
            self.total_gasto,
        )
    }
}

/// Planned vs realized position of one workpackage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "costing_model", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkpackagePanel {
    /// ETI model.
    EtiDb(EtiPanel),
    /// Detailed model.
    Detailed(DetailedPanel),
}

impl WorkpackagePanel {
    /// Returns the workpackage ID.
    #[must_use]
    pub const fn workpackage_id(&self) -> WorkpackageId {
        match self {
            Self::EtiDb(p) => p.workpackage_id,
            Self::Detailed(p) => p.workpackage_id,
        }
    }

    /// Returns the costing model.
    #[must_use]
    pub const fn costing_model(&self) -> CostingModel {
        match self {
            Self::EtiDb(_) => CostingModel::EtiDb,
            Self::Detailed(_) => CostingModel::Detailed,
        }
    }

    /// Returns the total planned amount.
    #[must_use]
    pub fn previsto(&self) -> Decimal {
        match self {
            Self::EtiDb(p) => p.orcamento_previsto_com_eti,
            Self::Detailed(p) => p
                .previsto_recursos_snapshot
                .saturating_add(p.previsto_materiais_snapshot),
        }
    }

    /// Returns the total realized amount.
    #[must_use]
    pub const fn realizado(&self) -> Decimal {
        match self {
            Self::EtiDb(p) => p.total_gasto,
            Self::Detailed(p) => p.total_gasto,
        }
    }

    /// Returns realized resource and material totals.
    #[must_use]
    pub const fn realized_rubrics(&self) -> RubricTotals {
        match self {
            Self::EtiDb(p) => RubricTotals {
                resources: p.realizado_recursos,
                materials: p.realizado_materiais,
            },
            Self::Detailed(p) => RubricTotals {
                resources: p.realizado_recursos,
                materials: p.realizado_materiais,
            },
        }
    }

    /// Returns consumption of the whole planned budget.
    #[must_use]
    pub fn utilization(&self) -> Utilization {
        match self {
            Self::EtiDb(p) => p.utilization,
            Self::Detailed(p) => p.combined(),
        }
    }

    /// Returns the display percentage.
    #[must_use]
    pub fn percent(&self) -> Decimal {
        self.utilization().percent
    }

    /// Returns the baseline status.
    #[must_use]
    pub const fn baseline_status(&self) -> BaselineStatus {
        match self {
            Self::EtiDb(p) => p.baseline_status,
            Self::Detailed(p) => p.baseline_status,
        }
    }

    /// Returns the realized breakdown.
    #[must_use]
    pub const fn breakdown(&self) -> &RealizedBreakdown {
        match self {
            Self::EtiDb(p) => &p.breakdown,
            Self::Detailed(p) => &p.breakdown,
        }
    }
}

/// Project totals summed from its workpackage panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTotals {
    /// Total planned amount.
    pub previsto: Decimal,
    /// Planned resources (detailed model only; zero otherwise).
    pub previsto_recursos: Decimal,
    /// Planned materials (detailed model only; zero otherwise).
    pub previsto_materiais: Decimal,
    /// Realized resource cost.
    pub realizado_recursos: Decimal,
    /// Realized material cost.
    pub realizado_materiais: Decimal,
    /// Total realized amount.
    pub realizado: Decimal,
}

/// Per-rubric consumption for detailed-model projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricUtilization {
    /// Resources rubric.
    pub rh: Utilization,
    /// Materials rubric.
    pub mat: Utilization,
}

/// Planned vs realized position of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPanel {
    /// Project ID.
    pub project_id: ProjectId,
    /// Costing model of the project.
    pub costing_model: CostingModel,
    /// Totals across workpackages.
    pub totals: ProjectTotals,
    /// Consumption of the whole planned budget.
    pub utilization: Utilization,
    /// Per-rubric consumption (detailed model only).
    pub rubric_utilization: Option<RubricUtilization>,
    /// Workpackages whose panel is degraded.
    pub degraded_workpackages: Vec<WorkpackageId>,
    /// Per-workpackage panels the totals were summed from.
    pub detalhes_por_workpackage: Vec<WorkpackagePanel>,
}

impl ProjectPanel {
    /// Returns the display percentage.
    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.utilization.percent
    }
}

/// Expenses of one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyExpense {
    /// Month number, 1-12.
    pub month: u32,
    /// Realized resource cost.
    pub resource_cost: Decimal,
    /// Material cost scheduled in this month.
    pub material_cost: Decimal,
    /// Resource cost from January through this month.
    pub cumulative_resource_cost: Decimal,
    /// Scheduled material cost from January through this month.
    pub cumulative_material_cost: Decimal,
}

/// Zero-filled monthly expense series of one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyExpenses {
    /// Year.
    pub year: i32,
    /// One entry per month, in order, starting in January.
    pub months: Vec<MonthlyExpense>,
    /// Material cost of the year with no month of use.
    pub unscheduled_material_cost: Decimal,
    /// Resource cost across the returned months.
    pub total_resource_cost: Decimal,
    /// Material cost across the returned months plus unscheduled materials.
    pub total_material_cost: Decimal,
}
