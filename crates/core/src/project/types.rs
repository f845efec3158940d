//! Project structure data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tessera_shared::types::{
    FundingProgramId, MaterialId, MonthYear, ProjectId, UserId, WorkpackageId,
};

/// Costing model governing how resource cost is resolved for a project.
///
/// Set once through the project's funding program and never mixed within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostingModel {
    /// Full-time-equivalent unit value from the funding program.
    EtiDb,
    /// Per-user monthly salary, split into resources and materials rubrics.
    Detailed,
}

impl CostingModel {
    /// Returns the model for a project with the given funding program.
    ///
    /// A project without a funding program is costed with the detailed model.
    #[must_use]
    pub fn for_program(program: Option<&FundingProgram>) -> Self {
        program.map_or(Self::Detailed, |p| p.costing_model)
    }

    /// Returns the string representation of the model.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EtiDb => "ETI_DB",
            Self::Detailed => "DETAILED",
        }
    }

    /// Parses a model from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ETI_DB" => Some(Self::EtiDb),
            "DETAILED" => Some(Self::Detailed),
            _ => None,
        }
    }
}

impl std::fmt::Display for CostingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A funding program's financial parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingProgram {
    /// Funding program ID.
    pub id: FundingProgramId,
    /// Program name.
    pub name: String,
    /// Overhead percentage.
    pub overhead_pct: Decimal,
    /// Financing rate percentage.
    pub financing_rate_pct: Decimal,
    /// Cost of one full-time-equivalent month.
    pub eti_value: Decimal,
    /// Costing model for projects under this program.
    pub costing_model: CostingModel,
}

/// Aggregate state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectState {
    /// Submitted, not yet approved.
    Draft,
    /// Approved; planned baselines are frozen.
    Approved,
    /// Work is under way.
    InProgress,
    /// Closed.
    Completed,
}

impl ProjectState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "approved" => Some(Self::Approved),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
    /// Funding program, if any.
    pub funding_program_id: Option<FundingProgramId>,
    /// Lifecycle state.
    pub state: ProjectState,
}

/// A workpackage record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workpackage {
    /// Workpackage ID.
    pub id: WorkpackageId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Workpackage name.
    pub name: String,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
}

impl Workpackage {
    /// Returns the date range when both ends are set.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start_date.zip(self.end_date)
    }

    /// Returns true if the period falls within the workpackage's months.
    ///
    /// Workpackages without a complete date range accept every period.
    #[must_use]
    pub fn covers(&self, period: MonthYear) -> bool {
        self.date_range()
            .is_none_or(|(start, end)| period.within(start, end))
    }
}

/// Cost bucket used by the detailed costing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rubric {
    /// Human effort.
    Resources,
    /// Materials and equipment.
    Materials,
}

/// Category recorded on a material line.
///
/// Every category rolls up into [`Rubric::Materials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialRubric {
    /// Consumables and supplies.
    Materials,
    /// Equipment purchases.
    Equipment,
}

impl MaterialRubric {
    /// Returns the cost bucket this category belongs to.
    #[must_use]
    pub const fn bucket(self) -> Rubric {
        Rubric::Materials
    }
}

/// A material cost line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// Material ID.
    pub id: MaterialId,
    /// Owning workpackage.
    pub workpackage_id: WorkpackageId,
    /// Material name.
    pub name: String,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Number of units.
    pub quantity: Decimal,
    /// Category.
    pub rubric: MaterialRubric,
    /// Year the full cost is attributed to.
    pub year_of_use: i32,
    /// Month of use, when known.
    pub month_of_use: Option<u32>,
}

impl Material {
    /// Returns `unit_price × quantity`, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.unit_price.saturating_mul(self.quantity)
    }

    /// Returns the month this material is scheduled in, if any.
    #[must_use]
    pub fn scheduled_period(&self) -> Option<MonthYear> {
        self.month_of_use
            .and_then(|month| MonthYear::new(month, self.year_of_use).ok())
    }
}

/// Contract regime of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Regime {
    /// Full-time contract.
    Integral,
    /// Part-time contract.
    Parcial,
}

impl Regime {
    /// Returns the string representation of the regime.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integral => "INTEGRAL",
            Self::Parcial => "PARCIAL",
        }
    }

    /// Parses a regime from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "INTEGRAL" => Some(Self::Integral),
            "PARCIAL" => Some(Self::Parcial),
            _ => None,
        }
    }
}

impl MaterialRubric {
    /// Returns the string representation of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Materials => "materials",
            Self::Equipment => "equipment",
        }
    }

    /// Parses a category from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "materials" => Some(Self::Materials),
            "equipment" => Some(Self::Equipment),
            _ => None,
        }
    }
}

/// Cost-relevant fields of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCostProfile {
    /// User ID.
    pub id: UserId,
    /// Monthly salary; users without one contribute zero cost.
    pub monthly_salary: Option<Decimal>,
    /// Contract regime.
    pub regime: Regime,
}
