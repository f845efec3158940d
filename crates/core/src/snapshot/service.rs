//! Baseline computation for snapshots.

use tessera_shared::types::MonthYear;
use tracing::debug;

use crate::allocation::{ResourceAllocation, Track};
use crate::project::{FundingProgram, Material, Workpackage};
use crate::rates::{CostBasis, RateResolver, ResolutionContext, saturating_sum};

use super::error::SnapshotError;
use super::types::{PlannedBaseline, SnapshotBaseline};

/// Current state of a workpackage, as read at snapshot time.
#[derive(Debug, Clone)]
pub struct SnapshotInput<'a> {
    /// The workpackage being frozen.
    pub workpackage: &'a Workpackage,
    /// Funding program of the workpackage's project.
    pub funding_program: Option<&'a FundingProgram>,
    /// Planned allocations of the workpackage.
    pub planned_allocations: &'a [ResourceAllocation],
    /// Material lines of the workpackage.
    pub materials: &'a [Material],
    /// Salaries and monthly configuration used for pricing.
    pub context: &'a ResolutionContext,
}

/// Computes planned baselines from live data.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotCalculator {
    resolver: RateResolver,
}

impl SnapshotCalculator {
    /// Creates a calculator pricing allocations with `resolver`.
    #[must_use]
    pub const fn new(resolver: RateResolver) -> Self {
        Self { resolver }
    }

    /// Checks that a workpackage can be snapshotted.
    ///
    /// A missing date range or funding program is an error rather than a zero
    /// baseline, which would be indistinguishable from a legitimate one.
    pub fn validate<'a>(
        workpackage: &Workpackage,
        funding_program: Option<&'a FundingProgram>,
    ) -> Result<(Vec<MonthYear>, &'a FundingProgram), SnapshotError> {
        let (start, end) = workpackage
            .date_range()
            .ok_or(SnapshotError::MissingDateRange(workpackage.id))?;
        let months =
            MonthYear::range(start, end).map_err(|source| SnapshotError::InvalidDateRange {
                workpackage_id: workpackage.id,
                source,
            })?;
        let program =
            funding_program.ok_or(SnapshotError::MissingFundingProgram(workpackage.id))?;
        Ok((months, program))
    }

    /// Computes the planned baseline of a workpackage.
    ///
    /// Only `submetido` allocations inside the workpackage's months count.
    pub fn compute(&self, input: &SnapshotInput<'_>) -> Result<PlannedBaseline, SnapshotError> {
        let (months, program) = Self::validate(input.workpackage, input.funding_program)?;
        let basis = CostBasis::for_program(Some(program));

        let planned: Vec<ResourceAllocation> = input
            .planned_allocations
            .iter()
            .filter(|a| a.track == Track::Submetido && months.contains(&a.period))
            .cloned()
            .collect();

        let resolved = self.resolver.resolve_all(basis, planned, input.context);
        let resources = saturating_sum(resolved.iter().map(|r| r.cost.amount));
        let planned_hours = saturating_sum(resolved.iter().map(|r| r.cost.hours));

        let baseline = match basis {
            CostBasis::Eti { .. } => SnapshotBaseline::EtiDb {
                orcamento_previsto_com_eti: resources,
            },
            CostBasis::Salary => SnapshotBaseline::Detailed {
                previsto_recursos_snapshot: resources,
                previsto_materiais_snapshot: saturating_sum(
                    input.materials.iter().map(Material::cost),
                ),
            },
        };

        debug!(
            workpackage_id = %input.workpackage.id,
            costing_model = %baseline.costing_model(),
            planned_total = %baseline.total(),
            allocations = resolved.len(),
            "Computed planned baseline"
        );

        Ok(PlannedBaseline {
            baseline,
            planned_hours,
        })
    }
}
