//! Cost Aggregator.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tessera_shared::types::{MonthYear, ProjectId};
use tracing::{debug, warn};

use crate::allocation::{ResourceAllocation, Track};
use crate::project::{CostingModel, FundingProgram, Material, Rubric, Workpackage};
use crate::rates::{CostBasis, RateResolver, ResolutionContext, ResolvedAllocation};
use crate::snapshot::{BudgetSnapshot, SnapshotBaseline};

use super::error::AggregationError;
use super::types::{
    BaselineStatus, DetailedPanel, EtiPanel, MonthlyExpense, MonthlyExpenses,
    MonthlyResourceCost, ProjectPanel, ProjectTotals, RealizedBreakdown, RubricTotals,
    RubricUtilization, UnsalariedAllocation, Utilization, WorkpackagePanel, YearlyCost,
};

/// Data needed to compute one workpackage panel.
#[derive(Debug, Clone)]
pub struct WorkpackageInput<'a> {
    /// The workpackage.
    pub workpackage: &'a Workpackage,
    /// Funding program of its project.
    pub funding_program: Option<&'a FundingProgram>,
    /// Current snapshot, if one has been taken.
    pub snapshot: Option<&'a BudgetSnapshot>,
    /// Allocations of the workpackage; only the `real` track is used.
    pub allocations: &'a [ResourceAllocation],
    /// Material lines of the workpackage.
    pub materials: &'a [Material],
    /// Salaries and monthly configuration used for pricing.
    pub context: &'a ResolutionContext,
}

/// Allocations priced under one cost basis, typically one project's.
#[derive(Debug, Clone, Copy)]
pub struct CostSource<'a> {
    /// Cost basis of the owning project.
    pub basis: CostBasis,
    /// Allocations to price; only the `real` track is used.
    pub allocations: &'a [ResourceAllocation],
}

/// Computes planned vs realized panels and expense series.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostAggregator {
    resolver: RateResolver,
}

impl CostAggregator {
    /// Creates an aggregator pricing allocations with `resolver`.
    #[must_use]
    pub const fn new(resolver: RateResolver) -> Self {
        Self { resolver }
    }

    /// Computes the panel of one workpackage.
    ///
    /// Never fails: a missing snapshot or one taken under the other costing
    /// model yields a zero baseline and a degraded [`BaselineStatus`].
    #[must_use]
    pub fn workpackage_panel(&self, input: &WorkpackageInput<'_>) -> WorkpackagePanel {
        let workpackage = input.workpackage;
        let basis = CostBasis::for_program(input.funding_program);
        let model = basis.costing_model();

        let realized: Vec<ResourceAllocation> = input
            .allocations
            .iter()
            .filter(|a| a.track == Track::Real && workpackage.covers(a.period))
            .cloned()
            .collect();
        let resolved = self.resolver.resolve_all(basis, realized, input.context);
        let breakdown = Self::breakdown(&resolved, input.materials);

        let realizado_recursos = breakdown.by_rubric.resources;
        let realizado_materiais = breakdown.by_rubric.materials;
        let total_gasto = realizado_recursos.saturating_add(realizado_materiais);

        let baseline_status = match input.snapshot {
            None => BaselineStatus::Missing,
            Some(snapshot) if snapshot.costing_model() != model => BaselineStatus::ShapeMismatch,
            Some(_) => BaselineStatus::Present,
        };
        if baseline_status.is_degraded() {
            warn!(
                workpackage_id = %workpackage.id,
                costing_model = %model,
                status = ?baseline_status,
                "Workpackage panel has no usable baseline"
            );
        }
        let snapshot_version = input.snapshot.map(|s| s.version);
        let baseline = input
            .snapshot
            .filter(|_| baseline_status == BaselineStatus::Present)
            .map(|s| s.baseline);

        debug!(
            workpackage_id = %workpackage.id,
            costing_model = %model,
            realized = %total_gasto,
            allocations = resolved.len(),
            "Computed workpackage panel"
        );

        match model {
            CostingModel::EtiDb => {
                let orcamento_previsto_com_eti = match baseline {
                    Some(SnapshotBaseline::EtiDb {
                        orcamento_previsto_com_eti,
                    }) => orcamento_previsto_com_eti,
                    _ => Decimal::ZERO,
                };
                WorkpackagePanel::EtiDb(EtiPanel {
                    workpackage_id: workpackage.id,
                    orcamento_previsto_com_eti,
                    realizado_recursos,
                    realizado_materiais,
                    total_gasto,
                    utilization: Utilization::compute(orcamento_previsto_com_eti, total_gasto),
                    baseline_status,
                    snapshot_version,
                    breakdown,
                })
            }
            CostingModel::Detailed => {
                let (previsto_recursos_snapshot, previsto_materiais_snapshot) = match baseline {
                    Some(SnapshotBaseline::Detailed {
                        previsto_recursos_snapshot,
                        previsto_materiais_snapshot,
                    }) => (previsto_recursos_snapshot, previsto_materiais_snapshot),
                    _ => (Decimal::ZERO, Decimal::ZERO),
                };
                WorkpackagePanel::Detailed(DetailedPanel {
                    workpackage_id: workpackage.id,
                    previsto_recursos_snapshot,
                    previsto_materiais_snapshot,
                    realizado_recursos,
                    realizado_materiais,
                    total_gasto,
                    rh: Utilization::compute(previsto_recursos_snapshot, realizado_recursos),
                    mat: Utilization::compute(previsto_materiais_snapshot, realizado_materiais),
                    baseline_status,
                    snapshot_version,
                    breakdown,
                })
            }
        }
    }

    /// Folds workpackage panels into a project panel.
    ///
    /// The totals are summed from `panels`, which are kept as the drill-down,
    /// so the summary always equals the sum of its parts.
    #[must_use]
    pub fn project_panel(
        project_id: ProjectId,
        costing_model: CostingModel,
        panels: Vec<WorkpackagePanel>,
    ) -> ProjectPanel {
        let mut totals = ProjectTotals::default();
        let mut degraded_workpackages = Vec::new();

        for panel in &panels {
            let rubrics = panel.realized_rubrics();
            totals.previsto = totals.previsto.saturating_add(panel.previsto());
            totals.realizado_recursos =
                totals.realizado_recursos.saturating_add(rubrics.resources);
            totals.realizado_materiais =
                totals.realizado_materiais.saturating_add(rubrics.materials);
            totals.realizado = totals.realizado.saturating_add(panel.realizado());
            if let WorkpackagePanel::Detailed(p) = panel {
                totals.previsto_recursos =
                    totals.previsto_recursos.saturating_add(p.previsto_recursos_snapshot);
                totals.previsto_materiais =
                    totals.previsto_materiais.saturating_add(p.previsto_materiais_snapshot);
            }
            if panel.baseline_status().is_degraded() {
                degraded_workpackages.push(panel.workpackage_id());
            }
        }

        let rubric_utilization = (costing_model == CostingModel::Detailed).then(|| {
            RubricUtilization {
                rh: Utilization::compute(totals.previsto_recursos, totals.realizado_recursos),
                mat: Utilization::compute(totals.previsto_materiais, totals.realizado_materiais),
            }
        });

        debug!(
            project_id = %project_id,
            workpackages = panels.len(),
            previsto = %totals.previsto,
            realizado = %totals.realizado,
            "Computed project panel"
        );

        ProjectPanel {
            project_id,
            costing_model,
            totals,
            utilization: Utilization::compute(totals.previsto, totals.realizado),
            rubric_utilization,
            degraded_workpackages,
            detalhes_por_workpackage: panels,
        }
    }

    /// Computes the zero-filled monthly expense series of a year.
    ///
    /// Returns exactly `limit` entries, months `1..=limit` in order. Materials
    /// with a month of use land in that month; the rest of the year's materials
    /// are reported as unscheduled.
    ///
    /// # Errors
    ///
    /// Returns `AggregationError` when `limit` is outside 1-12 or the year is
    /// before 1900.
    pub fn monthly_expenses(
        &self,
        year: i32,
        limit: u32,
        sources: &[CostSource<'_>],
        materials: &[Material],
        context: &ResolutionContext,
    ) -> Result<MonthlyExpenses, AggregationError> {
        if !(1..=12).contains(&limit) {
            return Err(AggregationError::InvalidLimit(limit));
        }
        MonthYear::new(1, year)?;

        let mut resources = [Decimal::ZERO; 12];
        let mut scheduled = [Decimal::ZERO; 12];
        let mut unscheduled_material_cost = Decimal::ZERO;

        for source in sources {
            for allocation in source.allocations {
                if allocation.track != Track::Real || allocation.period.year != year {
                    continue;
                }
                let cost = self.resolver.resolve(source.basis, allocation, context);
                if let Some(slot) = month_slot(&mut resources, allocation.period.month) {
                    *slot = slot.saturating_add(cost.amount);
                }
            }
        }

        for material in materials.iter().filter(|m| m.year_of_use == year) {
            match material.scheduled_period() {
                Some(period) => {
                    if let Some(slot) = month_slot(&mut scheduled, period.month) {
                        *slot = slot.saturating_add(material.cost());
                    }
                }
                None => {
                    unscheduled_material_cost =
                        unscheduled_material_cost.saturating_add(material.cost());
                }
            }
        }

        let mut cumulative_resource_cost = Decimal::ZERO;
        let mut cumulative_material_cost = Decimal::ZERO;
        let months: Vec<MonthlyExpense> = (1..=limit)
            .zip(resources.iter().zip(scheduled.iter()))
            .map(|(month, (&resource_cost, &material_cost))| {
                cumulative_resource_cost =
                    cumulative_resource_cost.saturating_add(resource_cost);
                cumulative_material_cost =
                    cumulative_material_cost.saturating_add(material_cost);
                MonthlyExpense {
                    month,
                    resource_cost,
                    material_cost,
                    cumulative_resource_cost,
                    cumulative_material_cost,
                }
            })
            .collect();

        debug!(
            year,
            limit,
            resources = %cumulative_resource_cost,
            materials = %cumulative_material_cost,
            "Computed monthly expenses"
        );

        Ok(MonthlyExpenses {
            year,
            months,
            unscheduled_material_cost,
            total_resource_cost: cumulative_resource_cost,
            total_material_cost: cumulative_material_cost.saturating_add(unscheduled_material_cost),
        })
    }

    fn breakdown(resolved: &[ResolvedAllocation], materials: &[Material]) -> RealizedBreakdown {
        let mut by_month: BTreeMap<MonthYear, (Decimal, Decimal)> = BTreeMap::new();
        let mut by_year: BTreeMap<i32, (Decimal, Decimal)> = BTreeMap::new();
        let mut by_rubric = RubricTotals::default();
        let mut total_hours = Decimal::ZERO;
        let mut unsalaried = Vec::new();

        for entry in resolved {
            let period = entry.allocation.period;
            let month = by_month.entry(period).or_default();
            month.0 = month.0.saturating_add(entry.cost.amount);
            month.1 = month.1.saturating_add(entry.cost.hours);
            let year = by_year.entry(period.year).or_default();
            year.0 = year.0.saturating_add(entry.cost.amount);
            by_rubric.resources = by_rubric.resources.saturating_add(entry.cost.amount);
            total_hours = total_hours.saturating_add(entry.cost.hours);

            if entry.cost.salary_missing {
                unsalaried.push(UnsalariedAllocation {
                    user_id: entry.allocation.user_id,
                    period,
                    occupancy: entry.allocation.occupancy,
                });
            }
        }

        for material in materials {
            let cost = material.cost();
            let year = by_year.entry(material.year_of_use).or_default();
            year.1 = year.1.saturating_add(cost);
            let bucket = match material.rubric.bucket() {
                Rubric::Resources => &mut by_rubric.resources,
                Rubric::Materials => &mut by_rubric.materials,
            };
            *bucket = bucket.saturating_add(cost);
        }

        RealizedBreakdown {
            by_month: by_month
                .into_iter()
                .map(|(period, (cost, hours))| MonthlyResourceCost {
                    period,
                    cost,
                    hours,
                })
                .collect(),
            by_year: by_year
                .into_iter()
                .map(|(year, (resources, materials))| YearlyCost {
                    year,
                    resources,
                    materials,
                })
                .collect(),
            by_rubric,
            total_hours,
            unsalaried,
        }
    }
}

fn month_slot(series: &mut [Decimal; 12], month: u32) -> Option<&mut Decimal> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    series.get_mut(index)
}
