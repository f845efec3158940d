//! Dashboard projection service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tessera_shared::types::MonthYear;

use crate::aggregation::{
    BaselineStatus, MonthlyExpenses, ProjectPanel, Utilization, WorkpackagePanel,
};
use crate::allocation::OccupancySummary;
use crate::project::{Rubric, Workpackage};

use super::types::{Alert, AlertKind, ProgressBar, ProjectDashboard, YearOverview};

/// Shapes aggregator output into dashboard panels.
#[derive(Debug, Clone, Copy)]
pub struct DashboardProjection {
    deadline_alert_days: i64,
}

impl Default for DashboardProjection {
    fn default() -> Self {
        Self::new(30)
    }
}

impl DashboardProjection {
    /// Creates a projection raising deadline alerts `deadline_alert_days` ahead.
    #[must_use]
    pub const fn new(deadline_alert_days: i64) -> Self {
        Self {
            deadline_alert_days,
        }
    }

    /// Builds the dashboard of a project.
    ///
    /// `workpackages` supplies names and end dates; panels without a matching
    /// workpackage are shown unnamed and without a deadline.
    #[must_use]
    pub fn project_dashboard(
        &self,
        panel: &ProjectPanel,
        workpackages: &[Workpackage],
        occupancy: Vec<OccupancySummary>,
        today: NaiveDate,
    ) -> ProjectDashboard {
        let mut progress = Vec::with_capacity(panel.detalhes_por_workpackage.len());
        let mut alerts = Vec::new();

        for wp_panel in &panel.detalhes_por_workpackage {
            let workpackage = workpackages
                .iter()
                .find(|wp| wp.id == wp_panel.workpackage_id());
            let name = workpackage.map(|wp| wp.name.clone()).unwrap_or_default();
            let days_until_deadline = workpackage
                .and_then(|wp| wp.end_date)
                .map(|end| (end - today).num_days());
            let utilization = wp_panel.utilization();

            progress.push(ProgressBar {
                workpackage_id: wp_panel.workpackage_id(),
                name: name.clone(),
                percent: utilization.percent,
                previsto: wp_panel.previsto(),
                realizado: wp_panel.realizado(),
                over_budget: utilization.over_budget,
                baseline_status: wp_panel.baseline_status(),
            });

            let push = |alerts: &mut Vec<Alert>, kind| {
                alerts.push(Alert {
                    workpackage_id: wp_panel.workpackage_id(),
                    workpackage_name: name.clone(),
                    kind,
                    days_until_deadline,
                });
            };

            for kind in Self::budget_alerts(wp_panel) {
                push(&mut alerts, kind);
            }
            if days_until_deadline.is_some_and(|days| (0..=self.deadline_alert_days).contains(&days)) {
                push(&mut alerts, AlertKind::DeadlineApproaching);
            }
        }

        alerts.sort_by_key(|a| (a.days_until_deadline.is_none(), a.days_until_deadline));

        ProjectDashboard {
            project_id: panel.project_id,
            costing_model: panel.costing_model,
            totals: panel.totals,
            percent: panel.percent(),
            progress,
            alerts,
            occupancy,
        }
    }

    /// Builds the annual chart from a monthly expense series.
    #[must_use]
    pub fn year_overview(expenses: &MonthlyExpenses) -> YearOverview {
        let mut labels = Vec::with_capacity(expenses.months.len());
        let mut resources = Vec::with_capacity(expenses.months.len());
        let mut materials = Vec::with_capacity(expenses.months.len());
        let mut cumulative = Vec::with_capacity(expenses.months.len());

        for entry in &expenses.months {
            labels.push(MonthYear {
                year: expenses.year,
                month: entry.month,
            }
            .to_string());
            resources.push(entry.resource_cost);
            materials.push(entry.material_cost);
            cumulative.push(
                entry
                    .cumulative_resource_cost
                    .saturating_add(entry.cumulative_material_cost),
            );
        }

        YearOverview {
            year: expenses.year,
            labels,
            resources,
            materials,
            cumulative,
            unscheduled_materials: expenses.unscheduled_material_cost,
            total: expenses
                .total_resource_cost
                .saturating_add(expenses.total_material_cost),
        }
    }

    fn budget_alerts(panel: &WorkpackagePanel) -> Vec<AlertKind> {
        match panel.baseline_status() {
            BaselineStatus::Missing => return vec![AlertKind::MissingBaseline],
            BaselineStatus::ShapeMismatch => return vec![AlertKind::InconsistentBaseline],
            BaselineStatus::Present => {}
        }

        match panel {
            WorkpackagePanel::EtiDb(p) if overrun(&p.utilization) => {
                vec![AlertKind::OverBudget {
                    rubric: None,
                    ratio: p.utilization.ratio,
                }]
            }
            WorkpackagePanel::Detailed(p) => [(Rubric::Resources, p.rh), (Rubric::Materials, p.mat)]
                .into_iter()
                .filter(|(_, u)| overrun(u))
                .map(|(rubric, u)| AlertKind::OverBudget {
                    rubric: Some(rubric),
                    ratio: u.ratio,
                })
                .collect(),
            WorkpackagePanel::EtiDb(_) => Vec::new(),
        }
    }
}

/// Spending against a zero baseline is an overrun too.
fn overrun(utilization: &Utilization) -> bool {
    utilization.over_budget
        || (utilization.budget <= Decimal::ZERO && utilization.spent > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{CostAggregator, WorkpackageInput};
    use crate::allocation::{ResourceAllocation, Track};
    use crate::project::{CostingModel, FundingProgram};
    use crate::rates::ResolutionContext;
    use crate::snapshot::{BudgetSnapshot, SnapshotBaseline};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tessera_shared::types::{FundingProgramId, ProjectId, SnapshotId, UserId, WorkpackageId};

    fn workpackage(name: &str, end: NaiveDate) -> Workpackage {
        Workpackage {
            id: WorkpackageId::new(),
            project_id: ProjectId::new(),
            name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: Some(end),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn panel(
        wp: &Workpackage,
        program: &FundingProgram,
        baseline: Option<SnapshotBaseline>,
        occupancy: Decimal,
    ) -> WorkpackagePanel {
        let allocations = [ResourceAllocation {
            user_id: UserId::new(),
            workpackage_id: wp.id,
            period: MonthYear::new(3, 2024).unwrap(),
            occupancy,
            track: Track::Real,
        }];
        let snapshot = baseline.map(|baseline| BudgetSnapshot {
            id: SnapshotId::new(),
            workpackage_id: wp.id,
            version: 1,
            taken_at: Utc::now(),
            baseline,
            planned_hours: Decimal::ZERO,
        });
        CostAggregator::default().workpackage_panel(&WorkpackageInput {
            workpackage: wp,
            funding_program: Some(program),
            snapshot: snapshot.as_ref(),
            allocations: &allocations,
            materials: &[],
            context: &ResolutionContext::default(),
        })
    }

    fn eti_program() -> FundingProgram {
        FundingProgram {
            id: FundingProgramId::new(),
            name: "Programa".to_string(),
            overhead_pct: dec!(25),
            financing_rate_pct: dec!(85),
            eti_value: dec!(1000),
            costing_model: CostingModel::EtiDb,
        }
    }

    #[test]
    fn test_alerts_sorted_by_deadline() {
        let program = eti_program();
        let late = workpackage("Late", date(2024, 12, 31));
        let soon = workpackage("Soon", date(2024, 3, 20));
        let baseline = SnapshotBaseline::EtiDb {
            orcamento_previsto_com_eti: dec!(500),
        };
        let panels = vec![
            panel(&late, &program, None, dec!(0.5)),
            panel(&soon, &program, Some(baseline), dec!(1)),
        ];
        let project = CostAggregator::project_panel(ProjectId::new(), CostingModel::EtiDb, panels);

        let dashboard = DashboardProjection::new(30).project_dashboard(
            &project,
            &[late.clone(), soon.clone()],
            Vec::new(),
            date(2024, 3, 1),
        );

        let kinds: Vec<(WorkpackageId, AlertKind)> =
            dashboard.alerts.iter().map(|a| (a.workpackage_id, a.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (
                    soon.id,
                    AlertKind::OverBudget {
                        rubric: None,
                        ratio: dec!(2)
                    }
                ),
                (soon.id, AlertKind::DeadlineApproaching),
                (late.id, AlertKind::MissingBaseline),
            ]
        );
        assert_eq!(dashboard.alerts[0].days_until_deadline, Some(19));
        assert_eq!(dashboard.progress.len(), 2);
        assert_eq!(dashboard.progress[1].percent, dec!(100));
        assert!(dashboard.progress[1].over_budget);
    }

    #[test]
    fn test_detailed_rubric_overrun_alert() {
        let program = FundingProgram {
            costing_model: CostingModel::Detailed,
            ..eti_program()
        };
        let wp = workpackage("WP", date(2025, 12, 31));
        let user = UserId::new();
        let allocations = [ResourceAllocation {
            user_id: user,
            workpackage_id: wp.id,
            period: MonthYear::new(3, 2024).unwrap(),
            occupancy: dec!(0.5),
            track: Track::Real,
        }];
        let snapshot = BudgetSnapshot {
            id: SnapshotId::new(),
            workpackage_id: wp.id,
            version: 1,
            taken_at: Utc::now(),
            baseline: SnapshotBaseline::Detailed {
                previsto_recursos_snapshot: dec!(800),
                previsto_materiais_snapshot: dec!(100),
            },
            planned_hours: Decimal::ZERO,
        };
        let mut context = ResolutionContext::default();
        context.salaries.insert(user, Some(dec!(2000)));
        let wp_panel = CostAggregator::default().workpackage_panel(&WorkpackageInput {
            workpackage: &wp,
            funding_program: Some(&program),
            snapshot: Some(&snapshot),
            allocations: &allocations,
            materials: &[],
            context: &context,
        });

        let alerts = DashboardProjection::budget_alerts(&wp_panel);

        assert_eq!(
            alerts,
            vec![AlertKind::OverBudget {
                rubric: Some(Rubric::Resources),
                ratio: dec!(1.25)
            }]
        );
    }

    #[test]
    fn test_spending_without_baseline_budget_is_overrun() {
        let program = eti_program();
        let wp = workpackage("WP", date(2025, 12, 31));
        let baseline = SnapshotBaseline::EtiDb {
            orcamento_previsto_com_eti: Decimal::ZERO,
        };
        let wp_panel = panel(&wp, &program, Some(baseline), dec!(0.1));

        let alerts = DashboardProjection::budget_alerts(&wp_panel);

        assert_eq!(wp_panel.percent(), Decimal::ZERO);
        assert_eq!(
            alerts,
            vec![AlertKind::OverBudget {
                rubric: None,
                ratio: Decimal::ZERO
            }]
        );
    }

    #[test]
    fn test_year_overview_labels_and_totals() {
        let expenses = CostAggregator::default()
            .monthly_expenses(2024, 3, &[], &[], &ResolutionContext::default())
            .unwrap();

        let overview = DashboardProjection::year_overview(&expenses);

        assert_eq!(overview.labels, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(overview.resources.len(), 3);
        assert_eq!(overview.total, Decimal::ZERO);
    }
}
