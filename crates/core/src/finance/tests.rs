//! Finance service tests against the in-memory store.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tessera_shared::AppError;
use tessera_shared::types::{
    FundingProgramId, MaterialId, MonthYear, ProjectId, UserId, WorkpackageId,
};

use super::{FinanceError, FinanceService, FinanceSettings};
use crate::aggregation::{BaselineStatus, WorkpackagePanel};
use crate::allocation::{AllocationInput, ResourceAllocation, Track};
use crate::project::{
    CostingModel, FundingProgram, Material, MaterialRubric, Project, ProjectState, Regime,
    UserCostProfile, Workpackage,
};
use crate::snapshot::SnapshotBaseline;
use crate::store::{AllocationStore, InMemoryStore, ProjectStore, Stores};

struct Fixture {
    store: Arc<InMemoryStore>,
    service: Arc<FinanceService>,
    project: ProjectId,
    workpackage: WorkpackageId,
    program: FundingProgramId,
    user: UserId,
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn seed_project(store: &InMemoryStore, model: Option<CostingModel>) -> (ProjectId, WorkpackageId, FundingProgramId) {
    let program = FundingProgram {
        id: FundingProgramId::new(),
        name: "Programa".to_string(),
        overhead_pct: dec!(25),
        financing_rate_pct: dec!(85),
        eti_value: dec!(1200),
        costing_model: model.unwrap_or(CostingModel::Detailed),
    };
    let project = Project {
        id: ProjectId::new(),
        name: "Projeto".to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        funding_program_id: model.map(|_| program.id),
        state: ProjectState::Draft,
    };
    let workpackage = Workpackage {
        id: WorkpackageId::new(),
        project_id: project.id,
        name: "WP1".to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
    };
    let ids = (project.id, workpackage.id, program.id);
    store.insert_funding_program(program);
    store.insert_project(project);
    store.insert_workpackage(workpackage);
    ids
}

fn fixture(model: CostingModel) -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let (project, workpackage, program) = seed_project(&store, Some(model));
    let user = UserId::new();
    store.insert_user(UserCostProfile {
        id: user,
        monthly_salary: Some(dec!(2000)),
        regime: Regime::Integral,
    });
    let service = Arc::new(FinanceService::new(
        Stores::from_backend(store.clone()),
        FinanceSettings::default(),
    ));
    Fixture {
        store,
        service,
        project,
        workpackage,
        program,
        user,
    }
}

fn input(f: &Fixture, month: u32, occupancy: Decimal, track: Track) -> AllocationInput {
    AllocationInput {
        user_id: f.user,
        workpackage_id: f.workpackage,
        month,
        year: 2024,
        track,
        occupancy,
    }
}

fn material(workpackage_id: WorkpackageId, cost: Decimal, month: Option<u32>) -> Material {
    Material {
        id: MaterialId::new(),
        workpackage_id,
        name: "Sensor".to_string(),
        unit_price: cost,
        quantity: Decimal::ONE,
        rubric: MaterialRubric::Equipment,
        year_of_use: 2024,
        month_of_use: month,
    }
}

#[tokio::test]
async fn test_eti_scenario() {
    let f = fixture(CostingModel::EtiDb);
    f.service
        .upsert_allocation(input(&f, 3, dec!(0.5), Track::Submetido))
        .await
        .unwrap();

    let snapshot = f.service.take_snapshot(f.workpackage).await.unwrap();
    f.service
        .upsert_allocation(input(&f, 3, dec!(0.4), Track::Real))
        .await
        .unwrap();
    let panel = f.service.workpackage_panel(f.workpackage).await.unwrap();

    assert_eq!(
        snapshot.baseline,
        SnapshotBaseline::EtiDb {
            orcamento_previsto_com_eti: dec!(600)
        }
    );
    assert_eq!(panel.realizado(), dec!(480));
    assert_eq!(panel.percent(), dec!(80));
    assert_eq!(panel.baseline_status(), BaselineStatus::Present);
}

#[tokio::test]
async fn test_snapshot_immutable_until_resnapshot() {
    let f = fixture(CostingModel::Detailed);
    f.service
        .upsert_allocation(input(&f, 2, dec!(0.5), Track::Submetido))
        .await
        .unwrap();
    let first = f.service.take_snapshot(f.workpackage).await.unwrap();

    f.service
        .upsert_allocation(input(&f, 2, dec!(1), Track::Submetido))
        .await
        .unwrap();
    f.store.insert_material(material(f.workpackage, dec!(300), None));
    let panel = f.service.workpackage_panel(f.workpackage).await.unwrap();

    assert_eq!(panel.previsto(), dec!(1000));
    assert_eq!(first.baseline.total(), dec!(1000));

    let second = f.service.resnapshot(f.workpackage).await.unwrap();
    let history = f.service.snapshot_history(f.workpackage).await.unwrap();

    assert_eq!(second.version, 2);
    assert_eq!(
        second.baseline,
        SnapshotBaseline::Detailed {
            previsto_recursos_snapshot: dec!(2000),
            previsto_materiais_snapshot: dec!(300)
        }
    );
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].baseline, first.baseline);
}

#[tokio::test]
async fn test_take_snapshot_twice_conflicts() {
    let f = fixture(CostingModel::EtiDb);
    f.service.take_snapshot(f.workpackage).await.unwrap();

    let result = f.service.take_snapshot(f.workpackage).await;

    assert!(matches!(result, Err(FinanceError::Conflict(_))));
}

#[tokio::test]
async fn test_resnapshot_without_prior_snapshot_is_version_one() {
    let f = fixture(CostingModel::EtiDb);

    let snapshot = f.service.resnapshot(f.workpackage).await.unwrap();

    assert_eq!(snapshot.version, 1);
}

#[tokio::test]
async fn test_snapshot_without_funding_program_fails() {
    let store = Arc::new(InMemoryStore::new());
    let (_, workpackage, _) = seed_project(&store, None);
    let service = FinanceService::new(Stores::from_backend(store), FinanceSettings::default());

    let result = service.take_snapshot(workpackage).await;

    assert!(matches!(result, Err(FinanceError::Validation(_))));
}

#[tokio::test]
async fn test_concurrent_resnapshots_get_distinct_versions() {
    let f = fixture(CostingModel::EtiDb);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = f.service.clone();
            let workpackage = f.workpackage;
            tokio::spawn(async move { service.resnapshot(workpackage).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let versions: Vec<u32> = f
        .service
        .snapshot_history(f.workpackage)
        .await
        .unwrap()
        .iter()
        .map(|s| s.version)
        .collect();
    assert_eq!(versions, (1..=8).collect::<Vec<u32>>());
    assert_eq!(f.service.snapshot_lock_count(), 0);
}

#[tokio::test]
async fn test_upsert_is_idempotent() {
    let f = fixture(CostingModel::Detailed);

    f.service
        .upsert_allocation(input(&f, 5, dec!(0.3), Track::Real))
        .await
        .unwrap();
    let second = f
        .service
        .upsert_allocation(input(&f, 5, dec!(0.6), Track::Real))
        .await
        .unwrap();

    assert_eq!(f.store.allocation_count(), 1);
    assert_eq!(second.occupancy.total_occupancy, dec!(0.6));
    let panel = f.service.workpackage_panel(f.workpackage).await.unwrap();
    assert_eq!(panel.realizado(), dec!(1200));
}

#[tokio::test]
async fn test_over_allocation_flagged_not_rejected() {
    let f = fixture(CostingModel::Detailed);
    let other = Workpackage {
        id: WorkpackageId::new(),
        project_id: f.project,
        name: "WP2".to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
    };
    f.store.insert_workpackage(other.clone());

    f.service
        .upsert_allocation(input(&f, 7, dec!(0.8), Track::Real))
        .await
        .unwrap();
    let result = f
        .service
        .upsert_allocation(AllocationInput {
            workpackage_id: other.id,
            ..input(&f, 7, dec!(0.4), Track::Real)
        })
        .await
        .unwrap();

    assert_eq!(result.occupancy.total_occupancy, dec!(1.2));
    assert!(result.occupancy.over_allocated);
    assert_eq!(result.occupancy.workpackages.len(), 2);
}

#[rstest]
#[case(0, dec!(0.5))]
#[case(13, dec!(0.5))]
#[case(6, dec!(-0.1))]
#[case(6, Decimal::MAX)]
#[tokio::test]
async fn test_invalid_allocation_rejected(#[case] month: u32, #[case] occupancy: Decimal) {
    let f = fixture(CostingModel::Detailed);

    let result = f
        .service
        .upsert_allocation(input(&f, month, occupancy, Track::Real))
        .await;

    assert!(matches!(result, Err(FinanceError::Validation(_))));
    assert_eq!(f.store.allocation_count(), 0);
}

#[rstest]
#[case(CostingModel::EtiDb)]
#[case(CostingModel::Detailed)]
#[tokio::test]
async fn test_oversized_stored_rows_saturate(#[case] model: CostingModel) {
    let f = fixture(model);
    f.store.insert_user(UserCostProfile {
        id: f.user,
        monthly_salary: Some(Decimal::MAX),
        regime: Regime::Integral,
    });
    f.store
        .insert_material(material(f.workpackage, Decimal::MAX, Some(3)));
    for (month, track) in [(3, Track::Real), (4, Track::Real), (3, Track::Submetido)] {
        f.store
            .upsert(ResourceAllocation {
                user_id: f.user,
                workpackage_id: f.workpackage,
                period: MonthYear::new(month, 2024).unwrap(),
                occupancy: Decimal::MAX,
                track,
            })
            .await
            .unwrap();
    }

    let panel = f.service.workpackage_panel(f.workpackage).await.unwrap();
    let snapshot = f.service.take_snapshot(f.workpackage).await.unwrap();
    let project = f.service.project_panel(f.project).await.unwrap();
    let expenses = f.service.monthly_expenses(2024, 12).await.unwrap();
    let dashboard = f
        .service
        .project_dashboard(f.project, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        .await
        .unwrap();

    assert_eq!(panel.realizado(), Decimal::MAX);
    assert_eq!(snapshot.baseline.total(), Decimal::MAX);
    assert_eq!(project.totals.realizado, Decimal::MAX);
    assert_eq!(expenses.total_resource_cost, Decimal::MAX);
    assert_eq!(dashboard.occupancy[0].total_occupancy, Decimal::MAX);
    assert!(dashboard.occupancy[0].over_allocated);
}

#[tokio::test]
async fn test_allocation_on_unknown_workpackage_not_found() {
    let f = fixture(CostingModel::Detailed);

    let result = f
        .service
        .upsert_allocation(AllocationInput {
            workpackage_id: WorkpackageId::new(),
            ..input(&f, 1, dec!(0.5), Track::Real)
        })
        .await;

    assert!(matches!(
        result,
        Err(FinanceError::NotFound {
            entity: "Workpackage",
            ..
        })
    ));
}

#[tokio::test]
async fn test_panel_model_follows_funding_program() {
    let f = fixture(CostingModel::Detailed);
    f.service.take_snapshot(f.workpackage).await.unwrap();

    let panel = f.service.workpackage_panel(f.workpackage).await.unwrap();
    let json = serde_json::to_value(&panel).unwrap();

    assert!(matches!(panel, WorkpackagePanel::Detailed(_)));
    assert_eq!(json["costing_model"], "DETAILED");
    assert!(json.get("previsto_recursos_snapshot").is_some());
    assert!(json.get("orcamento_previsto_com_eti").is_none());
}

#[tokio::test]
async fn test_project_panel_equals_sum_of_workpackages() {
    let f = fixture(CostingModel::Detailed);
    let second = Workpackage {
        id: WorkpackageId::new(),
        project_id: f.project,
        name: "WP2".to_string(),
        start_date: date(2024, 6, 1),
        end_date: date(2024, 12, 31),
    };
    f.store.insert_workpackage(second.clone());
    f.service
        .upsert_allocation(input(&f, 3, dec!(0.25), Track::Real))
        .await
        .unwrap();
    f.service
        .upsert_allocation(AllocationInput {
            workpackage_id: second.id,
            ..input(&f, 8, dec!(0.5), Track::Real)
        })
        .await
        .unwrap();
    f.store.insert_material(material(second.id, dec!(99.90), Some(8)));

    let project = f.service.project_panel(f.project).await.unwrap();
    let first = f.service.workpackage_panel(f.workpackage).await.unwrap();
    let other = f.service.workpackage_panel(second.id).await.unwrap();

    assert_eq!(project.totals.realizado, first.realizado() + other.realizado());
    assert_eq!(project.totals.realizado, dec!(1599.90));
    assert_eq!(project.detalhes_por_workpackage.len(), 2);
    assert_eq!(project.degraded_workpackages.len(), 2);
    assert_eq!(project.percent(), Decimal::ZERO);
}

#[tokio::test]
async fn test_approve_project_snapshots_every_workpackage() {
    let f = fixture(CostingModel::EtiDb);
    f.service
        .upsert_allocation(input(&f, 4, dec!(0.5), Track::Submetido))
        .await
        .unwrap();

    let approval = f.service.approve_project(f.project).await.unwrap();
    let project = f.store.get_project(f.project).await.unwrap().unwrap();

    assert_eq!(approval.project.state, ProjectState::Approved);
    assert_eq!(project.state, ProjectState::Approved);
    assert_eq!(approval.snapshots_taken.len(), 1);
    assert_eq!(approval.snapshots_taken[0].baseline.total(), dec!(600));

    let again = f.service.approve_project(f.project).await;
    assert!(matches!(again, Err(FinanceError::Validation(_))));
}

#[tokio::test]
async fn test_approve_project_keeps_existing_snapshot() {
    let f = fixture(CostingModel::EtiDb);
    let existing = f.service.take_snapshot(f.workpackage).await.unwrap();

    let approval = f.service.approve_project(f.project).await.unwrap();
    let history = f.service.snapshot_history(f.workpackage).await.unwrap();

    assert!(approval.snapshots_taken.is_empty());
    assert_eq!(approval.snapshots_kept, vec![f.workpackage]);
    assert_eq!(history, vec![existing]);
}

#[tokio::test]
async fn test_approve_project_validates_before_writing() {
    let f = fixture(CostingModel::EtiDb);
    f.store.insert_workpackage(Workpackage {
        id: WorkpackageId::new(),
        project_id: f.project,
        name: "Sem datas".to_string(),
        start_date: None,
        end_date: None,
    });

    let result = f.service.approve_project(f.project).await;

    assert!(matches!(result, Err(FinanceError::Validation(_))));
    assert!(
        f.service
            .snapshot_history(f.workpackage)
            .await
            .unwrap()
            .is_empty()
    );
    let project = f.store.get_project(f.project).await.unwrap().unwrap();
    assert_eq!(project.state, ProjectState::Draft);
}

#[tokio::test]
async fn test_project_runs_through_lifecycle() {
    let f = fixture(CostingModel::EtiDb);

    let early = f.service.start_project(f.project).await;
    assert!(matches!(early, Err(FinanceError::Validation(_))));

    f.service.approve_project(f.project).await.unwrap();
    let started = f.service.start_project(f.project).await.unwrap();
    let completed = f.service.complete_project(f.project).await.unwrap();
    let stored = f.store.get_project(f.project).await.unwrap().unwrap();

    assert_eq!(started.state, ProjectState::InProgress);
    assert_eq!(completed.state, ProjectState::Completed);
    assert_eq!(stored.state, ProjectState::Completed);
}

#[tokio::test]
async fn test_empty_year_returns_twelve_zero_months() {
    let f = fixture(CostingModel::EtiDb);

    let expenses = f.service.monthly_expenses(2024, 12).await.unwrap();

    assert_eq!(expenses.months.len(), 12);
    assert!(
        expenses
            .months
            .iter()
            .all(|m| m.resource_cost == Decimal::ZERO && m.material_cost == Decimal::ZERO)
    );
}

#[tokio::test]
async fn test_monthly_expenses_price_each_project_by_its_model() {
    let f = fixture(CostingModel::EtiDb);
    let (_, detailed_wp, _) = seed_project(&f.store, Some(CostingModel::Detailed));
    f.service
        .upsert_allocation(input(&f, 3, dec!(0.5), Track::Real))
        .await
        .unwrap();
    f.service
        .upsert_allocation(AllocationInput {
            workpackage_id: detailed_wp,
            ..input(&f, 3, dec!(0.5), Track::Real)
        })
        .await
        .unwrap();
    f.store.insert_material(material(detailed_wp, dec!(40), Some(3)));
    f.store.insert_material(material(detailed_wp, dec!(60), None));

    let expenses = f.service.monthly_expenses(2024, 6).await.unwrap();
    let overview = f.service.year_overview(2024).await.unwrap();

    assert_eq!(expenses.months.len(), 6);
    assert_eq!(expenses.months[2].resource_cost, dec!(1600));
    assert_eq!(expenses.months[2].material_cost, dec!(40));
    assert_eq!(expenses.unscheduled_material_cost, dec!(60));
    assert_eq!(overview.labels.len(), 12);
    assert_eq!(overview.total, dec!(1700));
}

#[tokio::test]
async fn test_monthly_expenses_rejects_bad_limit() {
    let f = fixture(CostingModel::EtiDb);

    let result = f.service.monthly_expenses(2024, 0).await;

    assert!(matches!(result, Err(FinanceError::Validation(_))));
}

#[tokio::test]
async fn test_monthly_configuration_changes_implied_hours_only() {
    let f = fixture(CostingModel::Detailed);
    f.service
        .upsert_monthly_configuration(3, 2024, 21, dec!(168))
        .await
        .unwrap();
    f.service
        .upsert_allocation(input(&f, 3, dec!(0.5), Track::Real))
        .await
        .unwrap();

    let panel = f.service.workpackage_panel(f.workpackage).await.unwrap();

    assert_eq!(panel.realizado(), dec!(1000));
    assert_eq!(panel.breakdown().total_hours, dec!(84));
}

#[tokio::test]
async fn test_invalid_monthly_configuration_rejected() {
    let f = fixture(CostingModel::Detailed);

    let result = f
        .service
        .upsert_monthly_configuration(3, 2024, 32, dec!(160))
        .await;

    assert!(matches!(result, Err(FinanceError::Validation(_))));
}

#[tokio::test]
async fn test_delete_funding_program() {
    let f = fixture(CostingModel::EtiDb);
    let unused = FundingProgram {
        id: FundingProgramId::new(),
        name: "Livre".to_string(),
        overhead_pct: dec!(0),
        financing_rate_pct: dec!(100),
        eti_value: dec!(1000),
        costing_model: CostingModel::EtiDb,
    };
    f.store.insert_funding_program(unused.clone());

    let in_use = f.service.delete_funding_program(f.program).await;
    let missing = f.service.delete_funding_program(FundingProgramId::new()).await;
    let deleted = f.service.delete_funding_program(unused.id).await;

    assert!(matches!(in_use, Err(FinanceError::Conflict(_))));
    assert!(matches!(missing, Err(FinanceError::NotFound { .. })));
    assert!(deleted.is_ok());
}

#[tokio::test]
async fn test_dashboard_reports_cross_project_occupancy() {
    let f = fixture(CostingModel::EtiDb);
    let (_, other_wp, _) = seed_project(&f.store, Some(CostingModel::EtiDb));
    f.service
        .upsert_allocation(input(&f, 9, dec!(0.7), Track::Real))
        .await
        .unwrap();
    f.service
        .upsert_allocation(AllocationInput {
            workpackage_id: other_wp,
            ..input(&f, 9, dec!(0.6), Track::Real)
        })
        .await
        .unwrap();

    let dashboard = f
        .service
        .project_dashboard(f.project, NaiveDate::from_ymd_opt(2024, 12, 15).unwrap())
        .await
        .unwrap();

    assert_eq!(dashboard.occupancy.len(), 1);
    assert!(dashboard.occupancy[0].over_allocated);
    assert_eq!(dashboard.progress.len(), 1);
    assert_eq!(dashboard.alerts.len(), 2);
    assert_eq!(dashboard.alerts[0].days_until_deadline, Some(16));
}

#[tokio::test]
async fn test_unknown_ids_not_found() {
    let f = fixture(CostingModel::EtiDb);

    assert!(matches!(
        f.service.workpackage_panel(WorkpackageId::new()).await,
        Err(FinanceError::NotFound { .. })
    ));
    assert!(matches!(
        f.service.project_panel(ProjectId::new()).await,
        Err(FinanceError::NotFound { .. })
    ));
    assert!(matches!(
        f.service.take_snapshot(WorkpackageId::new()).await,
        Err(FinanceError::NotFound { .. })
    ));
}

#[rstest]
#[case(FinanceError::Validation("bad".into()), 400)]
#[case(FinanceError::not_found("Project", "x"), 404)]
#[case(FinanceError::Conflict("in use".into()), 409)]
#[case(FinanceError::Store(crate::store::StoreError::Unavailable("timeout".into())), 503)]
#[case(FinanceError::Store(crate::store::StoreError::Backend("boom".into())), 500)]
fn test_error_maps_to_status(#[case] err: FinanceError, #[case] status: u16) {
    let app: AppError = err.into();
    assert_eq!(app.status_code(), status);
}

#[test]
fn test_store_timeout_is_retryable() {
    let err = FinanceError::Store(crate::store::StoreError::Unavailable("timeout".into()));
    assert!(err.is_retryable());
    assert!(!FinanceError::Conflict("x".into()).is_retryable());
}
