use super::*;
use crate::project::{CostingModel, ProjectState};
use crate::snapshot::SnapshotBaseline;
use chrono::Utc;
use rust_decimal_macros::dec;
use tessera_shared::types::SnapshotId;

fn allocation(user_id: UserId, workpackage_id: WorkpackageId, occupancy: Decimal) -> ResourceAllocation {
    ResourceAllocation {
        user_id,
        workpackage_id,
        period: MonthYear::new(3, 2024).unwrap(),
        occupancy,
        track: Track::Real,
    }
}

fn snapshot(workpackage_id: WorkpackageId, version: u32, amount: Decimal) -> BudgetSnapshot {
    BudgetSnapshot {
        id: SnapshotId::new(),
        workpackage_id,
        version,
        taken_at: Utc::now(),
        baseline: SnapshotBaseline::EtiDb {
            orcamento_previsto_com_eti: amount,
        },
        planned_hours: Decimal::ZERO,
    }
}

fn program() -> FundingProgram {
    FundingProgram {
        id: FundingProgramId::new(),
        name: "Programa".to_string(),
        overhead_pct: dec!(25),
        financing_rate_pct: dec!(85),
        eti_value: dec!(1200),
        costing_model: CostingModel::EtiDb,
    }
}

#[tokio::test]
async fn test_upsert_keeps_one_row_per_key() {
    let store = InMemoryStore::new();
    let user = UserId::new();
    let wp = WorkpackageId::new();

    AllocationStore::upsert(&store, allocation(user, wp, dec!(0.5))).await.unwrap();
    AllocationStore::upsert(&store, allocation(user, wp, dec!(0.7))).await.unwrap();

    let rows = AllocationStore::list_by_workpackage(&store, wp, None).await.unwrap();
    assert_eq!(store.allocation_count(), 1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].occupancy, dec!(0.7));
}

#[tokio::test]
async fn test_track_filter() {
    let store = InMemoryStore::new();
    let user = UserId::new();
    let wp = WorkpackageId::new();
    let mut planned = allocation(user, wp, dec!(0.5));
    planned.track = Track::Submetido;

    AllocationStore::upsert(&store, allocation(user, wp, dec!(0.4))).await.unwrap();
    AllocationStore::upsert(&store, planned).await.unwrap();

    let real = AllocationStore::list_by_workpackage(&store, wp, Some(Track::Real))
        .await
        .unwrap();
    let all = AllocationStore::list_by_year(&store, 2024, None).await.unwrap();
    assert_eq!(real.len(), 1);
    assert_eq!(real[0].occupancy, dec!(0.4));
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_snapshot_replace_keeps_history() {
    let store = InMemoryStore::new();
    let wp = WorkpackageId::new();

    store.replace(snapshot(wp, 1, dec!(600))).await.unwrap();
    store.replace(snapshot(wp, 2, dec!(700))).await.unwrap();

    let current = store.current(wp).await.unwrap().unwrap();
    let history = store.history(wp).await.unwrap();
    assert_eq!(current.version, 2);
    assert_eq!(current.baseline.total(), dec!(700));
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].baseline.total(), dec!(600));
}

#[tokio::test]
async fn test_snapshot_replace_rejects_stale_version() {
    let store = InMemoryStore::new();
    let wp = WorkpackageId::new();

    store.replace(snapshot(wp, 1, dec!(600))).await.unwrap();
    let result = store.replace(snapshot(wp, 1, dec!(650))).await;

    assert!(matches!(result, Err(StoreError::Conflict(_))));
    assert_eq!(store.history(wp).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_funding_program_in_use_cannot_be_deleted() {
    let store = InMemoryStore::new();
    let program = program();
    let project_id = ProjectId::new();
    store.insert_funding_program(program.clone());
    store.insert_project(Project {
        id: project_id,
        name: "P".to_string(),
        start_date: None,
        end_date: None,
        funding_program_id: Some(program.id),
        state: ProjectState::Draft,
    });

    let in_use = FundingProgramStore::delete(&store, program.id).await;
    let found = store.get_for_project(project_id).await.unwrap();

    assert!(matches!(in_use, Err(StoreError::Conflict(_))));
    assert_eq!(found, Some(program));
}

#[tokio::test]
async fn test_unreferenced_funding_program_deleted() {
    let store = InMemoryStore::new();
    let program = program();
    store.insert_funding_program(program.clone());

    assert!(FundingProgramStore::delete(&store, program.id).await.unwrap());
    assert!(!FundingProgramStore::delete(&store, program.id).await.unwrap());
}

#[tokio::test]
async fn test_salary_lookup() {
    let store = InMemoryStore::new();
    let user = UserId::new();
    store.insert_user(UserCostProfile {
        id: user,
        monthly_salary: Some(dec!(2000)),
        regime: crate::project::Regime::Integral,
    });

    assert_eq!(store.get_salary(user).await.unwrap(), Some(dec!(2000)));
    assert_eq!(store.get_salary(UserId::new()).await.unwrap(), None);
}
