//! Row to domain conversions.
//!
//! A row that does not parse is reported as a backend failure; the schema's
//! CHECK constraints keep this from happening outside manual edits.

use tessera_core::allocation::{ResourceAllocation, Track};
use tessera_core::project::{
    CostingModel, FundingProgram, Material, MaterialRubric, Project, ProjectState, Workpackage,
};
use tessera_core::rates::MonthlyConfiguration;
use tessera_core::snapshot::{BudgetSnapshot, SnapshotBaseline};
use tessera_core::store::{StoreError, StoreResult};
use tessera_shared::types::{
    FundingProgramId, MaterialId, MonthYear, ProjectId, SnapshotId, UserId, WorkpackageId,
};

use crate::entities::{
    budget_snapshots, funding_programs, materials, monthly_configurations, projects,
    resource_allocations, workpackages,
};

fn corrupt(table: &str, column: &str, value: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(format!("{table}.{column} holds invalid value '{value}'"))
}

fn unsigned(table: &str, column: &str, value: i32) -> StoreResult<u32> {
    u32::try_from(value).map_err(|_| corrupt(table, column, value))
}

fn period(table: &str, month: i32, year: i32) -> StoreResult<MonthYear> {
    MonthYear::new(unsigned(table, "month", month)?, year)
        .map_err(|_| corrupt(table, "month", format!("{month}/{year}")))
}

pub(super) fn costing_model(table: &str, value: &str) -> StoreResult<CostingModel> {
    CostingModel::parse(value).ok_or_else(|| corrupt(table, "costing_model", value))
}

pub(super) fn funding_program(row: funding_programs::Model) -> StoreResult<FundingProgram> {
    Ok(FundingProgram {
        id: FundingProgramId::from_uuid(row.id),
        costing_model: costing_model("funding_programs", &row.costing_model)?,
        name: row.name,
        overhead_pct: row.overhead_pct,
        financing_rate_pct: row.financing_rate_pct,
        eti_value: row.eti_value,
    })
}

pub(super) fn project(row: projects::Model) -> StoreResult<Project> {
    let state =
        ProjectState::parse(&row.state).ok_or_else(|| corrupt("projects", "state", &row.state))?;
    Ok(Project {
        id: ProjectId::from_uuid(row.id),
        name: row.name,
        start_date: row.start_date,
        end_date: row.end_date,
        funding_program_id: row.funding_program_id.map(FundingProgramId::from_uuid),
        state,
    })
}

pub(super) fn workpackage(row: workpackages::Model) -> Workpackage {
    Workpackage {
        id: WorkpackageId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        name: row.name,
        start_date: row.start_date,
        end_date: row.end_date,
    }
}

pub(super) fn allocation(row: resource_allocations::Model) -> StoreResult<ResourceAllocation> {
    const TABLE: &str = "resource_allocations";
    Ok(ResourceAllocation {
        user_id: UserId::from_uuid(row.user_id),
        workpackage_id: WorkpackageId::from_uuid(row.workpackage_id),
        period: period(TABLE, row.month, row.year)?,
        occupancy: row.occupancy,
        track: Track::parse(&row.track).ok_or_else(|| corrupt(TABLE, "track", &row.track))?,
    })
}

pub(super) fn material(row: materials::Model) -> StoreResult<Material> {
    const TABLE: &str = "materials";
    let rubric =
        MaterialRubric::parse(&row.rubric).ok_or_else(|| corrupt(TABLE, "rubric", &row.rubric))?;
    let month_of_use = row
        .month_of_use
        .map(|m| unsigned(TABLE, "month_of_use", m))
        .transpose()?;
    Ok(Material {
        id: MaterialId::from_uuid(row.id),
        workpackage_id: WorkpackageId::from_uuid(row.workpackage_id),
        name: row.name,
        unit_price: row.unit_price,
        quantity: row.quantity,
        rubric,
        year_of_use: row.year_of_use,
        month_of_use,
    })
}

pub(super) fn monthly_configuration(
    row: monthly_configurations::Model,
) -> StoreResult<MonthlyConfiguration> {
    const TABLE: &str = "monthly_configurations";
    Ok(MonthlyConfiguration {
        period: period(TABLE, row.month, row.year)?,
        working_days: unsigned(TABLE, "working_days", row.working_days)?,
        potential_hours: row.potential_hours,
    })
}

pub(super) fn snapshot(row: budget_snapshots::Model) -> StoreResult<BudgetSnapshot> {
    const TABLE: &str = "budget_snapshots";
    let baseline = match costing_model(TABLE, &row.costing_model)? {
        CostingModel::EtiDb => SnapshotBaseline::EtiDb {
            orcamento_previsto_com_eti: row
                .orcamento_previsto_com_eti
                .ok_or_else(|| corrupt(TABLE, "orcamento_previsto_com_eti", "NULL"))?,
        },
        CostingModel::Detailed => SnapshotBaseline::Detailed {
            previsto_recursos_snapshot: row
                .previsto_recursos_snapshot
                .ok_or_else(|| corrupt(TABLE, "previsto_recursos_snapshot", "NULL"))?,
            previsto_materiais_snapshot: row
                .previsto_materiais_snapshot
                .ok_or_else(|| corrupt(TABLE, "previsto_materiais_snapshot", "NULL"))?,
        },
    };
    Ok(BudgetSnapshot {
        id: SnapshotId::from_uuid(row.id),
        workpackage_id: WorkpackageId::from_uuid(row.workpackage_id),
        version: unsigned(TABLE, "version", row.version)?,
        taken_at: row.taken_at.to_utc(),
        baseline,
        planned_hours: row.planned_hours,
    })
}

/// Converts a domain count into an INTEGER column value.
pub(super) fn signed(column: &str, value: u32) -> StoreResult<i32> {
    i32::try_from(value)
        .map_err(|_| StoreError::Backend(format!("{column} value {value} out of range")))
}

pub(super) fn collect<R, T>(
    rows: Vec<R>,
    convert: impl Fn(R) -> StoreResult<T>,
) -> StoreResult<Vec<T>> {
    rows.into_iter().map(convert).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn snapshot_row(model: &str) -> budget_snapshots::Model {
        budget_snapshots::Model {
            id: Uuid::now_v7(),
            workpackage_id: Uuid::now_v7(),
            version: 2,
            costing_model: model.to_string(),
            orcamento_previsto_com_eti: Some(dec!(600)),
            previsto_recursos_snapshot: None,
            previsto_materiais_snapshot: None,
            planned_hours: dec!(80),
            is_current: true,
            taken_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_eti_snapshot_row() {
        let snapshot = snapshot(snapshot_row("ETI_DB")).unwrap();
        assert_eq!(snapshot.version, 2);
        assert_eq!(
            snapshot.baseline,
            SnapshotBaseline::EtiDb {
                orcamento_previsto_com_eti: dec!(600)
            }
        );
    }

    #[test]
    fn test_detailed_snapshot_row_missing_rubric_is_backend_error() {
        let result = snapshot(snapshot_row("DETAILED"));
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[test]
    fn test_unknown_track_is_backend_error() {
        let now = Utc::now().into();
        let row = resource_allocations::Model {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            workpackage_id: Uuid::now_v7(),
            month: 3,
            year: 2024,
            track: "planned".to_string(),
            occupancy: dec!(0.5),
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(allocation(row), Err(StoreError::Backend(_))));
    }

    #[test]
    fn test_material_month_parsed() {
        let row = materials::Model {
            id: Uuid::now_v7(),
            workpackage_id: Uuid::now_v7(),
            name: "Sensor".to_string(),
            unit_price: dec!(50),
            quantity: dec!(2),
            rubric: "equipment".to_string(),
            year_of_use: 2024,
            month_of_use: Some(7),
            created_at: Utc::now().into(),
        };
        let material = material(row).unwrap();
        assert_eq!(material.rubric, MaterialRubric::Equipment);
        assert_eq!(material.scheduled_period(), MonthYear::new(7, 2024).ok());
        assert_eq!(material.cost(), dec!(100));
    }
}
