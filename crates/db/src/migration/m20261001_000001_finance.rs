//! Finance schema: funding programs, projects, allocations, materials,
//! monthly configuration and budget snapshots.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(FINANCE_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const FINANCE_SQL: &str = r"
CREATE TABLE funding_programs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    overhead_pct NUMERIC(7, 4) NOT NULL DEFAULT 0,
    financing_rate_pct NUMERIC(7, 4) NOT NULL DEFAULT 0,
    eti_value NUMERIC(19, 4) NOT NULL DEFAULT 0,
    costing_model VARCHAR(16) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_costing_model CHECK (costing_model IN ('ETI_DB', 'DETAILED')),
    CONSTRAINT chk_eti_value_non_negative CHECK (eti_value >= 0)
);

CREATE TABLE projects (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    start_date DATE,
    end_date DATE,
    funding_program_id UUID REFERENCES funding_programs(id) ON DELETE RESTRICT,
    state VARCHAR(16) NOT NULL DEFAULT 'draft',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_project_state CHECK (state IN ('draft', 'approved', 'in_progress', 'completed')),
    CONSTRAINT chk_project_dates CHECK (end_date IS NULL OR start_date IS NULL OR end_date >= start_date)
);

CREATE INDEX idx_projects_funding_program ON projects(funding_program_id);

CREATE TABLE workpackages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    start_date DATE,
    end_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_workpackage_dates CHECK (end_date IS NULL OR start_date IS NULL OR end_date >= start_date)
);

CREATE INDEX idx_workpackages_project ON workpackages(project_id, start_date);

CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(255) NOT NULL,
    monthly_salary NUMERIC(19, 4),
    regime VARCHAR(16) NOT NULL DEFAULT 'INTEGRAL',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_regime CHECK (regime IN ('INTEGRAL', 'PARCIAL'))
);

CREATE TABLE resource_allocations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    workpackage_id UUID NOT NULL REFERENCES workpackages(id) ON DELETE CASCADE,
    month INTEGER NOT NULL,
    year INTEGER NOT NULL,
    track VARCHAR(16) NOT NULL,
    occupancy NUMERIC(7, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_allocation_slot UNIQUE (user_id, workpackage_id, month, year, track),
    CONSTRAINT chk_allocation_month CHECK (month BETWEEN 1 AND 12),
    CONSTRAINT chk_allocation_year CHECK (year >= 1900),
    CONSTRAINT chk_allocation_track CHECK (track IN ('real', 'submetido')),
    CONSTRAINT chk_occupancy_range CHECK (occupancy BETWEEN 0 AND 10)
);

CREATE INDEX idx_allocations_workpackage ON resource_allocations(workpackage_id, track);
CREATE INDEX idx_allocations_user_year ON resource_allocations(user_id, year);
CREATE INDEX idx_allocations_year ON resource_allocations(year, month);

CREATE TABLE materials (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    workpackage_id UUID NOT NULL REFERENCES workpackages(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    unit_price NUMERIC(19, 4) NOT NULL,
    quantity NUMERIC(19, 4) NOT NULL,
    rubric VARCHAR(16) NOT NULL DEFAULT 'materials',
    year_of_use INTEGER NOT NULL,
    month_of_use INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_material_rubric CHECK (rubric IN ('materials', 'equipment')),
    CONSTRAINT chk_material_month CHECK (month_of_use IS NULL OR month_of_use BETWEEN 1 AND 12)
);

CREATE INDEX idx_materials_workpackage ON materials(workpackage_id);
CREATE INDEX idx_materials_year ON materials(year_of_use);

CREATE TABLE monthly_configurations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    month INTEGER NOT NULL,
    year INTEGER NOT NULL,
    working_days INTEGER NOT NULL,
    potential_hours NUMERIC(7, 2) NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_monthly_configuration UNIQUE (month, year),
    CONSTRAINT chk_config_month CHECK (month BETWEEN 1 AND 12),
    CONSTRAINT chk_working_days CHECK (working_days BETWEEN 1 AND 31),
    CONSTRAINT chk_potential_hours CHECK (potential_hours > 0)
);

-- Append-only snapshot history; exactly one current row per workpackage
CREATE TABLE budget_snapshots (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    workpackage_id UUID NOT NULL REFERENCES workpackages(id) ON DELETE CASCADE,
    version INTEGER NOT NULL,
    costing_model VARCHAR(16) NOT NULL,
    orcamento_previsto_com_eti NUMERIC(19, 4),
    previsto_recursos_snapshot NUMERIC(19, 4),
    previsto_materiais_snapshot NUMERIC(19, 4),
    planned_hours NUMERIC(19, 4) NOT NULL DEFAULT 0,
    is_current BOOLEAN NOT NULL DEFAULT true,
    taken_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_snapshot_version UNIQUE (workpackage_id, version),
    CONSTRAINT chk_snapshot_version CHECK (version >= 1),
    CONSTRAINT chk_snapshot_shape CHECK (
        (costing_model = 'ETI_DB'
            AND orcamento_previsto_com_eti IS NOT NULL
            AND previsto_recursos_snapshot IS NULL
            AND previsto_materiais_snapshot IS NULL)
        OR (costing_model = 'DETAILED'
            AND orcamento_previsto_com_eti IS NULL
            AND previsto_recursos_snapshot IS NOT NULL
            AND previsto_materiais_snapshot IS NOT NULL)
    )
);

CREATE UNIQUE INDEX idx_snapshots_current ON budget_snapshots(workpackage_id) WHERE is_current;
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS budget_snapshots CASCADE;
DROP TABLE IF EXISTS monthly_configurations CASCADE;
DROP TABLE IF EXISTS materials CASCADE;
DROP TABLE IF EXISTS resource_allocations CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS workpackages CASCADE;
DROP TABLE IF EXISTS projects CASCADE;
DROP TABLE IF EXISTS funding_programs CASCADE;
";
