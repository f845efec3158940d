//! `SeaORM` Entity for projects table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub funding_program_id: Option<Uuid>,
    pub state: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::funding_programs::Entity",
        from = "Column::FundingProgramId",
        to = "super::funding_programs::Column::Id",
        on_delete = "Restrict"
    )]
    FundingPrograms,
    #[sea_orm(has_many = "super::workpackages::Entity")]
    Workpackages,
}

impl Related<super::funding_programs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundingPrograms.def()
    }
}

impl Related<super::workpackages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workpackages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
