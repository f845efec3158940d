//! `SeaORM` Entity for budget_snapshots table.
//!
//! Every row is kept; the row with `is_current` is the live baseline.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_snapshots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workpackage_id: Uuid,
    pub version: i32,
    pub costing_model: String,
    pub orcamento_previsto_com_eti: Option<Decimal>,
    pub previsto_recursos_snapshot: Option<Decimal>,
    pub previsto_materiais_snapshot: Option<Decimal>,
    pub planned_hours: Decimal,
    pub is_current: bool,
    pub taken_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workpackages::Entity",
        from = "Column::WorkpackageId",
        to = "super::workpackages::Column::Id"
    )]
    Workpackages,
}

impl Related<super::workpackages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workpackages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
