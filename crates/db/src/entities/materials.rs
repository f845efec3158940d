//! `SeaORM` Entity for materials table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workpackage_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
    pub rubric: String,
    pub year_of_use: i32,
    pub month_of_use: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
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
