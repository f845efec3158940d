//! `SeaORM` Entity for resource_allocations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "resource_allocations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub workpackage_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub track: String,
    pub occupancy: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::workpackages::Entity",
        from = "Column::WorkpackageId",
        to = "super::workpackages::Column::Id"
    )]
    Workpackages,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::workpackages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workpackages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
