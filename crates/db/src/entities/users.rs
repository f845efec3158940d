//! `SeaORM` Entity for users table.
//!
//! Only the cost-relevant columns are mapped.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    pub monthly_salary: Option<Decimal>,
    pub regime: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::resource_allocations::Entity")]
    ResourceAllocations,
}

impl Related<super::resource_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResourceAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
