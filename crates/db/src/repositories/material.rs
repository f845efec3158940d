//! Material cost lines.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tessera_core::project::Material;
use tessera_core::store::{MaterialStore, StoreResult};
use tessera_shared::types::WorkpackageId;

use super::{PgStore, convert, db_err};
use crate::entities::materials;

#[async_trait]
impl MaterialStore for PgStore {
    async fn list_by_workpackage(
        &self,
        workpackage_id: WorkpackageId,
    ) -> StoreResult<Vec<Material>> {
        let rows = materials::Entity::find()
            .filter(materials::Column::WorkpackageId.eq(workpackage_id.into_inner()))
            .order_by_asc(materials::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        convert::collect(rows, convert::material)
    }

    async fn list_by_year(&self, year: i32) -> StoreResult<Vec<Material>> {
        let rows = materials::Entity::find()
            .filter(materials::Column::YearOfUse.eq(year))
            .order_by_asc(materials::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        convert::collect(rows, convert::material)
    }
}
