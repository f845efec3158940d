//! Resource allocations.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select, Set,
};
use tessera_core::allocation::{ResourceAllocation, Track};
use tessera_core::store::{AllocationStore, StoreResult};
use tessera_shared::types::{ProjectId, UserId, WorkpackageId};
use uuid::Uuid;

use super::{PgStore, convert, db_err};
use crate::entities::{resource_allocations, workpackages};

/// Applies the optional track filter and the chronological ordering.
fn ordered(
    query: Select<resource_allocations::Entity>,
    track: Option<Track>,
) -> Select<resource_allocations::Entity> {
    let query = match track {
        Some(track) => query.filter(resource_allocations::Column::Track.eq(track.as_str())),
        None => query,
    };
    query
        .order_by_asc(resource_allocations::Column::Year)
        .order_by_asc(resource_allocations::Column::Month)
        .order_by_asc(resource_allocations::Column::UserId)
        .order_by_asc(resource_allocations::Column::WorkpackageId)
}

impl PgStore {
    async fn fetch_allocations(
        &self,
        query: Select<resource_allocations::Entity>,
        track: Option<Track>,
    ) -> StoreResult<Vec<ResourceAllocation>> {
        let rows = ordered(query, track).all(&self.db).await.map_err(db_err)?;
        convert::collect(rows, convert::allocation)
    }
}

#[async_trait]
impl AllocationStore for PgStore {
    async fn list_by_workpackage(
        &self,
        workpackage_id: WorkpackageId,
        track: Option<Track>,
    ) -> StoreResult<Vec<ResourceAllocation>> {
        let query = resource_allocations::Entity::find().filter(
            resource_allocations::Column::WorkpackageId.eq(workpackage_id.into_inner()),
        );
        self.fetch_allocations(query, track).await
    }

    async fn list_by_project(&self, project_id: ProjectId) -> StoreResult<Vec<ResourceAllocation>> {
        let query = resource_allocations::Entity::find()
            .join(
                JoinType::InnerJoin,
                resource_allocations::Relation::Workpackages.def(),
            )
            .filter(workpackages::Column::ProjectId.eq(project_id.into_inner()));
        self.fetch_allocations(query, None).await
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        year: i32,
    ) -> StoreResult<Vec<ResourceAllocation>> {
        let query = resource_allocations::Entity::find()
            .filter(resource_allocations::Column::UserId.eq(user_id.into_inner()))
            .filter(resource_allocations::Column::Year.eq(year));
        self.fetch_allocations(query, None).await
    }

    async fn list_by_year(
        &self,
        year: i32,
        track: Option<Track>,
    ) -> StoreResult<Vec<ResourceAllocation>> {
        let query =
            resource_allocations::Entity::find().filter(resource_allocations::Column::Year.eq(year));
        self.fetch_allocations(query, track).await
    }

    async fn upsert(&self, allocation: ResourceAllocation) -> StoreResult<()> {
        let now = chrono::Utc::now();
        let row = resource_allocations::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(allocation.user_id.into_inner()),
            workpackage_id: Set(allocation.workpackage_id.into_inner()),
            month: Set(convert::signed("month", allocation.period.month)?),
            year: Set(allocation.period.year),
            track: Set(allocation.track.as_str().to_string()),
            occupancy: Set(allocation.occupancy),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        resource_allocations::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    resource_allocations::Column::UserId,
                    resource_allocations::Column::WorkpackageId,
                    resource_allocations::Column::Month,
                    resource_allocations::Column::Year,
                    resource_allocations::Column::Track,
                ])
                .update_columns([
                    resource_allocations::Column::Occupancy,
                    resource_allocations::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
