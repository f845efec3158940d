//! Projects and workpackages.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tessera_core::project::{Project, ProjectState, Workpackage};
use tessera_core::store::{ProjectStore, StoreResult};
use tessera_shared::types::{ProjectId, WorkpackageId};

use super::{PgStore, convert, db_err};
use crate::entities::{projects, workpackages};

#[async_trait]
impl ProjectStore for PgStore {
    async fn get_project(&self, id: ProjectId) -> StoreResult<Option<Project>> {
        projects::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(convert::project)
            .transpose()
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let rows = projects::Entity::find()
            .order_by_asc(projects::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        convert::collect(rows, convert::project)
    }

    async fn get_workpackage(&self, id: WorkpackageId) -> StoreResult<Option<Workpackage>> {
        Ok(workpackages::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(convert::workpackage))
    }

    async fn list_workpackages(&self, project_id: ProjectId) -> StoreResult<Vec<Workpackage>> {
        let rows = workpackages::Entity::find()
            .filter(workpackages::Column::ProjectId.eq(project_id.into_inner()))
            .order_by_asc(workpackages::Column::StartDate)
            .order_by_asc(workpackages::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(convert::workpackage).collect())
    }

    async fn set_project_state(&self, id: ProjectId, state: ProjectState) -> StoreResult<()> {
        projects::ActiveModel {
            id: Set(id.into_inner()),
            state: Set(state.as_str().to_string()),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
