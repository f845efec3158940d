//! Funding programs.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tessera_core::project::FundingProgram;
use tessera_core::store::{FundingProgramStore, StoreError, StoreResult};
use tessera_shared::types::{FundingProgramId, ProjectId};

use super::{PgStore, convert, db_err};
use crate::entities::{funding_programs, projects};

#[async_trait]
impl FundingProgramStore for PgStore {
    async fn get(&self, id: FundingProgramId) -> StoreResult<Option<FundingProgram>> {
        funding_programs::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(convert::funding_program)
            .transpose()
    }

    async fn get_for_project(&self, project_id: ProjectId) -> StoreResult<Option<FundingProgram>> {
        projects::Entity::find_by_id(project_id.into_inner())
            .find_also_related(funding_programs::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .and_then(|(_, program)| program)
            .map(convert::funding_program)
            .transpose()
    }

    async fn delete(&self, id: FundingProgramId) -> StoreResult<bool> {
        let referenced = projects::Entity::find()
            .filter(projects::Column::FundingProgramId.eq(id.into_inner()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        if referenced > 0 {
            return Err(StoreError::Conflict(format!(
                "Funding program {id} is referenced by {referenced} project(s)"
            )));
        }

        // The RESTRICT foreign key rejects a project linked after the count.
        let result = funding_programs::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
