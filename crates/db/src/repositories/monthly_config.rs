//! Monthly working-time configuration.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tessera_core::rates::MonthlyConfiguration;
use tessera_core::store::{MonthlyConfigStore, StoreResult};
use tessera_shared::types::MonthYear;
use uuid::Uuid;

use super::{PgStore, convert, db_err};
use crate::entities::monthly_configurations;

#[async_trait]
impl MonthlyConfigStore for PgStore {
    async fn get(&self, period: MonthYear) -> StoreResult<Option<MonthlyConfiguration>> {
        monthly_configurations::Entity::find()
            .filter(monthly_configurations::Column::Month.eq(convert::signed("month", period.month)?))
            .filter(monthly_configurations::Column::Year.eq(period.year))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(convert::monthly_configuration)
            .transpose()
    }

    async fn list_by_year(&self, year: i32) -> StoreResult<Vec<MonthlyConfiguration>> {
        let rows = monthly_configurations::Entity::find()
            .filter(monthly_configurations::Column::Year.eq(year))
            .order_by_asc(monthly_configurations::Column::Month)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        convert::collect(rows, convert::monthly_configuration)
    }

    async fn upsert(&self, config: MonthlyConfiguration) -> StoreResult<()> {
        let row = monthly_configurations::ActiveModel {
            id: Set(Uuid::now_v7()),
            month: Set(convert::signed("month", config.period.month)?),
            year: Set(config.period.year),
            working_days: Set(convert::signed("working_days", config.working_days)?),
            potential_hours: Set(config.potential_hours),
            updated_at: Set(chrono::Utc::now().into()),
        };

        monthly_configurations::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    monthly_configurations::Column::Month,
                    monthly_configurations::Column::Year,
                ])
                .update_columns([
                    monthly_configurations::Column::WorkingDays,
                    monthly_configurations::Column::PotentialHours,
                    monthly_configurations::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
