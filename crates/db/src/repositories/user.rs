//! User cost fields.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use tessera_core::store::{StoreResult, UserStore};
use tessera_shared::types::UserId;

use super::{PgStore, db_err};
use crate::entities::users;

#[async_trait]
impl UserStore for PgStore {
    async fn get_salary(&self, user_id: UserId) -> StoreResult<Option<Decimal>> {
        Ok(users::Entity::find_by_id(user_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .and_then(|user| user.monthly_salary))
    }
}
