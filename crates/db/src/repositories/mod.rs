//! PostgreSQL implementations of the collaborator stores.
//!
//! [`PgStore`] implements every store trait of `tessera-core` on one
//! connection pool, so a single value backs the whole finance service.

mod allocation;
mod convert;
mod funding_program;
mod material;
mod monthly_config;
mod project;
mod snapshot;
mod user;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use tessera_core::store::StoreError;

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    /// Creates a store over an open connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Maps a database error onto the store taxonomy.
///
/// Connection failures are retryable; constraint violations are conflicts.
pub(crate) fn db_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg) | SqlErr::ForeignKeyConstraintViolation(msg)) => {
            return StoreError::Conflict(msg);
        }
        _ => {}
    }
    match err {
        DbErr::ConnectionAcquire(e) => StoreError::Unavailable(e.to_string()),
        DbErr::Conn(e) => StoreError::Unavailable(e.to_string()),
        other => StoreError::Backend(other.to_string()),
    }
}
