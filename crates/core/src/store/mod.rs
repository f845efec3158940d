//! Collaborator contracts.
//!
//! The engine reads and writes through these traits only. `tessera-db`
//! implements them on PostgreSQL; [`InMemoryStore`] implements them on
//! concurrent maps for tests and database-less runs.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tessera_shared::types::{FundingProgramId, MonthYear, ProjectId, UserId, WorkpackageId};
use thiserror::Error;

use crate::allocation::{ResourceAllocation, Track};
use crate::project::{FundingProgram, Material, Project, ProjectState, Workpackage};
use crate::rates::MonthlyConfiguration;
use crate::snapshot::BudgetSnapshot;

pub use memory::InMemoryStore;

/// Errors returned by collaborator stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store unreachable or timed out; the caller may retry.
    #[error("Data store unavailable: {0}")]
    Unavailable(String),

    /// Store rejected the write because of existing references.
    #[error("{0}")]
    Conflict(String),

    /// Any other store failure.
    #[error("Data store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true if the failure is transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Projects and their workpackages.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fetches a project.
    async fn get_project(&self, id: ProjectId) -> StoreResult<Option<Project>>;

    /// Lists every project.
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    /// Fetches a workpackage.
    async fn get_workpackage(&self, id: WorkpackageId) -> StoreResult<Option<Workpackage>>;

    /// Lists the workpackages of a project, ordered by start date.
    async fn list_workpackages(&self, project_id: ProjectId) -> StoreResult<Vec<Workpackage>>;

    /// Sets a project's lifecycle state.
    async fn set_project_state(&self, id: ProjectId, state: ProjectState) -> StoreResult<()>;
}

/// Occupancy allocations on both tracks.
#[async_trait]
pub trait AllocationStore: Send + Sync {
    /// Lists a workpackage's allocations, optionally on one track only.
    async fn list_by_workpackage(
        &self,
        workpackage_id: WorkpackageId,
        track: Option<Track>,
    ) -> StoreResult<Vec<ResourceAllocation>>;

    /// Lists every allocation of a project's workpackages.
    async fn list_by_project(&self, project_id: ProjectId) -> StoreResult<Vec<ResourceAllocation>>;

    /// Lists a user's allocations in a year.
    async fn list_by_user(&self, user_id: UserId, year: i32)
    -> StoreResult<Vec<ResourceAllocation>>;

    /// Lists all allocations in a year, optionally on one track only.
    async fn list_by_year(
        &self,
        year: i32,
        track: Option<Track>,
    ) -> StoreResult<Vec<ResourceAllocation>>;

    /// Inserts or replaces the allocation with the same key.
    ///
    /// Must be a single idempotent write, never insert-then-update.
    async fn upsert(&self, allocation: ResourceAllocation) -> StoreResult<()>;
}

/// Material cost lines.
#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// Lists a workpackage's materials.
    async fn list_by_workpackage(&self, workpackage_id: WorkpackageId)
    -> StoreResult<Vec<Material>>;

    /// Lists all materials used in a year.
    async fn list_by_year(&self, year: i32) -> StoreResult<Vec<Material>>;
}

/// Working-time parameters per calendar month.
#[async_trait]
pub trait MonthlyConfigStore: Send + Sync {
    /// Fetches the configuration of one month, if a row exists.
    async fn get(&self, period: MonthYear) -> StoreResult<Option<MonthlyConfiguration>>;

    /// Lists the configuration rows of a year.
    async fn list_by_year(&self, year: i32) -> StoreResult<Vec<MonthlyConfiguration>>;

    /// Inserts or replaces the row for the configuration's month.
    async fn upsert(&self, config: MonthlyConfiguration) -> StoreResult<()>;
}

/// Cost-relevant user fields.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the monthly salary of a user, `None` when unset or unknown.
    async fn get_salary(&self, user_id: UserId) -> StoreResult<Option<Decimal>>;
}

/// Funding programs.
#[async_trait]
pub trait FundingProgramStore: Send + Sync {
    /// Fetches a funding program.
    async fn get(&self, id: FundingProgramId) -> StoreResult<Option<FundingProgram>>;

    /// Fetches the funding program of a project, if it has one.
    async fn get_for_project(&self, project_id: ProjectId) -> StoreResult<Option<FundingProgram>>;

    /// Deletes a funding program.
    ///
    /// Returns `false` when it does not exist and `StoreError::Conflict` when a
    /// project still references it.
    async fn delete(&self, id: FundingProgramId) -> StoreResult<bool>;
}

/// Budget snapshots and their history.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Fetches the current snapshot of a workpackage.
    async fn current(&self, workpackage_id: WorkpackageId) -> StoreResult<Option<BudgetSnapshot>>;

    /// Lists every snapshot of a workpackage, ordered by version.
    async fn history(&self, workpackage_id: WorkpackageId) -> StoreResult<Vec<BudgetSnapshot>>;

    /// Makes `snapshot` the current one in a single atomic write.
    ///
    /// The superseded snapshot stays in the history.
    async fn replace(&self, snapshot: BudgetSnapshot) -> StoreResult<()>;
}

/// The full set of collaborators the engine depends on.
#[derive(Clone)]
pub struct Stores {
    /// Projects and workpackages.
    pub projects: Arc<dyn ProjectStore>,
    /// Allocations.
    pub allocations: Arc<dyn AllocationStore>,
    /// Materials.
    pub materials: Arc<dyn MaterialStore>,
    /// Monthly configuration.
    pub monthly_configs: Arc<dyn MonthlyConfigStore>,
    /// Users.
    pub users: Arc<dyn UserStore>,
    /// Funding programs.
    pub funding_programs: Arc<dyn FundingProgramStore>,
    /// Snapshots.
    pub snapshots: Arc<dyn SnapshotStore>,
}

impl Stores {
    /// Uses one backend for every collaborator.
    pub fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: ProjectStore
            + AllocationStore
            + MaterialStore
            + MonthlyConfigStore
            + UserStore
            + FundingProgramStore
            + SnapshotStore
            + 'static,
    {
        Self {
            projects: backend.clone(),
            allocations: backend.clone(),
            materials: backend.clone(),
            monthly_configs: backend.clone(),
            users: backend.clone(),
            funding_programs: backend.clone(),
            snapshots: backend,
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
