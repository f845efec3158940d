//! Finance service error types.

use tessera_shared::AppError;
use tessera_shared::types::PeriodError;
use thiserror::Error;

use crate::aggregation::AggregationError;
use crate::allocation::AllocationError;
use crate::project::LifecycleError;
use crate::rates::RateError;
use crate::snapshot::SnapshotError;
use crate::store::StoreError;

/// Result alias for finance operations.
pub type FinanceResult<T> = Result<T, FinanceError>;

/// Hard failures surfaced to callers.
///
/// Missing baselines and zero budgets are not in this list: they degrade the
/// panels instead of failing the request.
#[derive(Debug, Error)]
pub enum FinanceError {
    /// Malformed input; never retried.
    #[error("{0}")]
    Validation(String),

    /// Referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Requested ID.
        id: String,
    },

    /// Write rejected by current state.
    #[error("{0}")]
    Conflict(String),

    /// Collaborator failure.
    #[error(transparent)]
    Store(StoreError),
}

impl FinanceError {
    /// Creates a not-found error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns true if the caller may retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

impl From<StoreError> for FinanceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Store(other),
        }
    }
}

impl From<SnapshotError> for FinanceError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::AlreadyTaken { .. } => Self::Conflict(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

impl From<AllocationError> for FinanceError {
    fn from(err: AllocationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RateError> for FinanceError {
    fn from(err: RateError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<AggregationError> for FinanceError {
    fn from(err: AggregationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<LifecycleError> for FinanceError {
    fn from(err: LifecycleError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<PeriodError> for FinanceError {
    fn from(err: PeriodError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<FinanceError> for AppError {
    fn from(err: FinanceError) -> Self {
        match err {
            FinanceError::Validation(msg) => Self::Validation(msg),
            err @ FinanceError::NotFound { .. } => Self::NotFound(err.to_string()),
            FinanceError::Conflict(msg) => Self::Conflict(msg),
            FinanceError::Store(e) if e.is_retryable() => Self::Unavailable(e.to_string()),
            FinanceError::Store(e) => Self::Database(e.to_string()),
        }
    }
}
