//! Snapshot error types.

use tessera_shared::types::{PeriodError, WorkpackageId};
use thiserror::Error;

/// Errors raised when taking a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Workpackage has no complete date range.
    #[error("Workpackage {0} has no date range")]
    MissingDateRange(WorkpackageId),

    /// Workpackage's project has no funding program.
    #[error("Workpackage {0} has no funding program")]
    MissingFundingProgram(WorkpackageId),

    /// Workpackage date range is inverted.
    #[error("Workpackage {workpackage_id} has an invalid date range: {source}")]
    InvalidDateRange {
        /// Workpackage ID.
        workpackage_id: WorkpackageId,
        /// Underlying period error.
        source: PeriodError,
    },

    /// A snapshot exists; only an explicit re-snapshot may replace it.
    #[error("Workpackage {workpackage_id} already has snapshot version {version}")]
    AlreadyTaken {
        /// Workpackage ID.
        workpackage_id: WorkpackageId,
        /// Current snapshot version.
        version: u32,
    },
}
