//! Project lifecycle error types.

use thiserror::Error;

use super::types::ProjectState;

/// Errors raised by project state transitions.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Attempted an invalid state transition.
    #[error("Invalid project state transition from {from} to {to}")]
    InvalidTransition {
        /// The current state.
        from: ProjectState,
        /// The attempted target state.
        to: ProjectState,
    },
}
