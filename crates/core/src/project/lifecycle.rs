//! Project state machine.
//!
//! The valid transitions are:
//! - Draft → Approved (approve; planned baselines are frozen at this point)
//! - Approved → InProgress (start)
//! - InProgress → Completed (complete)

use super::error::LifecycleError;
use super::types::ProjectState;

/// Stateless validator for project state transitions.
pub struct ProjectLifecycle;

impl ProjectLifecycle {
    /// Validates the approval of a draft project.
    pub fn approve(current: ProjectState) -> Result<ProjectState, LifecycleError> {
        Self::transition(current, ProjectState::Approved)
    }

    /// Validates the start of an approved project.
    pub fn start(current: ProjectState) -> Result<ProjectState, LifecycleError> {
        Self::transition(current, ProjectState::InProgress)
    }

    /// Validates the completion of a running project.
    pub fn complete(current: ProjectState) -> Result<ProjectState, LifecycleError> {
        Self::transition(current, ProjectState::Completed)
    }

    /// Returns true if `from → to` is an allowed transition.
    #[must_use]
    pub const fn can_transition(from: ProjectState, to: ProjectState) -> bool {
        matches!(
            (from, to),
            (ProjectState::Draft, ProjectState::Approved)
                | (ProjectState::Approved, ProjectState::InProgress)
                | (ProjectState::InProgress, ProjectState::Completed)
        )
    }

    fn transition(from: ProjectState, to: ProjectState) -> Result<ProjectState, LifecycleError> {
        if Self::can_transition(from, to) {
            Ok(to)
        } else {
            Err(LifecycleError::InvalidTransition { from, to })
        }
    }
}
