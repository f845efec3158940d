//! Finance service.
//!
//! Orchestrates the engine over the collaborator stores:
//! - panels, monthly series and dashboards (read-time, stateless)
//! - snapshot take / re-take / history, serialized per workpackage
//! - project approval, allocation and monthly configuration writes

pub mod error;
pub mod service;
pub mod settings;

#[cfg(test)]
mod tests;

pub use error::{FinanceError, FinanceResult};
pub use service::{AllocationUpsert, FinanceService, ProjectApproval};
pub use settings::FinanceSettings;
