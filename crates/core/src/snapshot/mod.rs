//! Budget Snapshot Manager.
//!
//! Freezes the planned cost of a workpackage at approval time so later changes
//! to allocations or materials never move the comparison baseline. A snapshot is
//! only ever superseded by an explicit re-snapshot, which writes a new version.

pub mod error;
pub mod service;
pub mod types;


pub use error::SnapshotError;
pub use service::{SnapshotCalculator, SnapshotInput};
pub use types::{BudgetSnapshot, PlannedBaseline, SnapshotBaseline};
