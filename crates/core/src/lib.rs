//! Core financial logic for Tessera.
//!
//! This crate turns time-phased resource allocations and material costs into a
//! project's budget position. It has ZERO web or database dependencies: data
//! arrives through the collaborator traits in [`store`].
//!
//! # Modules
//!
//! - `project` - Projects, workpackages, funding programs and lifecycle
//! - `allocation` - Occupancy allocations, validation and over-allocation checks
//! - `rates` - Rate Resolver: occupancy fraction to money
//! - `snapshot` - Budget Snapshot Manager: frozen planned baselines
//! - `aggregation` - Cost Aggregator: planned vs realized panels and series
//! - `dashboard` - Reporting projection of aggregator output
//! - `store` - Collaborator contracts and an in-memory implementation
//! - `finance` - Orchestration service exposed to callers

pub mod aggregation;
pub mod allocation;
pub mod dashboard;
pub mod finance;
pub mod project;
pub mod rates;
pub mod snapshot;
pub mod store;

pub use finance::{FinanceError, FinanceService, FinanceSettings};
