//! Dashboard projection.
//!
//! Read-only shaping of aggregator output for presentation:
//! - Per-workpackage progress bars
//! - Alert lists sorted by days until deadline
//! - Annual expense chart

pub mod service;
pub mod types;

pub use service::DashboardProjection;
pub use types::*;
