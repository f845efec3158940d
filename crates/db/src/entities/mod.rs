//! `SeaORM` entity definitions.
//!
//! Enumerations are stored as TEXT and parsed with the domain `parse` helpers;
//! months, years and versions are stored as INTEGER.

pub mod budget_snapshots;
pub mod funding_programs;
pub mod materials;
pub mod monthly_configurations;
pub mod projects;
pub mod resource_allocations;
pub mod users;
pub mod workpackages;
