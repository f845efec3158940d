//! Projects, workpackages, funding programs and the project lifecycle.

pub mod error;
pub mod lifecycle;
pub mod types;

pub use error::LifecycleError;
pub use lifecycle::ProjectLifecycle;
pub use types::{
    CostingModel, FundingProgram, Material, MaterialRubric, Project, ProjectState, Regime,
    Rubric, UserCostProfile, Workpackage,
};
