//! In-memory store backed by concurrent maps.

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tessera_shared::types::{
    FundingProgramId, MaterialId, MonthYear, ProjectId, UserId, WorkpackageId,
};

use crate::allocation::{AllocationKey, ResourceAllocation, Track};
use crate::project::{FundingProgram, Material, Project, ProjectState, UserCostProfile, Workpackage};
use crate::rates::MonthlyConfiguration;
use crate::snapshot::BudgetSnapshot;

use super::{
    AllocationStore, FundingProgramStore, MaterialStore, MonthlyConfigStore, ProjectStore,
    SnapshotStore, StoreError, StoreResult, UserStore,
};

/// Implements every collaborator contract in process memory.
///
/// Writes that must be atomic (allocation upsert, snapshot replace) each touch
/// a single map entry under its shard lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    projects: DashMap<ProjectId, Project>,
    workpackages: DashMap<WorkpackageId, Workpackage>,
    funding_programs: DashMap<FundingProgramId, FundingProgram>,
    users: DashMap<UserId, UserCostProfile>,
    allocations: DashMap<AllocationKey, ResourceAllocation>,
    materials: DashMap<MaterialId, Material>,
    monthly_configs: DashMap<MonthYear, MonthlyConfiguration>,
    snapshots: DashMap<WorkpackageId, Vec<BudgetSnapshot>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a funding program.
    pub fn insert_funding_program(&self, program: FundingProgram) {
        self.funding_programs.insert(program.id, program);
    }

    /// Inserts or replaces a project.
    pub fn insert_project(&self, project: Project) {
        self.projects.insert(project.id, project);
    }

    /// Inserts or replaces a workpackage.
    pub fn insert_workpackage(&self, workpackage: Workpackage) {
        self.workpackages.insert(workpackage.id, workpackage);
    }

    /// Inserts or replaces a user's cost profile.
    pub fn insert_user(&self, user: UserCostProfile) {
        self.users.insert(user.id, user);
    }

    /// Inserts or replaces a material line.
    pub fn insert_material(&self, material: Material) {
        self.materials.insert(material.id, material);
    }

    /// Returns the number of stored allocation rows.
    #[must_use]
    pub fn allocation_count(&self) -> usize {
        self.allocations.len()
    }

    fn workpackages_of(&self, project_id: ProjectId) -> Vec<WorkpackageId> {
        self.workpackages
            .iter()
            .filter(|wp| wp.project_id == project_id)
            .map(|wp| wp.id)
            .collect()
    }

    fn collect_allocations<F>(&self, predicate: F) -> Vec<ResourceAllocation>
    where
        F: Fn(&ResourceAllocation) -> bool,
    {
        let mut rows: Vec<ResourceAllocation> = self
            .allocations
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|a| (a.period, a.user_id, a.workpackage_id));
        rows
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn get_project(&self, id: ProjectId) -> StoreResult<Option<Project>> {
        Ok(self.projects.get(&id).map(|p| p.clone()))
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> = self.projects.iter().map(|p| p.clone()).collect();
        projects.sort_by_key(|p| p.id);
        Ok(projects)
    }

    async fn get_workpackage(&self, id: WorkpackageId) -> StoreResult<Option<Workpackage>> {
        Ok(self.workpackages.get(&id).map(|wp| wp.clone()))
    }

    async fn list_workpackages(&self, project_id: ProjectId) -> StoreResult<Vec<Workpackage>> {
        let mut workpackages: Vec<Workpackage> = self
            .workpackages
            .iter()
            .filter(|wp| wp.project_id == project_id)
            .map(|wp| wp.clone())
            .collect();
        workpackages.sort_by_key(|wp| (wp.start_date, wp.id));
        Ok(workpackages)
    }

    async fn set_project_state(&self, id: ProjectId, state: ProjectState) -> StoreResult<()> {
        match self.projects.get_mut(&id) {
            Some(mut project) => {
                project.state = state;
                Ok(())
            }
            None => Err(StoreError::Backend(format!("Project {id} not found"))),
        }
    }
}

#[async_trait]
impl AllocationStore for InMemoryStore {
    async fn list_by_workpackage(
        &self,
        workpackage_id: WorkpackageId,
        track: Option<Track>,
    ) -> StoreResult<Vec<ResourceAllocation>> {
        Ok(self.collect_allocations(|a| {
            a.workpackage_id == workpackage_id && track.is_none_or(|t| a.track == t)
        }))
    }

    async fn list_by_project(&self, project_id: ProjectId) -> StoreResult<Vec<ResourceAllocation>> {
        let workpackages = self.workpackages_of(project_id);
        Ok(self.collect_allocations(|a| workpackages.contains(&a.workpackage_id)))
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        year: i32,
    ) -> StoreResult<Vec<ResourceAllocation>> {
        Ok(self.collect_allocations(|a| a.user_id == user_id && a.period.year == year))
    }

    async fn list_by_year(
        &self,
        year: i32,
        track: Option<Track>,
    ) -> StoreResult<Vec<ResourceAllocation>> {
        Ok(self.collect_allocations(|a| {
            a.period.year == year && track.is_none_or(|t| a.track == t)
        }))
    }

    async fn upsert(&self, allocation: ResourceAllocation) -> StoreResult<()> {
        self.allocations.insert(allocation.key(), allocation);
        Ok(())
    }
}

#[async_trait]
impl MaterialStore for InMemoryStore {
    async fn list_by_workpackage(
        &self,
        workpackage_id: WorkpackageId,
    ) -> StoreResult<Vec<Material>> {
        let mut materials: Vec<Material> = self
            .materials
            .iter()
            .filter(|m| m.workpackage_id == workpackage_id)
            .map(|m| m.clone())
            .collect();
        materials.sort_by_key(|m| m.id);
        Ok(materials)
    }

    async fn list_by_year(&self, year: i32) -> StoreResult<Vec<Material>> {
        let mut materials: Vec<Material> = self
            .materials
            .iter()
            .filter(|m| m.year_of_use == year)
            .map(|m| m.clone())
            .collect();
        materials.sort_by_key(|m| m.id);
        Ok(materials)
    }
}

#[async_trait]
impl MonthlyConfigStore for InMemoryStore {
    async fn get(&self, period: MonthYear) -> StoreResult<Option<MonthlyConfiguration>> {
        Ok(self.monthly_configs.get(&period).map(|c| c.clone()))
    }

    async fn list_by_year(&self, year: i32) -> StoreResult<Vec<MonthlyConfiguration>> {
        let mut configs: Vec<MonthlyConfiguration> = self
            .monthly_configs
            .iter()
            .filter(|c| c.period.year == year)
            .map(|c| c.clone())
            .collect();
        configs.sort_by_key(|c| c.period);
        Ok(configs)
    }

    async fn upsert(&self, config: MonthlyConfiguration) -> StoreResult<()> {
        self.monthly_configs.insert(config.period, config);
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get_salary(&self, user_id: UserId) -> StoreResult<Option<Decimal>> {
        Ok(self.users.get(&user_id).and_then(|u| u.monthly_salary))
    }
}

#[async_trait]
impl FundingProgramStore for InMemoryStore {
    async fn get(&self, id: FundingProgramId) -> StoreResult<Option<FundingProgram>> {
        Ok(self.funding_programs.get(&id).map(|p| p.clone()))
    }

    async fn get_for_project(&self, project_id: ProjectId) -> StoreResult<Option<FundingProgram>> {
        let program_id = self
            .projects
            .get(&project_id)
            .and_then(|p| p.funding_program_id);
        Ok(program_id.and_then(|id| self.funding_programs.get(&id).map(|p| p.clone())))
    }

    async fn delete(&self, id: FundingProgramId) -> StoreResult<bool> {
        let referenced = self
            .projects
            .iter()
            .filter(|p| p.funding_program_id == Some(id))
            .count();
        if referenced > 0 {
            return Err(StoreError::Conflict(format!(
                "Funding program {id} is referenced by {referenced} project(s)"
            )));
        }
        Ok(self.funding_programs.remove(&id).is_some())
    }
}

#[async_trait]
impl SnapshotStore for InMemoryStore {
    async fn current(&self, workpackage_id: WorkpackageId) -> StoreResult<Option<BudgetSnapshot>> {
        Ok(self
            .snapshots
            .get(&workpackage_id)
            .and_then(|history| history.last().cloned()))
    }

    async fn history(&self, workpackage_id: WorkpackageId) -> StoreResult<Vec<BudgetSnapshot>> {
        Ok(self
            .snapshots
            .get(&workpackage_id)
            .map(|history| history.clone())
            .unwrap_or_default())
    }

    async fn replace(&self, snapshot: BudgetSnapshot) -> StoreResult<()> {
        let mut history = self.snapshots.entry(snapshot.workpackage_id).or_default();
        if history.last().is_some_and(|last| last.version >= snapshot.version) {
            return Err(StoreError::Conflict(format!(
                "Snapshot version {} of workpackage {} is not newer than the current one",
                snapshot.version, snapshot.workpackage_id
            )));
        }
        history.push(snapshot);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
