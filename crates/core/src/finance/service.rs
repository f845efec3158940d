//! Finance service: fetches through the stores, computes with the engine.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use tessera_shared::types::{FundingProgramId, ProjectId, UserId, WorkpackageId};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::aggregation::{
    CostAggregator, CostSource, MonthlyExpenses, ProjectPanel, WorkpackageInput, WorkpackagePanel,
};
use crate::allocation::{
    AllocationInput, AllocationValidator, OccupancyLedger, OccupancySummary, ResourceAllocation,
    Track,
};
use crate::dashboard::{DashboardProjection, ProjectDashboard, YearOverview};
use crate::project::{
    CostingModel, FundingProgram, Project, ProjectLifecycle, ProjectState, Workpackage,
};
use crate::rates::{CostBasis, MonthlyConfiguration, RateResolver, ResolutionContext};
use crate::snapshot::{BudgetSnapshot, SnapshotCalculator, SnapshotError, SnapshotInput};
use crate::store::Stores;

use super::error::{FinanceError, FinanceResult};
use super::settings::FinanceSettings;

/// Outcome of an allocation upsert.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationUpsert {
    /// The stored allocation.
    pub allocation: ResourceAllocation,
    /// The user's total for that month and track after the write.
    pub occupancy: OccupancySummary,
}

/// Outcome of a project approval.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectApproval {
    /// The project in its new state.
    pub project: Project,
    /// Snapshots taken for workpackages that had none.
    pub snapshots_taken: Vec<BudgetSnapshot>,
    /// Workpackages that already had a snapshot.
    pub snapshots_kept: Vec<WorkpackageId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapshotMode {
    /// Fail if a snapshot exists.
    Take,
    /// Supersede any existing snapshot.
    Retake,
    /// Keep an existing snapshot.
    IfMissing,
}

enum SnapshotWrite {
    Written(BudgetSnapshot),
    Kept(BudgetSnapshot),
}

/// Entry point of the financial engine.
///
/// Reads are stateless and recompute from current store data on every call.
/// Snapshot writes are serialized per workpackage.
pub struct FinanceService {
    stores: Stores,
    settings: FinanceSettings,
    resolver: RateResolver,
    snapshot_locks: DashMap<WorkpackageId, Arc<Mutex<()>>>,
}

impl FinanceService {
    /// Creates a service over the given stores.
    #[must_use]
    pub fn new(stores: Stores, settings: FinanceSettings) -> Self {
        Self {
            stores,
            settings,
            resolver: RateResolver::new(settings.monthly_defaults),
            snapshot_locks: DashMap::new(),
        }
    }

    fn aggregator(&self) -> CostAggregator {
        CostAggregator::new(self.resolver)
    }

    // ------------------------------------------------------------------
    // Panels
    // ------------------------------------------------------------------

    /// Computes the planned vs realized panel of a workpackage.
    pub async fn workpackage_panel(&self, id: WorkpackageId) -> FinanceResult<WorkpackagePanel> {
        let workpackage = self.require_workpackage(id).await?;
        let program = self
            .stores
            .funding_programs
            .get_for_project(workpackage.project_id)
            .await?;
        self.panel_for(&workpackage, program.as_ref()).await
    }

    /// Computes the panel of a project from its workpackage panels.
    pub async fn project_panel(&self, id: ProjectId) -> FinanceResult<ProjectPanel> {
        let project = self.require_project(id).await?;
        let workpackages = self.stores.projects.list_workpackages(project.id).await?;
        self.project_panel_for(&project, &workpackages).await
    }

    /// Computes the zero-filled monthly expense series of a year across all
    /// projects.
    pub async fn monthly_expenses(&self, year: i32, limit: u32) -> FinanceResult<MonthlyExpenses> {
        let projects = self.stores.projects.list_projects().await?;
        let allocations = self
            .stores
            .allocations
            .list_by_year(year, Some(Track::Real))
            .await?;
        let materials = self.stores.materials.list_by_year(year).await?;

        let mut owners: HashMap<WorkpackageId, (usize, Workpackage)> = HashMap::new();
        let mut bases = Vec::with_capacity(projects.len());
        for (index, project) in projects.iter().enumerate() {
            let program = self.stores.funding_programs.get_for_project(project.id).await?;
            bases.push(CostBasis::for_program(program.as_ref()));
            for workpackage in self.stores.projects.list_workpackages(project.id).await? {
                owners.insert(workpackage.id, (index, workpackage));
            }
        }

        let mut grouped: Vec<Vec<ResourceAllocation>> = vec![Vec::new(); projects.len()];
        for allocation in allocations {
            if let Some((index, workpackage)) = owners.get(&allocation.workpackage_id)
                && workpackage.covers(allocation.period)
                && let Some(group) = grouped.get_mut(*index)
            {
                group.push(allocation);
            }
        }
        let materials: Vec<_> = materials
            .into_iter()
            .filter(|m| owners.contains_key(&m.workpackage_id))
            .collect();

        let context = self.context_for(grouped.iter().flatten()).await?;
        let sources: Vec<CostSource<'_>> = bases
            .iter()
            .zip(&grouped)
            .map(|(&basis, allocations)| CostSource { basis, allocations })
            .collect();

        Ok(self
            .aggregator()
            .monthly_expenses(year, limit, &sources, &materials, &context)?)
    }

    /// Computes the annual expense chart.
    pub async fn year_overview(&self, year: i32) -> FinanceResult<YearOverview> {
        let expenses = self.monthly_expenses(year, 12).await?;
        Ok(DashboardProjection::year_overview(&expenses))
    }

    /// Builds the dashboard of a project as of `today`.
    pub async fn project_dashboard(
        &self,
        id: ProjectId,
        today: NaiveDate,
    ) -> FinanceResult<ProjectDashboard> {
        let project = self.require_project(id).await?;
        let workpackages = self.stores.projects.list_workpackages(project.id).await?;
        let panel = self.project_panel_for(&project, &workpackages).await?;

        let project_allocations = self.stores.allocations.list_by_project(project.id).await?;
        let keys: BTreeSet<(UserId, i32)> = project_allocations
            .iter()
            .map(|a| (a.user_id, a.period.year))
            .collect();
        let periods: BTreeSet<_> = project_allocations
            .iter()
            .map(|a| (a.user_id, a.period))
            .collect();

        let mut user_allocations = Vec::new();
        for (user_id, year) in keys {
            user_allocations.extend(self.stores.allocations.list_by_user(user_id, year).await?);
        }
        let occupancy = OccupancyLedger::summarize(&user_allocations)
            .into_iter()
            .filter(|s| periods.contains(&(s.user_id, s.period)))
            .collect();

        Ok(DashboardProjection::new(self.settings.deadline_alert_days).project_dashboard(
            &panel,
            &workpackages,
            occupancy,
            today,
        ))
    }

    /// Sums a user's occupancy per month and track over a year.
    pub async fn user_occupancy(
        &self,
        user_id: UserId,
        year: i32,
    ) -> FinanceResult<Vec<OccupancySummary>> {
        let allocations = self.stores.allocations.list_by_user(user_id, year).await?;
        Ok(OccupancyLedger::summarize(&allocations))
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Freezes the planned baseline of a workpackage.
    ///
    /// Fails with a conflict when a snapshot already exists.
    pub async fn take_snapshot(&self, id: WorkpackageId) -> FinanceResult<BudgetSnapshot> {
        let workpackage = self.require_workpackage(id).await?;
        match self.write_snapshot(&workpackage, SnapshotMode::Take).await? {
            SnapshotWrite::Written(snapshot) | SnapshotWrite::Kept(snapshot) => Ok(snapshot),
        }
    }

    /// Recomputes the planned baseline of a workpackage as a new version.
    pub async fn resnapshot(&self, id: WorkpackageId) -> FinanceResult<BudgetSnapshot> {
        let workpackage = self.require_workpackage(id).await?;
        match self.write_snapshot(&workpackage, SnapshotMode::Retake).await? {
            SnapshotWrite::Written(snapshot) | SnapshotWrite::Kept(snapshot) => Ok(snapshot),
        }
    }

    /// Lists every snapshot version of a workpackage.
    pub async fn snapshot_history(&self, id: WorkpackageId) -> FinanceResult<Vec<BudgetSnapshot>> {
        self.require_workpackage(id).await?;
        Ok(self.stores.snapshots.history(id).await?)
    }

    /// Approves a draft project and freezes the baselines of its workpackages.
    ///
    /// Every workpackage is validated before any snapshot is written.
    pub async fn approve_project(&self, id: ProjectId) -> FinanceResult<ProjectApproval> {
        let mut project = self.require_project(id).await?;
        let next_state = ProjectLifecycle::approve(project.state)?;
        let program = self.stores.funding_programs.get_for_project(project.id).await?;
        let workpackages = self.stores.projects.list_workpackages(project.id).await?;

        for workpackage in &workpackages {
            SnapshotCalculator::validate(workpackage, program.as_ref())?;
        }

        let mut snapshots_taken = Vec::new();
        let mut snapshots_kept = Vec::new();
        for workpackage in &workpackages {
            match self.write_snapshot(workpackage, SnapshotMode::IfMissing).await? {
                SnapshotWrite::Written(snapshot) => snapshots_taken.push(snapshot),
                SnapshotWrite::Kept(_) => snapshots_kept.push(workpackage.id),
            }
        }

        self.stores
            .projects
            .set_project_state(project.id, next_state)
            .await?;
        project.state = next_state;

        info!(
            project_id = %project.id,
            workpackages = workpackages.len(),
            snapshots_taken = snapshots_taken.len(),
            "Project approved"
        );

        Ok(ProjectApproval {
            project,
            snapshots_taken,
            snapshots_kept,
        })
    }

    /// Moves an approved project to in progress.
    pub async fn start_project(&self, id: ProjectId) -> FinanceResult<Project> {
        let project = self.require_project(id).await?;
        let next_state = ProjectLifecycle::start(project.state)?;
        self.set_state(project, next_state).await
    }

    /// Closes a running project.
    pub async fn complete_project(&self, id: ProjectId) -> FinanceResult<Project> {
        let project = self.require_project(id).await?;
        let next_state = ProjectLifecycle::complete(project.state)?;
        self.set_state(project, next_state).await
    }

    async fn set_state(&self, mut project: Project, state: ProjectState) -> FinanceResult<Project> {
        self.stores.projects.set_project_state(project.id, state).await?;
        info!(project_id = %project.id, from = %project.state, to = %state, "Project state changed");
        project.state = state;
        Ok(project)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Validates and upserts an allocation.
    pub async fn upsert_allocation(&self, input: AllocationInput) -> FinanceResult<AllocationUpsert> {
        let allocation = AllocationValidator::validate(&input)?;
        self.require_workpackage(allocation.workpackage_id).await?;

        self.stores.allocations.upsert(allocation.clone()).await?;

        let user_allocations = self
            .stores
            .allocations
            .list_by_user(allocation.user_id, allocation.period.year)
            .await?;
        let same_slot: Vec<ResourceAllocation> = user_allocations
            .into_iter()
            .filter(|a| a.period == allocation.period && a.track == allocation.track)
            .collect();
        let occupancy = OccupancyLedger::summarize(&same_slot)
            .into_iter()
            .next()
            .unwrap_or_else(|| OccupancySummary {
                user_id: allocation.user_id,
                period: allocation.period,
                track: allocation.track,
                total_occupancy: allocation.occupancy,
                workpackages: vec![allocation.workpackage_id],
                over_allocated: allocation.occupancy > Decimal::ONE,
            });

        debug!(
            user_id = %allocation.user_id,
            workpackage_id = %allocation.workpackage_id,
            period = %allocation.period,
            track = %allocation.track,
            occupancy = %allocation.occupancy,
            "Allocation upserted"
        );

        Ok(AllocationUpsert {
            allocation,
            occupancy,
        })
    }

    /// Validates and upserts the working-time parameters of a month.
    pub async fn upsert_monthly_configuration(
        &self,
        month: u32,
        year: i32,
        working_days: u32,
        potential_hours: Decimal,
    ) -> FinanceResult<MonthlyConfiguration> {
        let config = MonthlyConfiguration::new(month, year, working_days, potential_hours)?;
        self.stores.monthly_configs.upsert(config.clone()).await?;
        info!(
            period = %config.period,
            working_days,
            potential_hours = %potential_hours,
            "Monthly configuration updated"
        );
        Ok(config)
    }

    /// Deletes a funding program that no project references.
    pub async fn delete_funding_program(&self, id: FundingProgramId) -> FinanceResult<()> {
        if self.stores.funding_programs.get(id).await?.is_none() {
            return Err(FinanceError::not_found("Funding program", id));
        }
        if !self.stores.funding_programs.delete(id).await? {
            return Err(FinanceError::not_found("Funding program", id));
        }
        info!(funding_program_id = %id, "Funding program deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    async fn require_project(&self, id: ProjectId) -> FinanceResult<Project> {
        self.stores
            .projects
            .get_project(id)
            .await?
            .ok_or_else(|| FinanceError::not_found("Project", id))
    }

    async fn require_workpackage(&self, id: WorkpackageId) -> FinanceResult<Workpackage> {
        self.stores
            .projects
            .get_workpackage(id)
            .await?
            .ok_or_else(|| FinanceError::not_found("Workpackage", id))
    }

    /// Fetches the salaries and monthly configuration needed to price
    /// `allocations`.
    async fn context_for<'a, I>(&self, allocations: I) -> FinanceResult<ResolutionContext>
    where
        I: IntoIterator<Item = &'a ResourceAllocation>,
    {
        let mut users = BTreeSet::new();
        let mut years = BTreeSet::new();
        for allocation in allocations {
            users.insert(allocation.user_id);
            years.insert(allocation.period.year);
        }

        let mut context = ResolutionContext::default();
        for user_id in users {
            let salary = self.stores.users.get_salary(user_id).await?;
            context.salaries.insert(user_id, salary);
        }
        for year in years {
            for config in self.stores.monthly_configs.list_by_year(year).await? {
                context.configs.insert(config.period, config);
            }
        }
        Ok(context)
    }

    async fn panel_for(
        &self,
        workpackage: &Workpackage,
        program: Option<&FundingProgram>,
    ) -> FinanceResult<WorkpackagePanel> {
        let allocations = self
            .stores
            .allocations
            .list_by_workpackage(workpackage.id, Some(Track::Real))
            .await?;
        let materials = self.stores.materials.list_by_workpackage(workpackage.id).await?;
        let snapshot = self.stores.snapshots.current(workpackage.id).await?;
        let context = self.context_for(&allocations).await?;

        Ok(self.aggregator().workpackage_panel(&WorkpackageInput {
            workpackage,
            funding_program: program,
            snapshot: snapshot.as_ref(),
            allocations: &allocations,
            materials: &materials,
            context: &context,
        }))
    }

    async fn project_panel_for(
        &self,
        project: &Project,
        workpackages: &[Workpackage],
    ) -> FinanceResult<ProjectPanel> {
        let program = self.stores.funding_programs.get_for_project(project.id).await?;
        let mut panels = Vec::with_capacity(workpackages.len());
        for workpackage in workpackages {
            panels.push(self.panel_for(workpackage, program.as_ref()).await?);
        }
        Ok(CostAggregator::project_panel(
            project.id,
            CostingModel::for_program(program.as_ref()),
            panels,
        ))
    }

    async fn write_snapshot(
        &self,
        workpackage: &Workpackage,
        mode: SnapshotMode,
    ) -> FinanceResult<SnapshotWrite> {
        let lock = self
            .snapshot_locks
            .entry(workpackage.id)
            .or_default()
            .clone();
        let guard = lock.lock().await;
        let result = self.write_snapshot_locked(workpackage, mode).await;
        drop(guard);
        drop(lock);

        // Entries only live while a write is queued on them.
        self.snapshot_locks
            .remove_if(&workpackage.id, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    #[cfg(test)]
    pub(crate) fn snapshot_lock_count(&self) -> usize {
        self.snapshot_locks.len()
    }

    async fn write_snapshot_locked(
        &self,
        workpackage: &Workpackage,
        mode: SnapshotMode,
    ) -> FinanceResult<SnapshotWrite> {
        let current = self.stores.snapshots.current(workpackage.id).await?;
        if let Some(existing) = &current {
            match mode {
                SnapshotMode::Take => {
                    return Err(SnapshotError::AlreadyTaken {
                        workpackage_id: workpackage.id,
                        version: existing.version,
                    }
                    .into());
                }
                SnapshotMode::IfMissing => return Ok(SnapshotWrite::Kept(existing.clone())),
                SnapshotMode::Retake => {}
            }
        }

        let program = self
            .stores
            .funding_programs
            .get_for_project(workpackage.project_id)
            .await?;
        let planned_allocations = self
            .stores
            .allocations
            .list_by_workpackage(workpackage.id, Some(Track::Submetido))
            .await?;
        let materials = self.stores.materials.list_by_workpackage(workpackage.id).await?;
        let context = self.context_for(&planned_allocations).await?;

        let planned = SnapshotCalculator::new(self.resolver).compute(&SnapshotInput {
            workpackage,
            funding_program: program.as_ref(),
            planned_allocations: &planned_allocations,
            materials: &materials,
            context: &context,
        })?;

        let version = current.as_ref().map_or(1, |s| s.version + 1);
        let snapshot = BudgetSnapshot::stamp(workpackage.id, version, planned);
        self.stores.snapshots.replace(snapshot.clone()).await?;

        info!(
            workpackage_id = %workpackage.id,
            version,
            costing_model = %snapshot.costing_model(),
            planned_total = %snapshot.baseline.total(),
            superseded = current.is_some(),
            "Budget snapshot written"
        );

        Ok(SnapshotWrite::Written(snapshot))
    }
}

impl std::fmt::Debug for FinanceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
