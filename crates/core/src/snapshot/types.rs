//! Snapshot data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tessera_shared::types::{SnapshotId, WorkpackageId};

use crate::project::CostingModel;

/// Frozen planned figures, shaped by costing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "costing_model", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotBaseline {
    /// ETI model: one planned scalar.
    EtiDb {
        /// `Σ occupancy × eti_value` over planned allocations.
        orcamento_previsto_com_eti: Decimal,
    },
    /// Detailed model: resources and materials kept apart.
    Detailed {
        /// Planned resource cost.
        previsto_recursos_snapshot: Decimal,
        /// Planned material cost.
        previsto_materiais_snapshot: Decimal,
    },
}

impl SnapshotBaseline {
    /// Returns the costing model this baseline was computed under.
    #[must_use]
    pub const fn costing_model(&self) -> CostingModel {
        match self {
            Self::EtiDb { .. } => CostingModel::EtiDb,
            Self::Detailed { .. } => CostingModel::Detailed,
        }
    }

    /// Returns the total planned amount.
    #[must_use]
    pub fn total(&self) -> Decimal {
        match self {
            Self::EtiDb {
                orcamento_previsto_com_eti,
            } => *orcamento_previsto_com_eti,
            Self::Detailed {
                previsto_recursos_snapshot,
                previsto_materiais_snapshot,
            } => previsto_recursos_snapshot.saturating_add(*previsto_materiais_snapshot),
        }
    }
}

/// Result of a baseline computation, before it is stamped and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedBaseline {
    /// Planned figures.
    pub baseline: SnapshotBaseline,
    /// Planned hours implied by the submitted occupancy.
    pub planned_hours: Decimal,
}

/// A stored, immutable baseline of one workpackage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    /// Snapshot ID.
    pub id: SnapshotId,
    /// Workpackage ID.
    pub workpackage_id: WorkpackageId,
    /// Monotonic version; the first snapshot is version 1.
    pub version: u32,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// Planned figures.
    pub baseline: SnapshotBaseline,
    /// Planned hours implied by the submitted occupancy.
    pub planned_hours: Decimal,
}

impl BudgetSnapshot {
    /// Stamps a computed baseline as a new snapshot version.
    #[must_use]
    pub fn stamp(workpackage_id: WorkpackageId, version: u32, planned: PlannedBaseline) -> Self {
        Self {
            id: SnapshotId::new(),
            workpackage_id,
            version,
            taken_at: Utc::now(),
            baseline: planned.baseline,
            planned_hours: planned.planned_hours,
        }
    }

    /// Returns the costing model this snapshot was computed under.
    #[must_use]
    pub const fn costing_model(&self) -> CostingModel {
        self.baseline.costing_model()
    }
}
