//! Allocation data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tessera_shared::types::{MonthYear, UserId, WorkpackageId};

/// Which occupancy series an allocation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    /// Actual recorded occupancy.
    Real,
    /// Officially declared (planned) occupancy.
    Submetido,
}

impl Track {
    /// Returns the string representation of the track.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Submetido => "submetido",
        }
    }

    /// Parses a track from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "real" => Some(Self::Real),
            "submetido" => Some(Self::Submetido),
            _ => None,
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unique key of an allocation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllocationKey {
    /// Allocated user.
    pub user_id: UserId,
    /// Target workpackage.
    pub workpackage_id: WorkpackageId,
    /// Month of the allocation.
    pub period: MonthYear,
    /// Occupancy series.
    pub track: Track,
}

/// A validated occupancy allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    /// Allocated user.
    pub user_id: UserId,
    /// Target workpackage.
    pub workpackage_id: WorkpackageId,
    /// Month of the allocation.
    #[serde(flatten)]
    pub period: MonthYear,
    /// Fraction of the user's month; values above 1 are over-allocation.
    pub occupancy: Decimal,
    /// Occupancy series.
    pub track: Track,
}

impl ResourceAllocation {
    /// Returns the unique key of this allocation.
    #[must_use]
    pub const fn key(&self) -> AllocationKey {
        AllocationKey {
            user_id: self.user_id,
            workpackage_id: self.workpackage_id,
            period: self.period,
            track: self.track,
        }
    }
}

/// Unvalidated allocation upsert request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationInput {
    /// Allocated user.
    pub user_id: UserId,
    /// Target workpackage.
    pub workpackage_id: WorkpackageId,
    /// Month number (1-12).
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Occupancy series.
    pub track: Track,
    /// Occupancy fraction.
    pub occupancy: Decimal,
}
