//! Occupancy sums per user and month.
//!
//! A user's fractions across all workpackages for one month and track should add
//! up to at most 1.0. Anything above is flagged, never clipped.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tessera_shared::types::{MonthYear, UserId, WorkpackageId};
use tracing::warn;

use super::types::{ResourceAllocation, Track};

/// Total occupancy of one user in one month on one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySummary {
    /// User ID.
    pub user_id: UserId,
    /// Month.
    #[serde(flatten)]
    pub period: MonthYear,
    /// Occupancy series.
    pub track: Track,
    /// Sum of fractions across workpackages.
    pub total_occupancy: Decimal,
    /// Workpackages contributing to the sum.
    pub workpackages: Vec<WorkpackageId>,
    /// True when `total_occupancy` exceeds 1.0.
    pub over_allocated: bool,
}

/// Builds occupancy summaries from raw allocations.
pub struct OccupancyLedger;

impl OccupancyLedger {
    /// Sums allocations per `(user, month, track)`.
    ///
    /// Results are ordered by user, then month, then track.
    #[must_use]
    pub fn summarize(allocations: &[ResourceAllocation]) -> Vec<OccupancySummary> {
        let mut groups: BTreeMap<(UserId, MonthYear, u8), (Track, Decimal, Vec<WorkpackageId>)> =
            BTreeMap::new();

        for allocation in allocations {
            let track_order = match allocation.track {
                Track::Real => 0,
                Track::Submetido => 1,
            };
            let entry = groups
                .entry((allocation.user_id, allocation.period, track_order))
                .or_insert_with(|| (allocation.track, Decimal::ZERO, Vec::new()));
            entry.1 = entry.1.saturating_add(allocation.occupancy);
            if !entry.2.contains(&allocation.workpackage_id) {
                entry.2.push(allocation.workpackage_id);
            }
        }

        groups
            .into_iter()
            .map(|((user_id, period, _), (track, total, workpackages))| {
                let over_allocated = total > Decimal::ONE;
                if over_allocated {
                    warn!(
                        user_id = %user_id,
                        period = %period,
                        track = %track,
                        total_occupancy = %total,
                        "User is over-allocated"
                    );
                }
                OccupancySummary {
                    user_id,
                    period,
                    track,
                    total_occupancy: total,
                    workpackages,
                    over_allocated,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn allocation(
        user_id: UserId,
        workpackage_id: WorkpackageId,
        month: u32,
        occupancy: Decimal,
        track: Track,
    ) -> ResourceAllocation {
        ResourceAllocation {
            user_id,
            workpackage_id,
            period: MonthYear::new(month, 2024).unwrap(),
            occupancy,
            track,
        }
    }

    #[test]
    fn test_sums_across_workpackages() {
        let user = UserId::new();
        let wp_a = WorkpackageId::new();
        let wp_b = WorkpackageId::new();
        let allocations = vec![
            allocation(user, wp_a, 3, dec!(0.6), Track::Real),
            allocation(user, wp_b, 3, dec!(0.6), Track::Real),
        ];

        let summaries = OccupancyLedger::summarize(&allocations);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_occupancy, dec!(1.2));
        assert!(summaries[0].over_allocated);
        assert_eq!(summaries[0].workpackages, vec![wp_a, wp_b]);
    }

    #[test]
    fn test_exactly_full_is_not_over_allocated() {
        let user = UserId::new();
        let allocations = vec![
            allocation(user, WorkpackageId::new(), 3, dec!(0.5), Track::Real),
            allocation(user, WorkpackageId::new(), 3, dec!(0.5), Track::Real),
        ];

        let summaries = OccupancyLedger::summarize(&allocations);

        assert_eq!(summaries[0].total_occupancy, dec!(1.0));
        assert!(!summaries[0].over_allocated);
    }

    #[test]
    fn test_tracks_and_months_are_separate() {
        let user = UserId::new();
        let wp = WorkpackageId::new();
        let allocations = vec![
            allocation(user, wp, 3, dec!(0.8), Track::Real),
            allocation(user, wp, 3, dec!(0.8), Track::Submetido),
            allocation(user, wp, 4, dec!(0.8), Track::Real),
        ];

        let summaries = OccupancyLedger::summarize(&allocations);

        assert_eq!(summaries.len(), 3);
        assert!(summaries.iter().all(|s| !s.over_allocated));
    }

    #[test]
    fn test_oversized_sum_saturates() {
        let user = UserId::new();
        let allocations = vec![
            allocation(user, WorkpackageId::new(), 3, Decimal::MAX, Track::Real),
            allocation(user, WorkpackageId::new(), 3, Decimal::MAX, Track::Real),
        ];

        let summaries = OccupancyLedger::summarize(&allocations);

        assert_eq!(summaries[0].total_occupancy, Decimal::MAX);
        assert!(summaries[0].over_allocated);
    }
}
