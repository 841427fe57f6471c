use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::model::{
    constants::{LATEST_VERSION, OLDER_CAPACITY, RECENT_CAPACITY},
    structures::records::{EnrichedRecord, SelectionResult}
};

/// Version cutoff and list sizes used to build the two top lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionLimits {
    pub version_threshold: u32,
    pub recent_capacity: usize,
    pub older_capacity: usize
}

impl Default for SelectionLimits {
    fn default() -> Self {
        SelectionLimits {
            version_threshold: LATEST_VERSION,
            recent_capacity: RECENT_CAPACITY,
            older_capacity: OLDER_CAPACITY
        }
    }
}

impl SelectionLimits {
    pub fn select(&self, records: Vec<EnrichedRecord>) -> SelectionResult {
        select(records, self.version_threshold, self.recent_capacity, self.older_capacity)
    }
}

/// # Top list selection
///
/// 1. Records with `version >= version_threshold` go to the recent list, the
///    rest to the older list.
/// 2. Each list is sorted by rating, then achievement, both descending. The
///    sort is stable, so full ties keep their input order.
/// 3. Each list is cut to its capacity. Short lists are returned as they are.
pub fn select(
    records: Vec<EnrichedRecord>,
    version_threshold: u32,
    recent_capacity: usize,
    older_capacity: usize
) -> SelectionResult {
    let (recent, older): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| r.version() >= version_threshold);

    SelectionResult {
        recent_list: top(recent, recent_capacity),
        older_list: top(older, older_capacity)
    }
}

/// Ranking order: higher rating first, then higher achievement.
pub fn compare_records(a: &EnrichedRecord, b: &EnrichedRecord) -> Ordering {
    b.rating()
        .cmp(&a.rating())
        .then_with(|| b.achievement().total_cmp(&a.achievement()))
}

fn top(bucket: Vec<EnrichedRecord>, capacity: usize) -> Vec<EnrichedRecord> {
    bucket.into_iter().sorted_by(compare_records).take(capacity).collect()
}
