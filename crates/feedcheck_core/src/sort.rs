use std::fmt;

use feedcheck_logging::{check_debug, check_info, check_warn};

use crate::time::{normalize, Instant, MalformedLabel};
use crate::Item;

/// Default slack for adjacent items, covering minute-level label granularity.
pub const DEFAULT_TOLERANCE_MS: u64 = 1_000;

/// First adjacent pair found out of order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingViolation {
    /// Position of `previous` in the sequence; `current` sits at `index + 1`.
    pub index: usize,
    pub previous: Item,
    pub current: Item,
    /// `normalized(previous) - normalized(current)` in milliseconds.
    pub delta_ms: i64,
    pub tolerance_ms: u64,
}

impl fmt::Display for OrderingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "item {} {:?} ({}, id {}) is {}ms older than item {} {:?} ({}, id {}), tolerance {}ms",
            self.index,
            self.previous.title,
            self.previous.age,
            self.previous.id,
            -self.delta_ms,
            self.index + 1,
            self.current.title,
            self.current.age,
            self.current.id,
            self.tolerance_ms
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortVerdict {
    Sorted { pairs_checked: usize },
    Unsorted(OrderingViolation),
}

impl SortVerdict {
    pub fn is_sorted(&self) -> bool {
        matches!(self, SortVerdict::Sorted { .. })
    }

    pub fn violation(&self) -> Option<&OrderingViolation> {
        match self {
            SortVerdict::Sorted { .. } => None,
            SortVerdict::Unsorted(violation) => Some(violation),
        }
    }
}

/// Checks that `items` run newest to oldest.
///
/// Every adjacent pair is resolved against the same `reference` and the scan
/// stops at the first pair where the previous item is more than
/// `tolerance_ms` newer than the current one. The input is never reordered.
pub fn validate(
    items: &[Item],
    reference: Instant,
    tolerance_ms: u64,
) -> Result<SortVerdict, MalformedLabel> {
    check_info!(
        "Validating order of {} items with tolerance {}ms",
        items.len(),
        tolerance_ms
    );
    let tolerance = i64::try_from(tolerance_ms).unwrap_or(i64::MAX);

    let Some(first) = items.first() else {
        return Ok(SortVerdict::Sorted { pairs_checked: 0 });
    };
    let mut previous_at = normalize(&first.age, reference)?;

    for (index, pair) in items.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        let current_at = normalize(&current.age, reference)?;
        let delta_ms = previous_at.signed_duration_since(current_at).num_milliseconds();

        check_debug!(
            "Pair {}/{}: {:?} ({}) vs {:?} ({}), delta {}ms",
            index,
            index + 1,
            previous.id,
            previous.age,
            current.id,
            current.age,
            delta_ms
        );

        if delta_ms < -tolerance {
            let violation = OrderingViolation {
                index,
                previous: previous.clone(),
                current: current.clone(),
                delta_ms,
                tolerance_ms,
            };
            check_warn!("Sorting error detected: {}", violation);
            return Ok(SortVerdict::Unsorted(violation));
        }
        previous_at = current_at;
    }

    let pairs_checked = items.len() - 1;
    check_info!("All {} items are correctly sorted", items.len());
    Ok(SortVerdict::Sorted { pairs_checked })
}
