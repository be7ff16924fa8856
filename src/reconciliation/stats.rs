//! Aggregate statistics over reconciliation items

use crate::types::*;

/// Recompute [`Stats`] from an item list.
///
/// Stats carry no state of their own; after any change to the items, run this
/// again instead of adjusting counters.
pub fn aggregate_stats(items: &[ReconciliationItem]) -> Stats {
    let mut stats = Stats {
        total: items.len(),
        ..Stats::default()
    };

    for item in items {
        match item.status {
            MatchStatus::Matched => stats.matched += 1,
            MatchStatus::AmountMismatch | MatchStatus::PotentialIdError => stats.mismatched += 1,
            MatchStatus::MissingInBank => stats.missing_in_bank += 1,
            MatchStatus::MissingInBook => stats.missing_in_book += 1,
        }
    }

    if stats.total > 0 {
        stats.accuracy = stats.matched as f64 / stats.total as f64;
    }
    stats
}

impl Stats {
    pub fn from_items(items: &[ReconciliationItem]) -> Self {
        aggregate_stats(items)
    }
}
