//! Reconciliation output and user-approved fixes

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::reconciliation::stats::aggregate_stats;
use crate::types::*;

/// Classified items plus the statistics derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub items: Vec<ReconciliationItem>,
    pub stats: Stats,
}

impl ReconciliationReport {
    /// Build a report, deriving stats from the items
    pub fn new(items: Vec<ReconciliationItem>) -> Self {
        let stats = aggregate_stats(&items);
        Self { items, stats }
    }

    pub fn into_parts(self) -> (Vec<ReconciliationItem>, Stats) {
        (self.items, self.stats)
    }

    /// Get an item by id
    pub fn item(&self, item_id: &str) -> Option<&ReconciliationItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Items that are not fully matched
    pub fn issues(&self) -> impl Iterator<Item = &ReconciliationItem> {
        self.items
            .iter()
            .filter(|item| item.status != MatchStatus::Matched)
    }

    /// Items with the given status
    pub fn with_status(&self, status: MatchStatus) -> impl Iterator<Item = &ReconciliationItem> {
        self.items.iter().filter(move |item| item.status == status)
    }

    /// Return a new report in which the item's suggested fix has been applied
    /// and stats have been recomputed. `self` is left untouched.
    pub fn apply_fix(&self, item_id: &str) -> ReconciliationResult<ReconciliationReport> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| ReconciliationError::ItemNotFound(item_id.to_string()))?;

        let fixed = self.items[position].with_fix_applied()?;
        let mut items = self.items.clone();
        items[position] = fixed;

        let report = Self::new(items);
        info!(item = item_id, matched = report.stats.matched, "Applied suggested fix");
        Ok(report)
    }
}

impl ReconciliationItem {
    /// Copy of this item marked as resolved by its suggested fix.
    ///
    /// Items that are already matched or need manual review cannot be fixed.
    pub fn with_fix_applied(&self) -> ReconciliationResult<ReconciliationItem> {
        if !self.is_fixable() {
            return Err(ReconciliationError::NotFixable(self.id.clone()));
        }

        Ok(ReconciliationItem {
            status: MatchStatus::Matched,
            reason: Some(RootCause::ManualFixApplied),
            fix_action: None,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::engine::reconcile;
    use bigdecimal::BigDecimal;

    fn sample() -> ReconciliationReport {
        let bank = vec![
            BankRecord::new("INV-001", BigDecimal::from(1070)).with_vat(BigDecimal::from(70)),
            BankRecord::new("INV-002", BigDecimal::from(50)),
            BankRecord::new("INV-003", BigDecimal::from(1200)),
        ];
        let book = vec![
            BookRecord::new("GL-1", "INV-001", BigDecimal::from(1000)),
            BookRecord::new("GL-2", "INV-002", BigDecimal::from(50)),
            BookRecord::new("GL-3", "INV-003", BigDecimal::from(9800)),
        ];
        reconcile(&bank, &book)
    }

    #[test]
    fn test_apply_fix_recomputes_stats() {
        let report = sample();
        assert_eq!(report.stats.matched, 1);
        assert_eq!(report.stats.mismatched, 2);

        let fixed = report.apply_fix("mismatch-GL-1").unwrap();
        let item = fixed.item("mismatch-GL-1").unwrap();
        assert_eq!(item.status, MatchStatus::Matched);
        assert_eq!(item.reason, Some(RootCause::ManualFixApplied));
        assert_eq!(item.fix_action, None);
        assert_eq!(item.confidence, 99);

        assert_eq!(fixed.stats.matched, 2);
        assert_eq!(fixed.stats.mismatched, 1);
        assert_eq!(fixed.stats, aggregate_stats(&fixed.items));

        // the original report is unchanged
        assert_eq!(report.stats.matched, 1);
        assert_eq!(
            report.item("mismatch-GL-1").unwrap().status,
            MatchStatus::AmountMismatch
        );
    }

    #[test]
    fn test_apply_fix_rejects_manual_review_items() {
        let report = sample();
        let err = report.apply_fix("mismatch-GL-3").unwrap_err();
        assert!(matches!(err, ReconciliationError::NotFixable(id) if id == "mismatch-GL-3"));

        let err = report.apply_fix("match-GL-2").unwrap_err();
        assert!(matches!(err, ReconciliationError::NotFixable(_)));
    }

    #[test]
    fn test_apply_fix_unknown_item() {
        let err = sample().apply_fix("match-GL-99").unwrap_err();
        assert!(matches!(err, ReconciliationError::ItemNotFound(_)));
    }

    #[test]
    fn test_filters() {
        let report = sample();
        let issues: Vec<&str> = report.issues().map(|i| i.id.as_str()).collect();
        assert_eq!(issues, vec!["mismatch-GL-1", "mismatch-GL-3"]);
        assert_eq!(report.with_status(MatchStatus::Matched).count(), 1);
        assert_eq!(report.with_status(MatchStatus::MissingInBook).count(), 0);
    }

    #[test]
    fn test_into_parts() {
        let (items, stats) = sample().into_parts();
        assert_eq!(items.len(), 3);
        assert_eq!(stats.total, 3);
    }
}
