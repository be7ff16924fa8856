//! Thresholds used by the reconciliation engine

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::tax::VatRate;

/// Fixed thresholds for matching and variance classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Largest difference still treated as equal amounts (0.01)
    pub match_tolerance: BigDecimal,
    /// Tolerance for the VAT and withholding comparisons (0.05)
    pub tax_tolerance: BigDecimal,
    /// VAT rate a ledger posting may have omitted (7%)
    pub vat_rate: VatRate,
    /// Differences above this need manual review (1000)
    pub large_discrepancy_threshold: BigDecimal,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            match_tolerance: BigDecimal::new(1.into(), 2),
            tax_tolerance: BigDecimal::new(5.into(), 2),
            vat_rate: VatRate::standard(),
            large_discrepancy_threshold: BigDecimal::from(1000),
        }
    }
}

impl ReconciliationConfig {
    /// Whether two amounts are equal within the match tolerance
    pub fn amounts_match(&self, a: &BigDecimal, b: &BigDecimal) -> bool {
        (a - b).abs() < self.match_tolerance
    }
}
