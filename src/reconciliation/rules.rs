//! Ordered root-cause rules for amount mismatches

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::reconciliation::config::ReconciliationConfig;
use crate::tax::VatRate;
use crate::traits::*;
use crate::types::*;
use crate::utils::numeric::{cents_digits, format_amount};

/// Outcome assigned to an item once its root cause is known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub cause: RootCause,
    pub confidence: u8,
    pub fix_action: Option<FixAction>,
    pub suggested_fix: String,
}

impl Classification {
    /// Fixed outcome for a variance cause against the bank record it was matched to
    pub fn for_cause(cause: RootCause, bank: &BankRecord) -> Self {
        let target = format_amount(&bank.total_amount);
        let (confidence, fix_action, suggested_fix) = match cause {
            RootCause::MissingVat => (
                99,
                Some(FixAction::UpdateAmount),
                format!("Add VAT to match Bank: {target}"),
            ),
            RootCause::WhtDeductionMismatch => (
                95,
                Some(FixAction::UpdateAmount),
                format!("Adjust for WHT. Target: {target}"),
            ),
            RootCause::DigitTransposition => (
                95,
                Some(FixAction::UpdateAmount),
                format!("Correct typo to {target}"),
            ),
            RootCause::SignificantDataError => {
                (50, None, "Review original invoice document.".to_string())
            }
            _ => (
                70,
                Some(FixAction::UpdateAmount),
                format!("Update amount to {target}"),
            ),
        };

        Self {
            cause,
            confidence,
            fix_action,
            suggested_fix,
        }
    }
}

/// Ledger amount lacks the VAT the bank settled
pub struct VatOmissionRule {
    pub rate: VatRate,
    pub tolerance: BigDecimal,
}

impl VarianceRule for VatOmissionRule {
    fn cause(&self) -> RootCause {
        RootCause::MissingVat
    }

    fn applies(&self, variance: &Variance<'_>) -> bool {
        let grossed_up = self.rate.gross_from_net(&variance.book.amount);
        let gross_gap = (&grossed_up - &variance.bank.total_amount).abs();
        let vat_gap = (variance.magnitude() - &variance.bank.vat).abs();
        gross_gap < self.tolerance || vat_gap < self.tolerance
    }
}

/// Ledger amount equals the bank amount after withholding tax
pub struct WithholdingRule {
    pub tolerance: BigDecimal,
}

impl VarianceRule for WithholdingRule {
    fn cause(&self) -> RootCause {
        RootCause::WhtDeductionMismatch
    }

    fn applies(&self, variance: &Variance<'_>) -> bool {
        (&variance.bank.total_amount_after_wd - &variance.book.amount).abs() < self.tolerance
    }
}

/// Ledger amount is the bank amount with its digits rearranged
pub struct TranspositionRule {
    pub detector: Box<dyn TranspositionDetector>,
}

impl VarianceRule for TranspositionRule {
    fn cause(&self) -> RootCause {
        RootCause::DigitTransposition
    }

    fn applies(&self, variance: &Variance<'_>) -> bool {
        self.detector
            .is_transposition(&variance.book.amount, &variance.bank.total_amount)
    }
}

/// Difference too large to correct automatically
pub struct LargeDiscrepancyRule {
    pub threshold: BigDecimal,
}

impl VarianceRule for LargeDiscrepancyRule {
    fn cause(&self) -> RootCause {
        RootCause::SignificantDataError
    }

    fn applies(&self, variance: &Variance<'_>) -> bool {
        variance.magnitude() > self.threshold
    }
}

/// Compares the sorted nonzero digits of both amounts at two fraction digits.
///
/// Zero digits are ignored, so `100` and `1000` share a fingerprint and
/// transpositions that move a zero are not detected.
pub struct DigitMultisetDetector {
    /// Amounts closer than this are never reported
    pub min_difference: BigDecimal,
}

impl DigitMultisetDetector {
    pub fn new(min_difference: BigDecimal) -> Self {
        Self { min_difference }
    }

    fn fingerprint(amount: &BigDecimal) -> (bool, Vec<char>) {
        let (digits, negative) = cents_digits(amount);
        let mut nonzero: Vec<char> = digits.chars().filter(|c| *c != '0').collect();
        nonzero.sort_unstable();
        (negative, nonzero)
    }
}

impl Default for DigitMultisetDetector {
    fn default() -> Self {
        Self::new(BigDecimal::new(1.into(), 2))
    }
}

impl TranspositionDetector for DigitMultisetDetector {
    fn is_transposition(&self, book_amount: &BigDecimal, bank_amount: &BigDecimal) -> bool {
        Self::fingerprint(book_amount) == Self::fingerprint(bank_amount)
            && (book_amount - bank_amount).abs() > self.min_difference
    }
}

/// Priority-ordered list of variance rules with first-match-wins semantics
pub struct VarianceClassifier {
    rules: Vec<Box<dyn VarianceRule>>,
}

impl VarianceClassifier {
    /// Classifier over an explicit rule order
    pub fn with_rules(rules: Vec<Box<dyn VarianceRule>>) -> Self {
        Self { rules }
    }

    /// VAT, withholding, transposition, then large discrepancy
    pub fn standard(config: &ReconciliationConfig, detector: Box<dyn TranspositionDetector>) -> Self {
        Self::with_rules(vec![
            Box::new(VatOmissionRule {
                rate: config.vat_rate.clone(),
                tolerance: config.tax_tolerance.clone(),
            }),
            Box::new(WithholdingRule {
                tolerance: config.tax_tolerance.clone(),
            }),
            Box::new(TranspositionRule { detector }),
            Box::new(LargeDiscrepancyRule {
                threshold: config.large_discrepancy_threshold.clone(),
            }),
        ])
    }

    /// Root causes in evaluation order
    pub fn causes(&self) -> Vec<RootCause> {
        self.rules.iter().map(|rule| rule.cause()).collect()
    }

    /// Classify a variance; unexplained variances fall back to `VarianceDetected`
    pub fn classify(&self, variance: &Variance<'_>) -> Classification {
        let cause = self
            .rules
            .iter()
            .find(|rule| rule.applies(variance))
            .map_or(RootCause::VarianceDetected, |rule| rule.cause());
        Classification::for_cause(cause, variance.bank)
    }
}
