//! Traits for pluggable variance classification

use bigdecimal::BigDecimal;

use crate::types::*;

/// A key-matched bank/book pair whose amounts disagree
#[derive(Debug, Clone)]
pub struct Variance<'a> {
    pub bank: &'a BankRecord,
    pub book: &'a BookRecord,
    /// `book.amount - bank.total_amount`
    pub diff: BigDecimal,
}

impl<'a> Variance<'a> {
    pub fn new(bank: &'a BankRecord, book: &'a BookRecord) -> Self {
        let diff = &book.amount - &bank.total_amount;
        Self { bank, book, diff }
    }

    /// Absolute size of the difference
    pub fn magnitude(&self) -> BigDecimal {
        self.diff.abs()
    }
}

/// One entry in the ordered variance classifier.
///
/// Rules are evaluated in order and the first one that applies decides the
/// root cause of the variance.
pub trait VarianceRule: Send + Sync {
    /// Root cause reported when this rule applies
    fn cause(&self) -> RootCause;

    /// Whether the variance is explained by this rule
    fn applies(&self, variance: &Variance<'_>) -> bool;
}

/// Trait for deciding whether two amounts are the same figure keyed in with
/// digits swapped
pub trait TranspositionDetector: Send + Sync {
    fn is_transposition(&self, book_amount: &BigDecimal, bank_amount: &BigDecimal) -> bool;
}
