//! Matching of bank settlements against ledger entries

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use crate::decode::{decode_bank_records, decode_book_records};
use crate::reconciliation::config::ReconciliationConfig;
use crate::reconciliation::report::ReconciliationReport;
use crate::reconciliation::rules::{DigitMultisetDetector, VarianceClassifier};
use crate::traits::*;
use crate::types::*;
use crate::utils::numeric::format_amount;
use crate::utils::validation::{find_duplicate_references, find_unkeyed_book_records};

/// Reconciliation engine pairing bank records with book records by reference id
pub struct ReconciliationEngine {
    config: ReconciliationConfig,
    classifier: VarianceClassifier,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationEngine {
    /// Create an engine with the standard thresholds
    pub fn new() -> Self {
        Self::with_config(ReconciliationConfig::default())
    }

    /// Create an engine with custom thresholds
    pub fn with_config(config: ReconciliationConfig) -> Self {
        let detector = Box::new(DigitMultisetDetector::new(config.match_tolerance.clone()));
        Self::with_detector(config, detector)
    }

    /// Create an engine with a custom digit-transposition check
    pub fn with_detector(
        config: ReconciliationConfig,
        detector: Box<dyn TranspositionDetector>,
    ) -> Self {
        let classifier = VarianceClassifier::standard(&config, detector);
        Self { config, classifier }
    }

    /// Create an engine with a fully custom rule order
    pub fn with_classifier(config: ReconciliationConfig, classifier: VarianceClassifier) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Reconcile decoded bank and book records.
    ///
    /// Book-driven items come first in book order, followed by one
    /// `MissingInBook` item per bank record no book record consumed, in bank
    /// order. A bank record is paired at most once: a key hit on an already
    /// consumed record falls through to orphan recovery.
    #[instrument(name = "reconcile", skip_all, fields(bank = bank.len(), book = book.len()))]
    pub fn reconcile(&self, bank: &[BankRecord], book: &[BookRecord]) -> ReconciliationReport {
        let duplicates = find_duplicate_references(bank);
        if !duplicates.is_empty() {
            warn!(
                ids = ?duplicates,
                "Duplicate bank reference ids; only the last record per id can match by key"
            );
        }

        let unkeyed = find_unkeyed_book_records(book);
        if !unkeyed.is_empty() {
            warn!(
                count = unkeyed.len(),
                "Book records without a reference; they can only match by amount"
            );
        }

        // Later records replace earlier ones sharing the same reference id
        let index: HashMap<&str, usize> = bank
            .iter()
            .enumerate()
            .map(|(position, record)| (record.invoice_number.as_str(), position))
            .collect();
        let mut consumed = vec![false; bank.len()];

        let mut items = Vec::with_capacity(book.len() + bank.len());
        for book_record in book {
            let keyed = index
                .get(book_record.description.as_str())
                .copied()
                .filter(|&position| !consumed[position]);
            let item = match keyed {
                Some(position) => {
                    consumed[position] = true;
                    self.compare(&bank[position], book_record)
                }
                None => self.recover_orphan(bank, &mut consumed, book_record),
            };
            items.push(item);
        }

        items.extend(
            bank.iter()
                .zip(&consumed)
                .filter(|(_, consumed)| !**consumed)
                .map(|(bank_record, _)| missing_in_book(bank_record)),
        );

        let report = ReconciliationReport::new(items);
        info!(
            total = report.stats.total,
            matched = report.stats.matched,
            mismatched = report.stats.mismatched,
            missing_in_bank = report.stats.missing_in_bank,
            missing_in_book = report.stats.missing_in_book,
            "Reconciliation complete"
        );
        report
    }

    /// Decode both exports and reconcile them.
    ///
    /// Any decode or amount error aborts the whole run.
    pub fn reconcile_text(
        &self,
        bank_text: &str,
        book_text: &str,
    ) -> ReconciliationResult<ReconciliationReport> {
        let bank = decode_bank_records(bank_text)?;
        let book = decode_book_records(book_text)?;
        Ok(self.reconcile(&bank, &book))
    }

    fn compare(&self, bank: &BankRecord, book: &BookRecord) -> ReconciliationItem {
        let records = RecordPair::Both {
            bank: bank.clone(),
            book: book.clone(),
        };

        if self.config.amounts_match(&book.amount, &bank.total_amount) {
            return ReconciliationItem {
                id: format!("match-{}", book.document_no),
                records,
                status: MatchStatus::Matched,
                confidence: 100,
                reason: Some(RootCause::ExactMatch),
                suggested_fix: None,
                fix_action: None,
            };
        }

        let classification = self.classifier.classify(&Variance::new(bank, book));
        debug!(
            document_no = %book.document_no,
            reference = %bank.invoice_number,
            cause = %classification.cause,
            "Classified amount mismatch"
        );

        ReconciliationItem {
            id: format!("mismatch-{}", book.document_no),
            records,
            status: MatchStatus::AmountMismatch,
            confidence: classification.confidence,
            reason: Some(classification.cause),
            suggested_fix: Some(classification.suggested_fix),
            fix_action: classification.fix_action,
        }
    }

    /// Look for an unconsumed bank record with the same amount, which points
    /// at a mistyped reference id on the ledger side
    fn recover_orphan(
        &self,
        bank: &[BankRecord],
        consumed: &mut [bool],
        book: &BookRecord,
    ) -> ReconciliationItem {
        let candidate = bank.iter().enumerate().find(|(position, record)| {
            !consumed[*position] && self.config.amounts_match(&record.total_amount, &book.amount)
        });

        match candidate {
            Some((position, bank_record)) => {
                consumed[position] = true;
                debug!(
                    document_no = %book.document_no,
                    reference = %bank_record.invoice_number,
                    "Recovered orphan by amount"
                );
                ReconciliationItem {
                    id: format!("typo-{}", book.document_no),
                    records: RecordPair::Both {
                        bank: bank_record.clone(),
                        book: book.clone(),
                    },
                    status: MatchStatus::PotentialIdError,
                    confidence: 85,
                    reason: Some(RootCause::IncorrectReferenceId),
                    suggested_fix: Some(format!(
                        "Update Ref ID to {}",
                        bank_record.invoice_number
                    )),
                    fix_action: Some(FixAction::UpdateId),
                }
            }
            None => ReconciliationItem {
                id: format!("missing-bank-{}", book.document_no),
                records: RecordPair::BookOnly(book.clone()),
                status: MatchStatus::MissingInBank,
                confidence: 0,
                reason: Some(RootCause::NotFoundInBank),
                suggested_fix: Some("Investigate: Check Bank Settlement Date".to_string()),
                fix_action: None,
            },
        }
    }
}

fn missing_in_book(bank: &BankRecord) -> ReconciliationItem {
    ReconciliationItem {
        id: format!("missing-book-{}", bank.invoice_number),
        records: RecordPair::BankOnly(bank.clone()),
        status: MatchStatus::MissingInBook,
        confidence: 100,
        reason: Some(RootCause::UnrecordedTransaction),
        suggested_fix: Some(format!(
            "Create GL Entry for {}",
            format_amount(&bank.total_amount)
        )),
        fix_action: Some(FixAction::CreateEntry),
    }
}

/// Reconcile with the standard engine
pub fn reconcile(bank: &[BankRecord], book: &[BookRecord]) -> ReconciliationReport {
    ReconciliationEngine::new().reconcile(bank, book)
}

/// Decode both exports and reconcile them with the standard engine
pub fn reconcile_csv(bank_text: &str, book_text: &str) -> ReconciliationResult<ReconciliationReport> {
    ReconciliationEngine::new().reconcile_text(bank_text, book_text)
}
