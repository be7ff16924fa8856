//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decode::DecodeError;
use crate::utils::ParseError;

/// Date layouts seen in settlement and ledger exports
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

fn parse_feed_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// One transaction from the bank settlement feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRecord {
    /// Settlement account the transaction was credited to
    pub account_no: String,
    /// Date the bank settled the batch, as exported
    pub settlement_date: String,
    /// Date the sale took place, as exported
    pub transaction_date: String,
    /// Time of the sale, as exported
    pub time: String,
    /// Reference id, the join key against [`BookRecord::description`]
    pub invoice_number: String,
    /// Product sold
    pub product: String,
    /// Quantity in liters, as exported
    pub liter: String,
    /// Unit price, as exported
    pub price: String,
    /// Amount before VAT
    pub amount_before_vat: BigDecimal,
    /// VAT charged on the settlement
    pub vat: BigDecimal,
    /// Gross settled amount
    pub total_amount: BigDecimal,
    /// 1% withholding tax deducted
    pub wht_1_percent: BigDecimal,
    /// Settled amount after the withholding deduction
    pub total_amount_after_wd: BigDecimal,
    /// Merchant the terminal belongs to
    pub merchant_id: String,
    /// Brand of the selling station
    pub fuel_brand: String,
    /// Total amount exactly as it appeared in the feed
    pub raw_total_amount: String,
}

impl BankRecord {
    /// Create a bank record with only a reference id and a total amount
    pub fn new(invoice_number: impl Into<String>, total_amount: BigDecimal) -> Self {
        Self {
            account_no: String::new(),
            settlement_date: String::new(),
            transaction_date: String::new(),
            time: String::new(),
            invoice_number: invoice_number.into(),
            product: String::new(),
            liter: String::new(),
            price: String::new(),
            amount_before_vat: BigDecimal::from(0),
            vat: BigDecimal::from(0),
            raw_total_amount: total_amount.to_string(),
            total_amount,
            wht_1_percent: BigDecimal::from(0),
            total_amount_after_wd: BigDecimal::from(0),
            merchant_id: String::new(),
            fuel_brand: String::new(),
        }
    }

    /// Set the VAT portion of the settlement
    pub fn with_vat(mut self, vat: BigDecimal) -> Self {
        self.vat = vat;
        self
    }

    /// Set the amount remaining after withholding tax
    pub fn with_amount_after_withholding(mut self, amount: BigDecimal) -> Self {
        self.total_amount_after_wd = amount;
        self
    }

    /// Settlement date, when it is in a recognised layout
    pub fn settlement_date(&self) -> Option<NaiveDate> {
        parse_feed_date(&self.settlement_date)
    }

    /// Transaction date, when it is in a recognised layout
    pub fn transaction_date(&self) -> Option<NaiveDate> {
        parse_feed_date(&self.transaction_date)
    }
}

/// One entry from the general ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Ledger document number, unique within the book feed
    pub document_no: String,
    /// Date the entry was posted, as exported
    pub posting_date: String,
    /// Matched against [`BankRecord::invoice_number`]
    pub description: String,
    /// Booked amount
    pub amount: BigDecimal,
    /// Amount exactly as it appeared in the feed
    pub raw_amount: String,
}

impl BookRecord {
    /// Create a book record without a posting date
    pub fn new(
        document_no: impl Into<String>,
        description: impl Into<String>,
        amount: BigDecimal,
    ) -> Self {
        Self {
            document_no: document_no.into(),
            posting_date: String::new(),
            description: description.into(),
            raw_amount: amount.to_string(),
            amount,
        }
    }

    /// Posting date, when it is in a recognised layout
    pub fn posting_date(&self) -> Option<NaiveDate> {
        parse_feed_date(&self.posting_date)
    }
}

/// Outcome of pairing a record with the other feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Matched,
    AmountMismatch,
    MissingInBank,
    MissingInBook,
    PotentialIdError,
}

/// Kind of correction a suggested fix performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixAction {
    /// Change the ledger amount to the bank amount
    UpdateAmount,
    /// Change the ledger reference to the bank reference id
    UpdateId,
    /// Post a new ledger entry for an unrecorded settlement
    CreateEntry,
}

/// Root cause attached to a reconciliation item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootCause {
    ExactMatch,
    MissingVat,
    WhtDeductionMismatch,
    DigitTransposition,
    SignificantDataError,
    VarianceDetected,
    IncorrectReferenceId,
    NotFoundInBank,
    UnrecordedTransaction,
    ManualFixApplied,
}

impl RootCause {
    /// Human-readable reason shown next to the item
    pub fn label(&self) -> &'static str {
        match self {
            RootCause::ExactMatch => "Exact Match",
            RootCause::MissingVat => "Missing 7% VAT",
            RootCause::WhtDeductionMismatch => "WHT Deduction Mismatch",
            RootCause::DigitTransposition => "Digit Transposition (Typo)",
            RootCause::SignificantDataError => "Significant Data Error",
            RootCause::VarianceDetected => "Variance Detected",
            RootCause::IncorrectReferenceId => "Incorrect Reference ID",
            RootCause::NotFoundInBank => "Not Found in Bank",
            RootCause::UnrecordedTransaction => "Unrecorded Transaction",
            RootCause::ManualFixApplied => "Manual Fix Applied",
        }
    }
}

impl std::fmt::Display for RootCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The records an item was built from; at least one side is always present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordPair {
    Both { bank: BankRecord, book: BookRecord },
    BankOnly(BankRecord),
    BookOnly(BookRecord),
}

impl RecordPair {
    pub fn bank(&self) -> Option<&BankRecord> {
        match self {
            RecordPair::Both { bank, .. } | RecordPair::BankOnly(bank) => Some(bank),
            RecordPair::BookOnly(_) => None,
        }
    }

    pub fn book(&self) -> Option<&BookRecord> {
        match self {
            RecordPair::Both { book, .. } | RecordPair::BookOnly(book) => Some(book),
            RecordPair::BankOnly(_) => None,
        }
    }
}

/// One row of reconciliation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationItem {
    /// Derived from the status and the driving record's id
    pub id: String,
    pub records: RecordPair,
    pub status: MatchStatus,
    /// Certainty of the classification, 0 to 100
    pub confidence: u8,
    pub reason: Option<RootCause>,
    pub suggested_fix: Option<String>,
    /// `None` means the item needs manual review
    pub fix_action: Option<FixAction>,
}

impl ReconciliationItem {
    pub fn bank_record(&self) -> Option<&BankRecord> {
        self.records.bank()
    }

    pub fn book_record(&self) -> Option<&BookRecord> {
        self.records.book()
    }

    /// Whether a suggested fix can be applied without manual review
    pub fn is_fixable(&self) -> bool {
        self.status != MatchStatus::Matched
            && self.fix_action.is_some()
            && self.suggested_fix.is_some()
    }
}

/// Aggregate counts over a list of reconciliation items
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub matched: usize,
    /// Amount mismatches plus potential id errors
    pub mismatched: usize,
    pub missing_in_bank: usize,
    pub missing_in_book: usize,
    /// `matched / total`, zero for an empty list
    pub accuracy: f64,
}

impl Stats {
    /// Accuracy scaled to 0..=100 for display
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy * 100.0
    }
}

/// Errors that can occur while reconciling feeds
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("Item has no applicable fix: {0}")]
    NotFixable(String),
}

/// Result type for reconciliation operations
pub type ReconciliationResult<T> = Result<T, ReconciliationError>;
