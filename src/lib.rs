//! # Settlement Reconciliation
//!
//! Reconciles a bank settlement feed against general-ledger (book) entries,
//! explains each variance and proposes a fix.
//!
//! ## Features
//!
//! - **Feed decoding**: comma-separated exports with quoted fields and grouped amounts
//! - **Exact decimals**: amounts are `BigDecimal`, never binary floating point
//! - **Matching**: reference-id pairing with amount-based recovery of mistyped ids
//! - **Root causes**: missing 7% VAT, withholding tax, digit transposition, large errors
//! - **Statistics**: counts and accuracy derived from the item list
//! - **Fix application**: approved fixes produce a new report with recomputed stats
//!
//! ## Quick Start
//!
//! ```rust
//! use settlement_recon::{reconcile, BankRecord, BookRecord, MatchStatus, RootCause};
//! use bigdecimal::BigDecimal;
//!
//! let bank = vec![BankRecord::new("INV-001", BigDecimal::from(1070)).with_vat(BigDecimal::from(70))];
//! let book = vec![BookRecord::new("GL-1", "INV-001", BigDecimal::from(1000))];
//!
//! let report = reconcile(&bank, &book);
//! assert_eq!(report.items[0].status, MatchStatus::AmountMismatch);
//! assert_eq!(report.items[0].reason, Some(RootCause::MissingVat));
//! ```

pub mod decode;
pub mod reconciliation;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use decode::*;
pub use reconciliation::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
pub use utils::{format_amount, parse_amount, ParseError};
