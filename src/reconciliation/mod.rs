//! Reconciliation of bank settlement feeds against general-ledger entries

pub mod config;
pub mod engine;
pub mod report;
pub mod rules;
pub mod stats;

pub use config::*;
pub use engine::*;
pub use report::*;
pub use rules::*;
pub use stats::*;
