//! Decoding of delimited settlement and ledger exports

pub mod records;
pub mod table;

pub use records::*;
pub use table::*;
