//! Tax helpers used when explaining settlement variances

pub mod vat;

pub use vat::*;
