//! Utility modules

pub mod numeric;
pub mod validation;

pub use numeric::*;
pub use validation::*;
