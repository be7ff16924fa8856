//! VAT (value-added tax) arithmetic for settlement amounts

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Flat VAT rate expressed as a percentage (e.g. 7 for 7%)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatRate {
    pub percent: BigDecimal,
}

impl VatRate {
    /// Create a VAT rate from a percentage
    pub fn new(percent: BigDecimal) -> Self {
        Self { percent }
    }

    /// Standard 7% rate applied to fuel settlements
    pub fn standard() -> Self {
        Self::new(BigDecimal::from(7))
    }

    /// Tax due on a net amount
    pub fn tax_on_net(&self, net: &BigDecimal) -> BigDecimal {
        (net * &self.percent) / BigDecimal::from(100)
    }

    /// Net amount grossed up with this rate
    pub fn gross_from_net(&self, net: &BigDecimal) -> BigDecimal {
        net + self.tax_on_net(net)
    }
}

impl Default for VatRate {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_standard_rate() {
        let rate = VatRate::default();
        assert_eq!(rate.percent, BigDecimal::from(7));
        assert_eq!(rate.tax_on_net(&BigDecimal::from(1000)), BigDecimal::from(70));
        assert_eq!(
            rate.gross_from_net(&BigDecimal::from(1000)),
            BigDecimal::from(1070)
        );
    }

    #[test]
    fn test_fractional_amounts() {
        let rate = VatRate::standard();
        let net = BigDecimal::from_str("99.99").unwrap();
        assert_eq!(
            rate.gross_from_net(&net),
            BigDecimal::from_str("106.9893").unwrap()
        );
    }

    #[test]
    fn test_custom_rate() {
        let rate = VatRate::new(BigDecimal::from(10));
        assert_eq!(rate.gross_from_net(&BigDecimal::from(50)), BigDecimal::from(55));
    }
}
