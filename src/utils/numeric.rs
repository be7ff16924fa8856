//! Amount normalization for locale-formatted feed values

use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;

/// Errors raised while turning amount text into decimals
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },
    #[error("Row {row}, column '{column}': {source}")]
    Column {
        row: usize,
        column: String,
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach the data row (1-based) and column name the value came from
    pub fn in_column(self, row: usize, column: &str) -> Self {
        ParseError::Column {
            row,
            column: column.to_string(),
            source: Box::new(self),
        }
    }
}

/// Parse an amount such as `"1,234.56"` into an exact decimal.
///
/// Surrounding whitespace and quote characters are ignored, as are grouping
/// commas. Empty input yields zero. Only plain `[+-]digits[.digits]` text is
/// accepted; exponent notation is rejected.
pub fn parse_amount(raw: &str) -> Result<BigDecimal, ParseError> {
    let trimmed = raw.trim().trim_matches('"').trim();
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();

    if cleaned.is_empty() {
        return Ok(BigDecimal::from(0));
    }

    if !is_plain_decimal(&cleaned) {
        return Err(ParseError::InvalidAmount {
            value: raw.to_string(),
            reason: "expected digits with an optional sign and decimal point".to_string(),
        });
    }

    BigDecimal::from_str(&cleaned).map_err(|e| ParseError::InvalidAmount {
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(|c| c == '+' || c == '-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) if !fraction.is_empty() => (whole, fraction),
        Some(_) => return false,
        None => (unsigned, ""),
    };
    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit())
}

/// Parse an optional amount, treating an absent value as zero
pub fn parse_optional_amount(raw: Option<&str>) -> Result<BigDecimal, ParseError> {
    raw.map_or_else(|| Ok(BigDecimal::from(0)), parse_amount)
}

/// Render an amount with thousands grouping and two fraction digits, e.g. `1,070.00`
pub fn format_amount(amount: &BigDecimal) -> String {
    let (digits, negative) = cents_digits(amount);
    let digits = format!("{:0>3}", digits);
    let (whole, fraction) = digits.split_at(digits.len() - 2);

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Decimal digits of the amount rounded half away from zero to two fraction
/// digits with the separator removed (`45.10` -> `"4510"`), plus whether it is negative
pub(crate) fn cents_digits(amount: &BigDecimal) -> (String, bool) {
    let (unscaled, _) = amount
        .with_scale_round(2, RoundingMode::HalfUp)
        .as_bigint_and_exponent();
    let text = unscaled.to_string();
    match text.strip_prefix('-') {
        Some(rest) => (rest.to_string(), true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_grouped_amount() {
        assert_eq!(parse_amount("1,234.56").unwrap(), dec("1234.56"));
        assert_eq!(parse_amount("  \"12,000\" ").unwrap(), dec("12000"));
        assert_eq!(parse_amount("-1,070.5").unwrap(), dec("-1070.5"));
    }

    #[test]
    fn test_parse_empty_is_zero() {
        assert_eq!(parse_amount("").unwrap(), BigDecimal::from(0));
        assert_eq!(parse_amount("   ").unwrap(), BigDecimal::from(0));
        assert_eq!(parse_optional_amount(None).unwrap(), BigDecimal::from(0));
    }

    #[test]
    fn test_parse_keeps_precision() {
        let value = parse_amount("0.1").unwrap() + parse_amount("0.2").unwrap();
        assert_eq!(value, dec("0.3"));
    }

    #[test]
    fn test_parse_rejects_text() {
        let err = parse_amount("12a.00").unwrap_err();
        assert!(matches!(err, ParseError::InvalidAmount { ref value, .. } if value == "12a.00"));

        let located = err.in_column(3, "total_amount");
        assert!(located.to_string().starts_with("Row 3, column 'total_amount'"));
    }

    #[test]
    fn test_parse_rejects_exponent_notation() {
        for raw in ["1e5", "1e-3000000", "2.5E3", "1.", ".", "+", "1.2.3", "--4"] {
            assert!(
                matches!(parse_amount(raw), Err(ParseError::InvalidAmount { .. })),
                "{raw} should be rejected"
            );
        }
        assert_eq!(parse_amount("+12.50").unwrap(), dec("12.5"));
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(format_amount(&dec("0.125")), "0.13");
        assert_eq!(format_amount(&dec("-0.125")), "-0.13");
        assert_eq!(cents_digits(&dec("12.345")), ("1235".to_string(), false));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(&dec("1070")), "1,070.00");
        assert_eq!(format_amount(&dec("1234567.891")), "1,234,567.89");
        assert_eq!(format_amount(&dec("0.5")), "0.50");
        assert_eq!(format_amount(&dec("999")), "999.00");
        assert_eq!(format_amount(&dec("-4500")), "-4,500.00");
    }

    #[test]
    fn test_cents_digits() {
        assert_eq!(cents_digits(&dec("45.1")), ("4510".to_string(), false));
        assert_eq!(cents_digits(&dec("-0.07")), ("7".to_string(), true));
    }
}
