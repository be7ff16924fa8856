//! Header-keyed decoding of comma-separated text.
//!
//! Values stay as strings; amount columns are normalized later by the
//! record constructors.

use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;

/// One decoded data line keyed by header name
pub type Row = HashMap<String, String>;

/// Errors raised while decoding tabular text
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Decode comma-separated text with a header line into rows.
///
/// A quote character toggles literal mode wherever it appears in a field, so
/// `x"y,z"w` is the single value `xy,zw`. Blank lines are skipped. Fields
/// beyond the last header are dropped and missing trailing fields are left
/// out of the row.
pub fn decode_table(text: &str) -> Result<Vec<Row>, DecodeError> {
    let normalized = requote_fields(text)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(normalized.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() <= 1 && record.iter().all(str::is_empty) {
            continue;
        }

        let row: Row = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Rewrite every field that contains a quote as one fully quoted field with
/// the quote characters removed, so the reader sees standard quoting.
///
/// Fails on a quote that is never closed, reporting the line it opened on.
fn requote_fields(text: &str) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(text.len() + 16);
    let mut field = String::new();
    let mut has_quote = false;
    let mut in_literal = false;
    let mut line = 1;
    let mut open_line = 0;

    for ch in text.chars() {
        match ch {
            '"' => {
                has_quote = true;
                in_literal = !in_literal;
                if in_literal {
                    open_line = line;
                }
            }
            ',' | '\n' if !in_literal => {
                flush_field(&mut out, &mut field, has_quote);
                has_quote = false;
                out.push(ch);
            }
            _ => field.push(ch),
        }
        if ch == '\n' {
            line += 1;
        }
    }

    if in_literal {
        return Err(DecodeError::UnterminatedQuote { line: open_line });
    }
    flush_field(&mut out, &mut field, has_quote);
    Ok(out)
}

fn flush_field(out: &mut String, field: &mut String, quoted: bool) {
    if quoted {
        out.push('"');
        out.push_str(field.trim());
        out.push('"');
    } else {
        out.push_str(field);
    }
    field.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_simple_table() {
        let rows = decode_table("a,b,c\n1,2,3\n4,5,6\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[1]["c"], "6");
    }

    #[test]
    fn test_quoted_delimiter() {
        let rows = decode_table("id,amount\nINV-1,\"1,234.56\"\n").unwrap();
        assert_eq!(rows[0]["amount"], "1,234.56");
    }

    #[test]
    fn test_trims_whitespace_and_skips_blank_lines() {
        let text = " id , amount \r\n\r\n INV-1 ,  100 \r\n   \r\nINV-2,200\r\n";
        let rows = decode_table(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], "INV-1");
        assert_eq!(rows[0]["amount"], "100");
        assert_eq!(rows[1]["id"], "INV-2");
    }

    #[test]
    fn test_extra_and_missing_fields() {
        let rows = decode_table("a,b\n1,2,3,4\n5\n").unwrap();
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0]["b"], "2");
        assert_eq!(rows[1].len(), 1);
        assert!(!rows[1].contains_key("b"));
    }

    #[test]
    fn test_quote_toggles_mid_field() {
        let rows = decode_table("a,b\nx\"y,z\"w\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0]["a"], "xy,zw");
    }

    #[test]
    fn test_quoted_field_after_whitespace() {
        let rows = decode_table("id, amount\nINV-1, \"1,070.00\" \n").unwrap();
        assert_eq!(rows[0]["amount"], "1,070.00");
    }

    #[test]
    fn test_quoted_line_break() {
        let rows = decode_table("id,note\nINV-1,\"two\nlines\"\nINV-2,x\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["note"], "two\nlines");
        assert_eq!(rows[1]["id"], "INV-2");
    }

    #[test]
    fn test_unterminated_quote() {
        let err = decode_table("a,b\n1,2\n3,\"4\n").unwrap_err();
        assert!(matches!(err, DecodeError::UnterminatedQuote { line: 3 }));
    }

    #[test]
    fn test_empty_input() {
        assert!(decode_table("").unwrap().is_empty());
        assert!(decode_table("a,b\n").unwrap().is_empty());
    }
}
