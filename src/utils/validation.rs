//! Validation utilities for decoded feeds

use std::collections::{HashMap, HashSet};

use crate::types::*;

/// Reference ids that occur on more than one bank record, in first-seen order.
///
/// The engine indexes bank records by reference id, so only the last record
/// carrying a duplicated id can be matched by key.
pub fn find_duplicate_references(bank_records: &[BankRecord]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in bank_records {
        *counts.entry(record.invoice_number.as_str()).or_default() += 1;
    }

    let mut reported = HashSet::new();
    bank_records
        .iter()
        .map(|record| record.invoice_number.as_str())
        .filter(|id| counts[id] > 1 && reported.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Book records whose description is blank and therefore can never match by key
pub fn find_unkeyed_book_records(book_records: &[BookRecord]) -> Vec<&BookRecord> {
    book_records
        .iter()
        .filter(|record| record.description.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[test]
    fn test_find_duplicate_references() {
        let bank = vec![
            BankRecord::new("INV-1", BigDecimal::from(10)),
            BankRecord::new("INV-2", BigDecimal::from(20)),
            BankRecord::new("INV-1", BigDecimal::from(30)),
            BankRecord::new("INV-2", BigDecimal::from(40)),
            BankRecord::new("INV-1", BigDecimal::from(50)),
            BankRecord::new("INV-3", BigDecimal::from(60)),
        ];

        assert_eq!(find_duplicate_references(&bank), vec!["INV-1", "INV-2"]);
    }

    #[test]
    fn test_no_duplicates() {
        let bank = vec![
            BankRecord::new("INV-1", BigDecimal::from(10)),
            BankRecord::new("INV-2", BigDecimal::from(20)),
        ];
        assert!(find_duplicate_references(&bank).is_empty());
    }

    #[test]
    fn test_find_unkeyed_book_records() {
        let book = vec![
            BookRecord::new("DOC-1", "INV-1", BigDecimal::from(10)),
            BookRecord::new("DOC-2", "  ", BigDecimal::from(20)),
        ];
        let unkeyed = find_unkeyed_book_records(&book);
        assert_eq!(unkeyed.len(), 1);
        assert_eq!(unkeyed[0].document_no, "DOC-2");
    }
}
