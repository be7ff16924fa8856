//! Construction of typed bank and book records from decoded rows

use bigdecimal::BigDecimal;

use crate::decode::table::{decode_table, Row};
use crate::types::*;
use crate::utils::numeric::{parse_optional_amount, ParseError};

fn text(row: &Row, column: &str) -> String {
    row.get(column).cloned().unwrap_or_default()
}

fn amount(row: &Row, column: &str, row_number: usize) -> Result<BigDecimal, ParseError> {
    parse_optional_amount(row.get(column).map(String::as_str))
        .map_err(|e| e.in_column(row_number, column))
}

impl BankRecord {
    /// Build a bank record from a decoded settlement row, normalizing its amounts.
    ///
    /// `row_number` is the 1-based data row used in error messages.
    pub fn from_row(row: &Row, row_number: usize) -> Result<Self, ParseError> {
        Ok(Self {
            account_no: text(row, "account_no"),
            settlement_date: text(row, "settlement_date"),
            transaction_date: text(row, "transaction_date"),
            time: text(row, "time"),
            invoice_number: text(row, "invoice_number"),
            product: text(row, "product"),
            liter: text(row, "liter"),
            price: text(row, "price"),
            amount_before_vat: amount(row, "amount_before_vat", row_number)?,
            vat: amount(row, "vat", row_number)?,
            total_amount: amount(row, "total_amount", row_number)?,
            wht_1_percent: amount(row, "wht_1_percent", row_number)?,
            total_amount_after_wd: amount(row, "total_amount_after_wd", row_number)?,
            merchant_id: text(row, "merchant_id"),
            fuel_brand: text(row, "fuel_brand"),
            raw_total_amount: text(row, "total_amount"),
        })
    }
}

impl BookRecord {
    /// Build a book record from a decoded ledger row, normalizing its amount.
    pub fn from_row(row: &Row, row_number: usize) -> Result<Self, ParseError> {
        Ok(Self {
            document_no: text(row, "document_no"),
            posting_date: text(row, "posting_date"),
            description: text(row, "description"),
            amount: amount(row, "amount", row_number)?,
            raw_amount: text(row, "amount"),
        })
    }
}

/// Decode a bank settlement export into records
pub fn decode_bank_records(text: &str) -> ReconciliationResult<Vec<BankRecord>> {
    let records = decode_table(text)?
        .iter()
        .enumerate()
        .map(|(i, row)| BankRecord::from_row(row, i + 1))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Decode a general-ledger export into records
pub fn decode_book_records(text: &str) -> ReconciliationResult<Vec<BookRecord>> {
    let records = decode_table(text)?
        .iter()
        .enumerate()
        .map(|(i, row)| BookRecord::from_row(row, i + 1))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const BANK_CSV: &str = "\
account_no,settlement_date,transaction_date,time,invoice_number,product,liter,price,amount_before_vat,vat,total_amount,wht_1_percent,total_amount_after_wd,merchant_id,fuel_brand
ACC-9,2024-01-02,2024-01-01,08:15,INV-001,Diesel,30.5,35.08,\"1,000.00\",70.00,\"1,070.00\",10.00,\"1,060.00\",M-1,PTT
ACC-9,2024-01-02,2024-01-01,09:40,INV-002,Gasohol,,,,,\"4,500.00\",,,M-1,PTT
";

    const BOOK_CSV: &str = "\
document_no,posting_date,description,amount
GL-1,2024-01-03,INV-001,\"1,000.00\"
GL-2,2024-01-03,INV-002,5400
";

    #[test]
    fn test_decode_bank_records() {
        let records = decode_bank_records(BANK_CSV).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.invoice_number, "INV-001");
        assert_eq!(first.total_amount, BigDecimal::from(1070));
        assert_eq!(first.vat, BigDecimal::from(70));
        assert_eq!(first.total_amount_after_wd, BigDecimal::from(1060));
        assert_eq!(first.raw_total_amount, "1,070.00");
        assert_eq!(first.liter, "30.5");
        assert_eq!(first.fuel_brand, "PTT");

        let second = &records[1];
        assert_eq!(second.vat, BigDecimal::from(0));
        assert_eq!(second.total_amount, BigDecimal::from(4500));
    }

    #[test]
    fn test_decode_book_records() {
        let records = decode_book_records(BOOK_CSV).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].document_no, "GL-1");
        assert_eq!(records[0].amount, BigDecimal::from_str("1000.00").unwrap());
        assert_eq!(records[1].raw_amount, "5400");
    }

    #[test]
    fn test_bad_amount_reports_row_and_column() {
        let err = decode_book_records("document_no,description,amount\nGL-1,INV-1,10\nGL-2,INV-2,ten\n")
            .unwrap_err();
        match err {
            ReconciliationError::Parse(ParseError::Column { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "amount");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_columns_default() {
        let records = decode_book_records("document_no,description\nGL-1,INV-1\n").unwrap();
        assert_eq!(records[0].amount, BigDecimal::from(0));
        assert_eq!(records[0].raw_amount, "");
    }
}
