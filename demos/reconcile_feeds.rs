//! Reconcile a bank settlement export against a ledger export

use settlement_recon::{format_amount, reconcile_csv, MatchStatus};
use tracing_subscriber::EnvFilter;

const BANK_CSV: &str = "\
account_no,settlement_date,transaction_date,time,invoice_number,product,liter,price,amount_before_vat,vat,total_amount,wht_1_percent,total_amount_after_wd,merchant_id,fuel_brand
1002003001,2024-02-01,2024-01-31,08:02,INV-001,Diesel,30.00,33.33,\"1,000.00\",70.00,\"1,070.00\",10.00,\"1,060.00\",M-7001,PTT
1002003001,2024-02-01,2024-01-31,08:41,INV-002,Diesel,135.00,33.33,\"4,205.61\",294.39,\"4,500.00\",42.06,\"4,457.94\",M-7001,PTT
1002003001,2024-02-01,2024-01-31,09:13,INV-003,Gasohol 95,6.80,36.76,233.64,16.36,250.00,2.34,247.66,M-7001,PTT
1002003001,2024-02-01,2024-01-31,10:27,INV-004,Gasohol 95,54.42,36.76,\"1,869.16\",130.84,\"2,000.00\",18.69,\"1,981.31\",M-7001,PTT
1002003001,2024-02-01,2024-01-31,11:05,INV-778,Diesel,9.00,33.33,280.37,19.63,300.00,2.80,297.20,M-7001,PTT
1002003001,2024-02-01,2024-01-31,12:30,INV-900,Gasohol 91,5.50,36.36,186.92,13.08,200.00,1.87,198.13,M-7001,PTT
";

const BOOK_CSV: &str = "\
document_no,posting_date,description,amount
JV2401-0001,2024-02-02,INV-001,\"1,000.00\"
JV2401-0002,2024-02-02,INV-002,\"5,400.00\"
JV2401-0003,2024-02-02,INV-003,250.00
JV2401-0004,2024-02-02,INV-004,\"1,981.31\"
JV2401-0005,2024-02-02,INV-777,300.00
JV2401-0006,2024-02-02,INV-555,75.25
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Settlement Reconciliation\n");

    let report = reconcile_csv(BANK_CSV, BOOK_CSV)?;

    for item in &report.items {
        let amount = item
            .book_record()
            .map(|r| format_amount(&r.amount))
            .or_else(|| item.bank_record().map(|r| format_amount(&r.total_amount)))
            .unwrap_or_default();
        println!(
            "  {:<24} {:<20} {:>10}  {:>3}%  {}",
            item.id,
            format!("{:?}", item.status),
            amount,
            item.confidence,
            item.reason.map(|r| r.label()).unwrap_or("-"),
        );
        if let Some(fix) = &item.suggested_fix {
            println!("  {:<24} -> {}", "", fix);
        }
    }

    let stats = &report.stats;
    println!();
    println!("  Total:           {}", stats.total);
    println!("  Matched:         {}", stats.matched);
    println!("  Mismatched:      {}", stats.mismatched);
    println!("  Missing in bank: {}", stats.missing_in_bank);
    println!("  Missing in book: {}", stats.missing_in_book);
    println!("  Accuracy:        {:.1}%", stats.accuracy_percent());

    // Approve every fix that does not need manual review
    let mut fixed = report.clone();
    let fixable: Vec<String> = report
        .issues()
        .filter(|item| item.is_fixable())
        .map(|item| item.id.clone())
        .collect();
    for id in &fixable {
        fixed = fixed.apply_fix(id)?;
    }

    println!();
    println!(
        "After applying {} fixes: {} matched, {} still open, accuracy {:.1}%",
        fixable.len(),
        fixed.stats.matched,
        fixed.issues().count(),
        fixed.stats.accuracy_percent()
    );
    for item in fixed.with_status(MatchStatus::MissingInBank) {
        println!("  Needs investigation: {}", item.id);
    }

    Ok(())
}
