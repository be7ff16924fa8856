//! How individual variances are classified

use bigdecimal::BigDecimal;
use settlement_recon::{
    BankRecord, BookRecord, DigitMultisetDetector, ReconciliationConfig, TranspositionDetector,
    VarianceClassifier, Variance, VatRate,
};
use std::str::FromStr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rate = VatRate::default();
    let net = BigDecimal::from(1000);
    println!("VAT {}% on {}: gross {}", rate.percent, net, rate.gross_from_net(&net));
    println!();

    let config = ReconciliationConfig::default();
    let classifier = VarianceClassifier::standard(
        &config,
        Box::new(DigitMultisetDetector::new(config.match_tolerance.clone())),
    );
    println!("Rule order: {:?}", classifier.causes());
    println!();

    let cases = [
        ("1070.00", "70.00", "0", "1000.00"),
        ("1070.00", "70.00", "1060.00", "1060.00"),
        ("4500.00", "0", "0", "5400.00"),
        ("1200.00", "0", "0", "9800.00"),
        ("250.00", "0", "0", "260.00"),
    ];

    for (total, vat, after_wht, book_amount) in cases {
        let bank = BankRecord::new("INV-1", BigDecimal::from_str(total)?)
            .with_vat(BigDecimal::from_str(vat)?)
            .with_amount_after_withholding(BigDecimal::from_str(after_wht)?);
        let book = BookRecord::new("GL-1", "INV-1", BigDecimal::from_str(book_amount)?);

        let result = classifier.classify(&Variance::new(&bank, &book));
        println!(
            "  bank {:>8} book {:>8}: {} ({}%) -> {}",
            total, book_amount, result.cause, result.confidence, result.suggested_fix
        );
    }

    let detector = DigitMultisetDetector::default();
    println!();
    println!(
        "12.30 vs 21.03 treated as transposition: {}",
        detector.is_transposition(&BigDecimal::from_str("12.30")?, &BigDecimal::from_str("21.03")?)
    );

    Ok(())
}
