#![no_main]

use invotax::{DocLine, TaxScheme, totals};
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

// Each line: qty, price (cents), rate, discount. Large values exercise the
// saturating paths.
fuzz_target!(|data: Vec<(i64, i64, u8, Option<u16>)>| {
    let lines: Vec<DocLine> = data
        .iter()
        .take(256)
        .map(|&(qty, cents, rate, discount)| {
            let mut line = DocLine::new(
                Decimal::from(qty),
                Decimal::new(cents, 2),
                Decimal::from(rate),
            );
            line.discount_pct = discount.map(Decimal::from);
            line
        })
        .collect();

    for scheme in [TaxScheme::Standard, TaxScheme::ReverseCharge, TaxScheme::Exempt] {
        let t = totals(&lines, scheme);
        if let Some(gross) = t.subtotal_net.checked_add(t.tax_total) {
            assert_eq!(t.total_gross, gross);
        }
        if scheme.is_zero_tax() {
            assert!(t.tax_total.is_zero());
            assert!(t.tax_breakdown.is_empty());
        }
    }
});
