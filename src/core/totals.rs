//! Line and document totals.
//!
//! Amounts are accumulated at full precision and rounded once, at output.
//! Inputs are not validated here (see [`super::validation::validate_document`]):
//! a negative quantity yields a negative total rather than an error.
//! Amounts beyond `Decimal`'s range saturate at [`Decimal::MAX`] or
//! [`Decimal::MIN`] with a warning.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use super::types::{DocLine, TaxBreakdownItem, TaxScheme, TotalsResult};

fn product(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| {
        warn!(%a, %b, "amount out of range, saturating");
        if a.is_sign_negative() == b.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

fn sum(a: Decimal, b: Decimal) -> Decimal {
    // overflow only happens when both share a sign
    a.checked_add(b).unwrap_or_else(|| {
        warn!(%a, %b, "amount out of range, saturating");
        if a.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Unit price after a percentage discount. Zero, negative or missing
/// discounts leave the price unchanged. Discounts above 100% are not capped
/// and give a negative price.
pub fn price_after_discount(unit_price: Decimal, discount_pct: Option<Decimal>) -> Decimal {
    match discount_pct {
        Some(pct) if pct > Decimal::ZERO => product(unit_price, Decimal::ONE - pct / dec!(100)),
        _ => unit_price,
    }
}

/// Discounted net amount of a line (unrounded).
pub fn line_net(line: &DocLine) -> Decimal {
    product(price_after_discount(line.unit_price, line.discount_pct), line.qty)
}

/// Tax of a line under the document's scheme (unrounded).
///
/// Reverse charge and exempt documents charge no tax whatever the line's
/// nominal rate.
pub fn line_tax(line: &DocLine, scheme: TaxScheme) -> Decimal {
    if scheme.is_zero_tax() {
        return Decimal::ZERO;
    }
    product(line_net(line), line.tax_rate / dec!(100))
}

/// Compute document totals for `lines` under `scheme`.
///
/// The breakdown lists each distinct positive rate once, in order of first
/// occurrence, and is only populated for [`TaxScheme::Standard`].
pub fn totals(lines: &[DocLine], scheme: TaxScheme) -> TotalsResult {
    let mut subtotal_net = Decimal::ZERO;
    let mut tax_total = Decimal::ZERO;
    // (rate, base, tax) in first-seen order
    let mut by_rate: Vec<(Decimal, Decimal, Decimal)> = Vec::new();

    for line in lines {
        let net = line_net(line);
        let tax = line_tax(line, scheme);

        subtotal_net = sum(subtotal_net, net);
        tax_total = sum(tax_total, tax);

        if scheme == TaxScheme::Standard && line.tax_rate > Decimal::ZERO {
            match by_rate.iter_mut().find(|(rate, _, _)| *rate == line.tax_rate) {
                Some((_, base, rate_tax)) => {
                    *base = sum(*base, net);
                    *rate_tax = sum(*rate_tax, tax);
                }
                None => by_rate.push((line.tax_rate, net, tax)),
            }
        }
    }

    let tax_breakdown = by_rate
        .into_iter()
        .map(|(rate, base, tax)| TaxBreakdownItem {
            rate,
            base: round_money(base),
            tax: round_money(tax),
        })
        .collect();

    let subtotal_net = round_money(subtotal_net);
    let tax_total = round_money(tax_total);
    // gross == net + tax as printed
    let result = TotalsResult {
        subtotal_net,
        tax_total,
        total_gross: sum(subtotal_net, tax_total),
        tax_breakdown,
    };

    debug!(
        lines = lines.len(),
        scheme = scheme.code(),
        net = %result.subtotal_net,
        tax = %result.tax_total,
        gross = %result.total_gross,
        "calculated totals"
    );

    result
}

/// Round to cents using half-up (commercial) rounding, with a fixed scale of 2.
///
/// Midpoints round away from zero on both sides, so `-0.005` becomes `-0.01`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
