//! Locale-aware display formatting for amounts and dates.
//!
//! German output uses `.` for thousands and `,` for decimals with the
//! currency symbol trailing; English output uses `,`/`.` with a leading symbol.

use chrono::{DateTime, NaiveDate};
use num_format::{Locale, ToFormattedString as _};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use tracing::warn;

use super::currencies::CurrencyCode;
use super::totals::round_money;
use super::types::Language;

/// Format a number with two decimals and locale grouping, e.g. "1.234,56".
pub fn format_number(value: Decimal, language: Language) -> String {
    let rounded = round_money(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = rounded.abs();
    let whole = abs.trunc();
    let cents = ((abs - whole) * dec!(100)).to_u32().unwrap_or_default();

    let (locale, decimal_mark) = match language {
        Language::De => (&Locale::de, ','),
        Language::En => (&Locale::en, '.'),
    };
    let grouped = match whole.to_i64() {
        Some(n) => n.to_formatted_string(locale),
        None => whole.to_string(),
    };

    format!("{sign}{grouped}{decimal_mark}{cents:02}")
}

/// Format an amount with its currency, e.g. "1.234,56 €" or "€1,234.56".
pub fn format_currency(amount: Decimal, currency: CurrencyCode, language: Language) -> String {
    let number = format_number(amount, language);
    match language {
        Language::De => format!("{number} {}", currency.symbol()),
        Language::En => {
            let (sign, digits) = match number.strip_prefix('-') {
                Some(rest) => ("-", rest),
                None => ("", number.as_str()),
            };
            match currency {
                CurrencyCode::Chf => format!("{sign}CHF {digits}"),
                _ => format!("{sign}{}{digits}", currency.symbol()),
            }
        }
    }
}

/// Format an ISO date (`2024-06-15` or RFC 3339 timestamp) for display.
///
/// Unparsable input is returned unchanged.
pub fn format_date(iso: &str, language: Language) -> String {
    let Some(date) = parse_iso_date(iso) else {
        warn!(input = iso, "could not parse date for display");
        return iso.to_string();
    };
    match language {
        Language::De => date.format("%d.%m.%Y").to_string(),
        Language::En => date.format("%m/%d/%Y").to_string(),
    }
}

fn parse_iso_date(iso: &str) -> Option<NaiveDate> {
    let iso = iso.trim();
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(iso).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn german_grouping() {
        assert_eq!(format_number(dec!(1234.5), Language::De), "1.234,50");
        assert_eq!(format_number(dec!(1234567.891), Language::De), "1.234.567,89");
        assert_eq!(format_number(dec!(0), Language::De), "0,00");
    }

    #[test]
    fn english_grouping() {
        assert_eq!(format_number(dec!(1234.5), Language::En), "1,234.50");
        assert_eq!(format_number(dec!(-0.005), Language::En), "-0.01");
    }

    #[test]
    fn currency_placement() {
        assert_eq!(
            format_currency(dec!(1234.56), CurrencyCode::Eur, Language::De),
            "1.234,56 €"
        );
        assert_eq!(
            format_currency(dec!(1234.56), CurrencyCode::Eur, Language::En),
            "€1,234.56"
        );
        assert_eq!(
            format_currency(dec!(99), CurrencyCode::Chf, Language::En),
            "CHF 99.00"
        );
        assert_eq!(
            format_currency(dec!(99), CurrencyCode::Chf, Language::De),
            "99,00 CHF"
        );
        assert_eq!(
            format_currency(dec!(-5), CurrencyCode::Usd, Language::En),
            "-$5.00"
        );
    }

    #[test]
    fn dates() {
        assert_eq!(format_date("2024-06-15", Language::De), "15.06.2024");
        assert_eq!(format_date("2024-06-15", Language::En), "06/15/2024");
        assert_eq!(
            format_date("2024-06-15T10:30:00Z", Language::De),
            "15.06.2024"
        );
    }

    #[test]
    fn unparsable_date_is_returned_as_is() {
        assert_eq!(format_date("next tuesday", Language::De), "next tuesday");
    }
}
