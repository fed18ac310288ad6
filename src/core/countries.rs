//! Country table for the seller/client country pickers and the EU membership set.

use serde::Serialize;

use super::types::TaxRegion;

/// A selectable country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code (or "OTHER").
    pub code: &'static str,
    /// English name.
    pub name: &'static str,
    /// EU member state.
    pub is_eu: bool,
}

const fn eu(code: &'static str, name: &'static str) -> Country {
    Country {
        code,
        name,
        is_eu: true,
    }
}

const fn non_eu(code: &'static str, name: &'static str) -> Country {
    Country {
        code,
        name,
        is_eu: false,
    }
}

/// The 27 EU member states (ISO codes; Greece is `GR`).
pub static EU_MEMBER_STATES: &[&str] = &[
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GR", "HR", "HU", "IE", "IT",
    "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK",
];

/// All countries offered in the pickers: EU first, then other trading partners.
pub static COUNTRIES: &[Country] = &[
    eu("AT", "Austria"),
    eu("DE", "Germany"),
    eu("BE", "Belgium"),
    eu("BG", "Bulgaria"),
    eu("HR", "Croatia"),
    eu("CY", "Cyprus"),
    eu("CZ", "Czech Republic"),
    eu("DK", "Denmark"),
    eu("EE", "Estonia"),
    eu("FI", "Finland"),
    eu("FR", "France"),
    eu("GR", "Greece"),
    eu("HU", "Hungary"),
    eu("IE", "Ireland"),
    eu("IT", "Italy"),
    eu("LV", "Latvia"),
    eu("LT", "Lithuania"),
    eu("LU", "Luxembourg"),
    eu("MT", "Malta"),
    eu("NL", "Netherlands"),
    eu("PL", "Poland"),
    eu("PT", "Portugal"),
    eu("RO", "Romania"),
    eu("SK", "Slovakia"),
    eu("SI", "Slovenia"),
    eu("ES", "Spain"),
    eu("SE", "Sweden"),
    non_eu("CH", "Switzerland"),
    non_eu("GB", "United Kingdom"),
    non_eu("US", "United States"),
    non_eu("CA", "Canada"),
    non_eu("AU", "Australia"),
    non_eu("JP", "Japan"),
    non_eu("CN", "China"),
    non_eu("BR", "Brazil"),
    non_eu("IN", "India"),
    non_eu("RU", "Russia"),
    non_eu("NO", "Norway"),
    non_eu("TR", "Turkey"),
    non_eu("MX", "Mexico"),
    non_eu("ZA", "South Africa"),
    non_eu("KR", "South Korea"),
    non_eu("SG", "Singapore"),
    non_eu("AE", "United Arab Emirates"),
    non_eu("NZ", "New Zealand"),
    non_eu("OTHER", "Other"),
];

/// Canonical form of a country code: trimmed, ASCII-uppercased, with the
/// Greek VAT prefix `EL` mapped to its ISO code `GR`.
pub fn normalize_country_code(code: &str) -> String {
    let upper = code.trim().to_ascii_uppercase();
    if upper == "EL" { "GR".to_string() } else { upper }
}

/// Check whether `code` is an EU member state. Accepts `EL` for Greece.
pub fn is_eu_member(code: &str) -> bool {
    EU_MEMBER_STATES.contains(&normalize_country_code(code).as_str())
}

/// Classify a seller/buyer country pair by EU membership.
///
/// Same country is always domestic, even outside the EU.
pub fn region_for(seller_country: &str, buyer_country: &str) -> TaxRegion {
    let seller = normalize_country_code(seller_country);
    let buyer = normalize_country_code(buyer_country);

    if seller == buyer {
        TaxRegion::Domestic
    } else if is_eu_member(&seller) && is_eu_member(&buyer) {
        TaxRegion::IntraEu
    } else {
        TaxRegion::ExtraEu
    }
}

/// Look up a picker country by code.
pub fn country_by_code(code: &str) -> Option<&'static Country> {
    let code = normalize_country_code(code);
    COUNTRIES.iter().find(|c| c.code == code)
}

/// English country name, or the code itself if unknown ("Unknown" when empty).
pub fn country_name(code: &str) -> String {
    match country_by_code(code) {
        Some(c) => c.name.to_string(),
        None if code.trim().is_empty() => "Unknown".to_string(),
        None => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eu_membership() {
        assert!(is_eu_member("DE"));
        assert!(is_eu_member("at"));
        assert!(is_eu_member("GR"));
        assert!(is_eu_member("EL"));
        assert!(!is_eu_member("CH"));
        assert!(!is_eu_member("GB"));
        assert!(!is_eu_member("US"));
        assert!(!is_eu_member(""));
    }

    #[test]
    fn member_list_is_sorted_and_complete() {
        assert_eq!(EU_MEMBER_STATES.len(), 27);
        for window in EU_MEMBER_STATES.windows(2) {
            assert!(window[0] < window[1], "{} >= {}", window[0], window[1]);
        }
    }

    #[test]
    fn picker_flags_agree_with_member_list() {
        for c in COUNTRIES {
            assert_eq!(c.is_eu, is_eu_member(c.code), "{}", c.code);
        }
        assert_eq!(COUNTRIES.iter().filter(|c| c.is_eu).count(), 27);
    }

    #[test]
    fn regions() {
        assert_eq!(region_for("AT", "AT"), TaxRegion::Domestic);
        assert_eq!(region_for("CH", "ch"), TaxRegion::Domestic);
        assert_eq!(region_for("AT", "DE"), TaxRegion::IntraEu);
        assert_eq!(region_for("EL", "GR"), TaxRegion::Domestic);
        assert_eq!(region_for("DE", "EL"), TaxRegion::IntraEu);
        assert_eq!(region_for("AT", "US"), TaxRegion::ExtraEu);
        assert_eq!(region_for("CH", "DE"), TaxRegion::ExtraEu);
        assert_eq!(region_for("GB", "US"), TaxRegion::ExtraEu);
    }

    #[test]
    fn names() {
        assert_eq!(country_name("AT"), "Austria");
        assert_eq!(country_name("el"), "Greece");
        assert_eq!(country_name("XX"), "XX");
        assert_eq!(country_name(""), "Unknown");
    }
}
