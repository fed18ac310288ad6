//! VAT identification number format plausibility.
//!
//! Checks are purely syntactic. A number that passes here may still be
//! unregistered; no registry lookup is performed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Per-jurisdiction VAT ID patterns, applied to the normalized ID
/// (country prefix included). 27 EU states, UK and Switzerland.
const VAT_PATTERNS: &[(&str, &str)] = &[
    ("AT", r"^ATU\d{8}$"),
    ("DE", r"^DE\d{9}$"),
    ("CH", r"^CHE\d{9}(MWST|TVA|IVA)?$"),
    ("BE", r"^BE[01]\d{9}$"),
    ("BG", r"^BG\d{9,10}$"),
    ("CY", r"^CY\d{8}[A-Z]$"),
    ("CZ", r"^CZ\d{8,10}$"),
    ("DK", r"^DK\d{8}$"),
    ("EE", r"^EE\d{9}$"),
    ("EL", r"^EL\d{9}$"),
    ("ES", r"^ES[A-Z0-9]\d{7}[A-Z0-9]$"),
    ("FI", r"^FI\d{8}$"),
    ("FR", r"^FR[A-Z0-9]{2}\d{9}$"),
    ("GB", r"^GB(\d{9}|\d{12}|GD\d{3}|HA\d{3})$"),
    ("HR", r"^HR\d{11}$"),
    ("HU", r"^HU\d{8}$"),
    ("IE", r"^IE\d[A-Z0-9]\d{5}[A-Z]$"),
    ("IT", r"^IT\d{11}$"),
    ("LT", r"^LT(\d{9}|\d{12})$"),
    ("LU", r"^LU\d{8}$"),
    ("LV", r"^LV\d{11}$"),
    ("MT", r"^MT\d{8}$"),
    ("NL", r"^NL\d{9}B\d{2}$"),
    ("PL", r"^PL\d{10}$"),
    ("PT", r"^PT\d{9}$"),
    ("RO", r"^RO\d{2,10}$"),
    ("SE", r"^SE\d{12}$"),
    ("SI", r"^SI\d{8}$"),
    ("SK", r"^SK\d{10}$"),
];

static COMPILED_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    VAT_PATTERNS
        .iter()
        .map(|&(code, pattern)| {
            (
                code,
                Regex::new(pattern).expect("hardcoded VAT pattern should be valid"),
            )
        })
        .collect()
});

/// Prefixes recognised by [`vat_country_code`].
const VAT_PREFIXES: &[&str] = &[
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "EL", "ES", "FI", "FR", "GB", "HR", "HU", "IE",
    "IT", "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK", "CH",
];

/// Strip spaces, hyphens and dots and uppercase.
///
/// ```
/// assert_eq!(invotax::normalize_vat_id("de 123-456.789"), "DE123456789");
/// assert_eq!(invotax::normalize_vat_id(""), "");
/// ```
pub fn normalize_vat_id(id: &str) -> String {
    id.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .collect::<String>()
        .to_uppercase()
}

/// True if the ID looks like a VAT number issued by *any* known jurisdiction.
///
/// The prefix does not have to match the buyer's declared country, so group
/// VAT numbers registered elsewhere are accepted. `None` and anything shorter
/// than 4 characters after normalization are rejected.
pub fn is_likely_valid_vat(id: Option<&str>) -> bool {
    let normalized = normalize_vat_id(id.unwrap_or_default());
    if normalized.len() < 4 {
        return false;
    }

    match COMPILED_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(&normalized))
    {
        Some((code, _)) => {
            debug!(vat_id = %normalized, pattern = *code, "VAT ID matches known pattern");
            true
        }
        None => {
            debug!(vat_id = %normalized, "VAT ID does not match any known pattern");
            false
        }
    }
}

/// Country hint from the VAT ID prefix: two letters, or `CH` for `CHE…`.
///
/// Only a hint for display; scheme decisions never use it.
pub fn vat_country_code(id: &str) -> Option<&'static str> {
    let normalized = normalize_vat_id(id);
    if normalized.len() < 2 {
        return None;
    }
    if normalized.starts_with("CHE") {
        return Some("CH");
    }
    VAT_PREFIXES
        .iter()
        .copied()
        .find(|p| normalized.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_separators() {
        assert_eq!(normalize_vat_id(" atu 1234.5678 "), "ATU12345678");
        assert_eq!(normalize_vat_id("CHE-123.456.789 MWST"), "CHE123456789MWST");
        assert_eq!(normalize_vat_id("\tde123456789\n"), "DE123456789");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["de 123", "ß-x.y", "", "ATU12345678", "nl123456789b01"] {
            let once = normalize_vat_id(s);
            assert_eq!(normalize_vat_id(&once), once);
        }
    }

    #[test]
    fn valid_ids() {
        for id in [
            "DE123456789",
            "ATU12345678",
            "CHE123456789",
            "CHE-123.456.789 MWST",
            "BE0123456789",
            "FR12345678901",
            "FRAB123456789",
            "NL123456789B01",
            "GB123456789",
            "GBGD123",
            "EL123456789",
            "ESX1234567X",
            "IE1A23456B",
            "LT123456789012",
            "RO12",
            "CY12345678L",
        ] {
            assert!(is_likely_valid_vat(Some(id)), "{id} should be plausible");
        }
    }

    #[test]
    fn lowercase_and_spaced_ids_are_normalized_first() {
        assert!(is_likely_valid_vat(Some("de 123 456 789")));
        assert!(is_likely_valid_vat(Some("atu-12345678")));
    }

    #[test]
    fn invalid_ids() {
        assert!(!is_likely_valid_vat(None));
        assert!(!is_likely_valid_vat(Some("")));
        assert!(!is_likely_valid_vat(Some("DE1")));
        assert!(!is_likely_valid_vat(Some("DE12345678")));
        assert!(!is_likely_valid_vat(Some("AT12345678")));
        assert!(!is_likely_valid_vat(Some("BE2123456789")));
        assert!(!is_likely_valid_vat(Some("GR123456789")));
        assert!(!is_likely_valid_vat(Some("XX123456789")));
        assert!(!is_likely_valid_vat(Some("US123456789")));
    }

    #[test]
    fn pattern_table_covers_eu_uk_and_switzerland() {
        assert_eq!(VAT_PATTERNS.len(), 29);
        assert_eq!(COMPILED_PATTERNS.len(), VAT_PATTERNS.len());
    }

    #[test]
    fn country_hint() {
        assert_eq!(vat_country_code("DE123456789"), Some("DE"));
        assert_eq!(vat_country_code("che-123.456.789"), Some("CH"));
        assert_eq!(vat_country_code("EL123456789"), Some("EL"));
        assert_eq!(vat_country_code("US123"), None);
        assert_eq!(vat_country_code("D"), None);
        assert_eq!(vat_country_code(""), None);
    }
}
