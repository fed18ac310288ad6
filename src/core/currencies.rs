//! Supported document currencies.
//!
//! Documents are single-currency; no conversion between these is performed.

use serde::{Deserialize, Serialize};

/// ISO 4217 currencies a document can be issued in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    /// Euro.
    #[default]
    Eur,
    /// US Dollar.
    Usd,
    /// Pound Sterling.
    Gbp,
    /// Swiss Franc.
    Chf,
}

impl CurrencyCode {
    /// All supported currencies, in picker order.
    pub const ALL: [CurrencyCode; 4] = [Self::Eur, Self::Usd, Self::Gbp, Self::Chf];

    /// ISO 4217 alphabetic code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Chf => "CHF",
        }
    }

    /// Display symbol. The franc has none and uses its code.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eur => "€",
            Self::Usd => "$",
            Self::Gbp => "£",
            Self::Chf => "CHF",
        }
    }

    /// Parse from an ISO 4217 code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "EUR" => Some(Self::Eur),
            "USD" => Some(Self::Usd),
            "GBP" => Some(Self::Gbp),
            "CHF" => Some(Self::Chf),
            _ => None,
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
