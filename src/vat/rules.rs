//! Per-country VAT rules: rates, currency, small-business and reverse-charge availability.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{CurrencyCode, InvotaxError, normalize_country_code};

const BUILTIN_RULES: &str = include_str!("data/rules.json");

/// Standard and reduced VAT rates of a country, in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rates {
    pub standard: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reduced: Vec<Decimal>,
}

impl Rates {
    /// Degraded result for countries without a rate table.
    pub fn zero() -> Self {
        Self {
            standard: Decimal::ZERO,
            reduced: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmallBusinessRule {
    /// Key into the small-business note dictionary, if not the country itself.
    #[serde(default)]
    pub note_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseChargeRule {
    pub enabled: bool,
    /// Key into the reverse-charge note dictionary, if not the country itself.
    #[serde(default)]
    pub note_key: Option<String>,
}

/// Rules for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRules {
    /// ISO 4217 code of the local currency.
    pub currency: String,
    #[serde(default)]
    pub rates: Option<Rates>,
    /// Present if the country has a small-business regime.
    #[serde(default)]
    pub small_business: Option<SmallBusinessRule>,
    #[serde(default)]
    pub reverse_charge: Option<ReverseChargeRule>,
}

/// Country rules table keyed by normalized country code.
///
/// Loaded once and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRules {
    countries: BTreeMap<String, CountryRules>,
}

impl TaxRules {
    /// Parse a rules table from JSON. Keys are normalized (`el` becomes `GR`).
    pub fn from_json(json: &str) -> Result<Self, InvotaxError> {
        let raw: BTreeMap<String, CountryRules> = serde_json::from_str(json)
            .map_err(|e| InvotaxError::Config(format!("tax rules: {e}")))?;
        let countries = raw
            .into_iter()
            .map(|(code, rules)| (normalize_country_code(&code), rules))
            .collect();
        Ok(Self { countries })
    }

    /// The table shipped with the crate.
    pub fn builtin() -> Result<Self, InvotaxError> {
        Self::from_json(BUILTIN_RULES)
    }

    pub fn get(&self, country: &str) -> Option<&CountryRules> {
        self.countries.get(&normalize_country_code(country))
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Rates for `country`; `{standard: 0}` with a warning if the table has none.
    ///
    /// `_date` is accepted for effective-dated rates but not used yet.
    pub fn rates_for(&self, country: &str, _date: Option<NaiveDate>) -> Rates {
        match self.get(country).and_then(|r| r.rates.as_ref()) {
            Some(rates) => rates.clone(),
            None => {
                warn!(country, "no rates found, using 0%");
                Rates::zero()
            }
        }
    }

    /// Default currency of `country`, if the crate supports it.
    pub fn currency_for(&self, country: &str) -> Option<CurrencyCode> {
        self.get(country)
            .and_then(|r| CurrencyCode::from_code(&r.currency))
    }

    pub fn reverse_charge_enabled(&self, country: &str) -> bool {
        self.get(country)
            .and_then(|r| r.reverse_charge.as_ref())
            .is_some_and(|rc| rc.enabled)
    }

    pub fn has_small_business_regime(&self, country: &str) -> bool {
        self.get(country).is_some_and(|r| r.small_business.is_some())
    }
}
