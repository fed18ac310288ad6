//! Core document types, VAT-ID plausibility, totals, validation and numbering.
//!
//! Everything here is pure: no I/O, no shared mutable state.

mod builder;
pub mod countries;
mod currencies;
mod error;
mod format;
mod numbering;
mod plan;
mod totals;
mod types;
mod validation;
mod vat_id;

pub use builder::*;
pub use countries::{
    COUNTRIES, Country, EU_MEMBER_STATES, country_by_code, country_name, is_eu_member,
    normalize_country_code, region_for,
};
pub use currencies::CurrencyCode;
pub use error::*;
pub use format::{format_currency, format_date, format_number};
pub use numbering::*;
pub use plan::*;
pub use totals::{line_net, line_tax, price_after_discount, round_money, totals};
pub use types::*;
pub use validation::*;
pub use vat_id::{is_likely_valid_vat, normalize_vat_id, vat_country_code};
