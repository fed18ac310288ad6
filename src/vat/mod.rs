//! VAT scheme resolution, legal notes and badges over static country rules.
//!
//! Decides whether a document is taxed normally, under reverse charge or
//! exempt, and which localized disclosures it must carry.
//!
//! # Example
//!
//! ```
//! use invotax::core::{BusinessType, TaxContext, TaxScheme};
//! use invotax::vat::*;
//!
//! let ctx = TaxContext::new("AT", "DE", BusinessType::B2B).buyer_vat_id("DE123456789");
//!
//! let decision = explain_scheme(&ctx);
//! assert_eq!(decision.scheme, TaxScheme::ReverseCharge);
//! assert_eq!(decision.rule, "intra_eu_b2b_reverse_charge");
//!
//! assert_eq!(summarize_tax_badge(&ctx).label, "RC");
//! assert!(build_legal_notes(&ctx)[0].contains("Art. 196"));
//! ```

mod engine;
mod messages;
mod resolver;
mod rules;

pub use engine::{
    TaxEngine, assess, build_legal_notes, get_rates_for_country, summarize_tax_badge,
    validate_scheme_choice,
};
pub use messages::{MessageCatalog, Messages, NoteDictionary, NoteKind};
pub use resolver::{
    SCHEME_RULES, SchemeDecision, SchemeRule, determine_region, explain_scheme, resolve_scheme,
};
pub use rules::{CountryRules, Rates, ReverseChargeRule, SmallBusinessRule, TaxRules};
