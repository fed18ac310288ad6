//! Tax scheme resolution as an ordered rule table.
//!
//! Rules are evaluated top to bottom and the first match wins. Several
//! conditions can hold at once (a small-business seller selling intra-EU
//! B2B with a valid buyer VAT ID), so the order is part of the contract.

use serde::Serialize;
use tracing::debug;

use crate::core::{BusinessType, TaxContext, TaxRegion, TaxScheme, is_likely_valid_vat, region_for};

/// One guarded resolution rule.
#[derive(Debug, Clone, Copy)]
pub struct SchemeRule {
    /// Stable name, reported in [`SchemeDecision::rule`].
    pub name: &'static str,
    /// Scheme returned when the guard matches.
    pub scheme: TaxScheme,
    guard: fn(&TaxContext, TaxRegion) -> bool,
}

impl SchemeRule {
    pub fn matches(&self, ctx: &TaxContext, region: TaxRegion) -> bool {
        (self.guard)(ctx, region)
    }
}

fn small_business(ctx: &TaxContext, _region: TaxRegion) -> bool {
    ctx.small_business
}

fn intra_eu_b2b_with_vat_id(ctx: &TaxContext, region: TaxRegion) -> bool {
    region == TaxRegion::IntraEu
        && ctx.business_type == BusinessType::B2B
        && is_likely_valid_vat(ctx.buyer_vat_id.as_deref())
}

fn domestic(_ctx: &TaxContext, region: TaxRegion) -> bool {
    region == TaxRegion::Domestic
}

fn always(_ctx: &TaxContext, _region: TaxRegion) -> bool {
    true
}

const FALLBACK: SchemeRule = SchemeRule {
    name: "non_domestic_fallback",
    scheme: TaxScheme::Exempt,
    guard: always,
};

/// Resolution rules in priority order. The last rule always matches.
pub static SCHEME_RULES: [SchemeRule; 4] = [
    SchemeRule {
        name: "small_business",
        scheme: TaxScheme::Exempt,
        guard: small_business,
    },
    SchemeRule {
        name: "intra_eu_b2b_reverse_charge",
        scheme: TaxScheme::ReverseCharge,
        guard: intra_eu_b2b_with_vat_id,
    },
    SchemeRule {
        name: "domestic_standard",
        scheme: TaxScheme::Standard,
        guard: domestic,
    },
    FALLBACK,
];

/// Outcome of scheme resolution with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemeDecision {
    pub scheme: TaxScheme,
    pub region: TaxRegion,
    pub rule: &'static str,
}

/// Classify the seller/buyer pair as domestic, intra-EU or extra-EU.
pub fn determine_region(seller_country: &str, buyer_country: &str) -> TaxRegion {
    let region = region_for(seller_country, buyer_country);
    debug!(seller = seller_country, buyer = buyer_country, ?region, "determined region");
    region
}

/// Resolve the scheme and report which rule fired.
pub fn explain_scheme(ctx: &TaxContext) -> SchemeDecision {
    let region = determine_region(&ctx.seller_country, &ctx.buyer_country);
    let rule = SCHEME_RULES
        .iter()
        .find(|rule| rule.matches(ctx, region))
        .unwrap_or(&FALLBACK);

    debug!(
        small_business = ctx.small_business,
        ?region,
        business_type = ?ctx.business_type,
        buyer_vat_id = ?ctx.buyer_vat_id,
        rule = rule.name,
        scheme = rule.scheme.code(),
        "resolved tax scheme"
    );

    SchemeDecision {
        scheme: rule.scheme,
        region,
        rule: rule.name,
    }
}

/// The VAT scheme for a transaction. Total: every context resolves to a scheme.
pub fn resolve_scheme(ctx: &TaxContext) -> TaxScheme {
    explain_scheme(ctx).scheme
}
