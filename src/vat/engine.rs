use std::sync::LazyLock;

use chrono::NaiveDate;
use tracing::debug;

use super::messages::{MessageCatalog, NoteKind};
use super::resolver::{determine_region, explain_scheme};
use super::rules::{Rates, TaxRules};
use crate::core::{
    DocLine, InvotaxError, TaxAssessment, TaxAssessor, TaxBadge, TaxContext, TaxRegion, TaxScheme,
    ValidationError, normalize_country_code, totals, validate_scheme_choice as check_core_scheme,
};

static BUILTIN: LazyLock<TaxEngine> = LazyLock::new(|| {
    TaxEngine::new(
        TaxRules::builtin().expect("embedded tax rules should be valid"),
        MessageCatalog::builtin().expect("embedded message catalogs should be valid"),
    )
});

const BADGE_SMALL_BUSINESS: &str = "#10B981";
const BADGE_REVERSE_CHARGE: &str = "#3B82F6";
const BADGE_EXEMPT: &str = "#6B7280";
const BADGE_STANDARD: &str = "#8B5CF6";

/// Tax rules and note texts bundled for resolution.
///
/// Immutable once built; share it freely between threads.
#[derive(Debug, Clone)]
pub struct TaxEngine {
    rules: TaxRules,
    messages: MessageCatalog,
}

impl TaxEngine {
    pub fn new(rules: TaxRules, messages: MessageCatalog) -> Self {
        Self { rules, messages }
    }

    /// Engine over the tables shipped with the crate.
    pub fn builtin() -> &'static TaxEngine {
        &BUILTIN
    }

    /// Engine over a custom rules table with the built-in message catalogs.
    pub fn with_rules_json(json: &str) -> Result<Self, InvotaxError> {
        Ok(Self::new(TaxRules::from_json(json)?, MessageCatalog::builtin()?))
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    pub fn resolve_scheme(&self, ctx: &TaxContext) -> TaxScheme {
        explain_scheme(ctx).scheme
    }

    pub fn rates_for_country(&self, country: &str, date: Option<NaiveDate>) -> Rates {
        self.rules.rates_for(country, date)
    }

    /// Legal notes for the resolved scheme, de-duplicated in print order.
    pub fn build_legal_notes(&self, ctx: &TaxContext) -> Vec<String> {
        let decision = explain_scheme(ctx);
        self.notes_for(ctx, decision.scheme, decision.region)
    }

    /// Legal notes for a given scheme.
    pub fn notes_for(&self, ctx: &TaxContext, scheme: TaxScheme, region: TaxRegion) -> Vec<String> {
        let msg = self.messages.get(ctx.language);
        let seller = normalize_country_code(&ctx.seller_country);
        let seller = seller.as_str();
        let mut notes = Vec::new();

        if ctx.small_business {
            let key = self.note_key(NoteKind::SmallBusiness, seller);
            push_unique(&mut notes, msg.note(NoteKind::SmallBusiness, &[key, seller]));
        }

        if scheme == TaxScheme::ReverseCharge {
            let key = self.note_key(NoteKind::ReverseCharge, seller);
            push_unique(&mut notes, msg.note(NoteKind::ReverseCharge, &[key, seller]));
            push_unique(&mut notes, Some(msg.uid_hint.as_str()));
        }

        if scheme == TaxScheme::Standard && region == TaxRegion::Domestic {
            push_unique(&mut notes, msg.note(NoteKind::DomesticStandard, &[seller]));
        }

        if region == TaxRegion::ExtraEu && scheme == TaxScheme::Exempt {
            push_unique(&mut notes, msg.note(NoteKind::Export, &[seller]));
        }

        push_unique(&mut notes, Some(msg.disclaimer.as_str()));

        debug!(count = notes.len(), language = ctx.language.code(), "built legal notes");
        notes
    }

    /// UI badge for the resolved scheme.
    pub fn summarize_tax_badge(&self, ctx: &TaxContext) -> TaxBadge {
        self.badge_for(ctx, self.resolve_scheme(ctx))
    }

    pub fn badge_for(&self, ctx: &TaxContext, scheme: TaxScheme) -> TaxBadge {
        if ctx.small_business {
            return TaxBadge::new("KUR", BADGE_SMALL_BUSINESS);
        }
        match scheme {
            TaxScheme::ReverseCharge => TaxBadge::new("RC", BADGE_REVERSE_CHARGE),
            TaxScheme::Exempt => TaxBadge::new("0%", BADGE_EXEMPT),
            TaxScheme::Standard => {
                let rates = self.rules.rates_for(&ctx.seller_country, ctx.invoice_date);
                TaxBadge::new(format!("{}%", rates.standard.normalize()), BADGE_STANDARD)
            }
        }
    }

    /// Findings against a manually chosen scheme, including whether the
    /// seller's country allows reverse charge at all.
    pub fn validate_scheme_choice(
        &self,
        ctx: &TaxContext,
        requested: TaxScheme,
    ) -> Vec<ValidationError> {
        let mut errors = check_core_scheme(ctx, requested);
        if requested == TaxScheme::ReverseCharge
            && !self.rules.reverse_charge_enabled(&ctx.seller_country)
        {
            errors.push(ValidationError::with_rule(
                "seller_country",
                format!("reverse charge is not available for seller country '{}'", ctx.seller_country),
                "Art. 196 MwStSystRL",
            ));
        }
        errors
    }

    fn note_key<'a>(&'a self, kind: NoteKind, country: &'a str) -> &'a str {
        let rules = self.rules.get(country);
        let key = match kind {
            NoteKind::SmallBusiness => rules
                .and_then(|r| r.small_business.as_ref())
                .and_then(|sb| sb.note_key.as_deref()),
            NoteKind::ReverseCharge => rules
                .and_then(|r| r.reverse_charge.as_ref())
                .and_then(|rc| rc.note_key.as_deref()),
            NoteKind::DomesticStandard | NoteKind::Export => None,
        };
        key.unwrap_or(country)
    }
}

impl TaxAssessor for TaxEngine {
    fn resolve(&self, ctx: &TaxContext) -> TaxScheme {
        self.resolve_scheme(ctx)
    }

    fn assess_as(&self, ctx: &TaxContext, lines: &[DocLine], scheme: TaxScheme) -> TaxAssessment {
        let region = determine_region(&ctx.seller_country, &ctx.buyer_country);
        TaxAssessment {
            scheme,
            region,
            totals: totals(lines, scheme),
            legal_notes: self.notes_for(ctx, scheme, region),
            badge: self.badge_for(ctx, scheme),
        }
    }

    fn check_scheme(&self, ctx: &TaxContext, requested: TaxScheme) -> Vec<ValidationError> {
        self.validate_scheme_choice(ctx, requested)
    }
}

fn push_unique(notes: &mut Vec<String>, note: Option<&str>) {
    let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) else {
        return;
    };
    if !notes.iter().any(|n| n == note) {
        notes.push(note.to_string());
    }
}

/// Legal notes from the built-in tables.
pub fn build_legal_notes(ctx: &TaxContext) -> Vec<String> {
    TaxEngine::builtin().build_legal_notes(ctx)
}

/// UI badge from the built-in tables.
pub fn summarize_tax_badge(ctx: &TaxContext) -> TaxBadge {
    TaxEngine::builtin().summarize_tax_badge(ctx)
}

/// Rates from the built-in table; `{standard: 0}` for unknown countries.
pub fn get_rates_for_country(country: &str, date: Option<NaiveDate>) -> Rates {
    TaxEngine::builtin().rates_for_country(country, date)
}

/// Manual scheme check against the built-in tables.
pub fn validate_scheme_choice(ctx: &TaxContext, requested: TaxScheme) -> Vec<ValidationError> {
    TaxEngine::builtin().validate_scheme_choice(ctx, requested)
}

/// Scheme, totals, notes and badge for one document.
pub fn assess(ctx: &TaxContext, lines: &[DocLine]) -> TaxAssessment {
    TaxEngine::builtin().assess(ctx, lines)
}
