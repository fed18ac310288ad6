use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currencies::CurrencyCode;
use super::error::ValidationError;
use super::numbering::DocumentNumbering;

/// Whether the buyer acts as a business or as a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    /// Business customer (may be liable under reverse charge).
    B2B,
    /// Private consumer.
    B2C,
}

/// Output language for legal notes and formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// German.
    #[default]
    De,
    /// English.
    En,
}

impl Language {
    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    /// Parse from an ISO 639-1 code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "de" => Some(Self::De),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

/// The VAT treatment of a whole document.
///
/// Exactly one scheme applies per [`TaxContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxScheme {
    /// Normal VAT is charged by the seller.
    Standard,
    /// The buyer self-assesses; the seller charges no VAT.
    ReverseCharge,
    /// No VAT charged (small-business exemption, export, unverifiable cross-border sale).
    Exempt,
}

impl TaxScheme {
    /// Wire code as persisted on documents.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::ReverseCharge => "REVERSE_CHARGE",
            Self::Exempt => "EXEMPT",
        }
    }

    /// Parse from the persisted wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "STANDARD" => Some(Self::Standard),
            "REVERSE_CHARGE" => Some(Self::ReverseCharge),
            "EXEMPT" => Some(Self::Exempt),
            _ => None,
        }
    }

    /// True if the seller charges no tax under this scheme.
    pub fn is_zero_tax(&self) -> bool {
        matches!(self, Self::ReverseCharge | Self::Exempt)
    }
}

/// Transaction region derived from the seller/buyer country pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxRegion {
    /// Seller and buyer in the same country.
    Domestic,
    /// Both in the EU, different member states.
    IntraEu,
    /// At least one party outside the EU.
    ExtraEu,
}

/// Input to scheme resolution. Immutable per calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxContext {
    /// Seller country (ISO 3166-1 alpha-2).
    pub seller_country: String,
    /// Buyer country (ISO 3166-1 alpha-2).
    pub buyer_country: String,
    /// B2B or B2C.
    pub business_type: BusinessType,
    /// Seller VAT identification number.
    pub seller_vat_id: Option<String>,
    /// Buyer VAT identification number.
    pub buyer_vat_id: Option<String>,
    /// Seller elected the small-business exemption (Kleinunternehmerregelung).
    pub small_business: bool,
    /// Invoice date. Reserved for effective-dated rates, not used for selection.
    pub invoice_date: Option<NaiveDate>,
    /// Document currency.
    pub currency: CurrencyCode,
    /// Language of the generated legal notes.
    pub language: Language,
}

impl TaxContext {
    pub fn new(
        seller_country: impl Into<String>,
        buyer_country: impl Into<String>,
        business_type: BusinessType,
    ) -> Self {
        Self {
            seller_country: seller_country.into(),
            buyer_country: buyer_country.into(),
            business_type,
            seller_vat_id: None,
            buyer_vat_id: None,
            small_business: false,
            invoice_date: None,
            currency: CurrencyCode::Eur,
            language: Language::De,
        }
    }

    pub fn seller_vat_id(mut self, id: impl Into<String>) -> Self {
        self.seller_vat_id = Some(id.into());
        self
    }

    pub fn buyer_vat_id(mut self, id: impl Into<String>) -> Self {
        self.buyer_vat_id = Some(id.into());
        self
    }

    pub fn small_business(mut self, flag: bool) -> Self {
        self.small_business = flag;
        self
    }

    pub fn invoice_date(mut self, date: NaiveDate) -> Self {
        self.invoice_date = Some(date);
        self
    }

    pub fn currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

/// One priced line of a document.
///
/// A line carries its nominal tax rate only; whether tax is actually charged
/// is decided by the document-level [`TaxScheme`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocLine {
    /// Catalogue item this line was created from.
    pub item_id: Option<String>,
    /// Line title (overrides the item title).
    pub title: Option<String>,
    /// Line description.
    pub description: Option<String>,
    /// Quantity (> 0).
    pub qty: Decimal,
    /// Unit label ("Stk", "Std", "Tag", "Monat", "Pauschal").
    pub unit: String,
    /// Net unit price (>= 0).
    pub unit_price: Decimal,
    /// Nominal VAT rate in percent (0..=100).
    pub tax_rate: Decimal,
    /// Discount in percent (0..=100).
    pub discount_pct: Option<Decimal>,
}

impl DocLine {
    pub fn new(qty: Decimal, unit_price: Decimal, tax_rate: Decimal) -> Self {
        Self {
            item_id: None,
            title: None,
            description: None,
            qty,
            unit: "Stk".to_string(),
            unit_price,
            tax_rate,
            discount_pct: None,
        }
    }

    pub fn discount(mut self, pct: Decimal) -> Self {
        self.discount_pct = Some(pct);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn item_id(mut self, id: impl Into<String>) -> Self {
        self.item_id = Some(id.into());
        self
    }
}

/// Taxable base and tax amount for one nominal rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdownItem {
    /// VAT rate in percent.
    pub rate: Decimal,
    /// Net amount taxed at this rate.
    pub base: Decimal,
    /// Tax at this rate.
    pub tax: Decimal,
}

/// Document totals, rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsResult {
    /// Sum of discounted line net amounts.
    pub subtotal_net: Decimal,
    /// Sum of line taxes (zero for reverse charge and exempt documents).
    pub tax_total: Decimal,
    /// `subtotal_net + tax_total`.
    pub total_gross: Decimal,
    /// Per-rate breakdown in order of first occurrence. Empty unless `STANDARD`.
    pub tax_breakdown: Vec<TaxBreakdownItem>,
}

/// Short label/colour pair shown next to a document in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBadge {
    /// "KUR", "RC", "0%" or the standard rate ("20%").
    pub label: String,
    /// Hex colour, e.g. "#10B981".
    pub color: String,
}

impl TaxBadge {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
        }
    }
}

/// Everything the tax side contributes to a saved or previewed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxAssessment {
    pub scheme: TaxScheme,
    pub region: TaxRegion,
    pub totals: TotalsResult,
    /// De-duplicated legal disclosures in print order.
    pub legal_notes: Vec<String>,
    pub badge: TaxBadge,
}

/// Computes the tax side of a document from its context and lines.
///
/// Implemented by the VAT engine; the document builder only depends on this.
pub trait TaxAssessor {
    /// The scheme that applies to `ctx`.
    fn resolve(&self, ctx: &TaxContext) -> TaxScheme;

    /// Assess `lines` under a given scheme (resolved or manually chosen).
    fn assess_as(&self, ctx: &TaxContext, lines: &[DocLine], scheme: TaxScheme) -> TaxAssessment;

    fn assess(&self, ctx: &TaxContext, lines: &[DocLine]) -> TaxAssessment {
        self.assess_as(ctx, lines, self.resolve(ctx))
    }

    /// Findings against a manually chosen scheme.
    fn check_scheme(&self, ctx: &TaxContext, requested: TaxScheme) -> Vec<ValidationError> {
        super::validation::validate_scheme_choice(ctx, requested)
    }
}

/// Invoice or quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocType {
    /// Rechnung.
    Invoice,
    /// Angebot.
    Quote,
}

/// Postal address of a company or client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
}

/// The seller's own company profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Name shown on documents.
    pub display_name: String,
    /// Registered legal name, if different.
    pub legal_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Address,
    /// Seat of the business (ISO 3166-1 alpha-2).
    pub country: String,
    /// USt-IdNr. / UID.
    pub vat_id: Option<String>,
    /// National tax number (Steuernummer).
    pub tax_number: Option<String>,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub website: Option<String>,
    /// Default document currency.
    pub currency: CurrencyCode,
    /// Default document language.
    pub language: Language,
    /// Invoice and quote number sequences.
    pub numbering: DocumentNumbering,
    /// Paid subscription active.
    pub premium: bool,
    /// Small-business exemption elected.
    pub small_business: bool,
    /// Business type assumed for clients that do not declare one.
    pub business_type_default: Option<BusinessType>,
}

impl CompanyProfile {
    pub fn new(display_name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            legal_name: None,
            email: None,
            phone: None,
            address: Address::default(),
            country: country.into(),
            vat_id: None,
            tax_number: None,
            iban: None,
            bic: None,
            website: None,
            currency: CurrencyCode::Eur,
            language: Language::De,
            numbering: DocumentNumbering::default(),
            premium: false,
            small_business: false,
            business_type_default: None,
        }
    }
}

/// A customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Address,
    /// Country (ISO 3166-1 alpha-2). Falls back to the seller's country.
    pub country: Option<String>,
    pub vat_id: Option<String>,
    pub notes: Option<String>,
    pub business_type: Option<BusinessType>,
    pub default_currency: Option<CurrencyCode>,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            address: Address::default(),
            country: None,
            vat_id: None,
            notes: None,
            business_type: None,
            default_currency: None,
        }
    }
}

/// A finished invoice or quote as persisted by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doc_type: DocType,
    /// Document number, e.g. "RE-2025-001".
    pub number: String,
    /// Issue date.
    pub date: NaiveDate,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    pub seller: CompanyProfile,
    pub client: Client,
    pub currency: CurrencyCode,
    pub tax_scheme: TaxScheme,
    pub lines: Vec<DocLine>,
    pub subtotal_net: Decimal,
    pub tax_total: Decimal,
    pub total_gross: Decimal,
    pub tax_breakdown: Vec<TaxBreakdownItem>,
    /// Legal disclosures printed below the totals.
    pub legal_notes: Vec<String>,
    /// Free text.
    pub notes: Option<String>,
}
