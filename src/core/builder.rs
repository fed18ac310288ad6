use chrono::NaiveDate;
use tracing::debug;

use super::currencies::CurrencyCode;
use super::error::InvotaxError;
use super::types::*;
use super::validation;

/// Builder for invoices and quotes.
///
/// Derives the [`TaxContext`] from seller and client the way the document
/// editor does, lets a [`TaxAssessor`] compute scheme, totals and notes, and
/// validates the result.
///
/// ```
/// use chrono::NaiveDate;
/// use invotax::core::*;
/// use invotax::vat::TaxEngine;
/// use rust_decimal_macros::dec;
///
/// let mut seller = CompanyProfile::new("Studio Berger", "AT");
/// seller.vat_id = Some("ATU12345678".into());
///
/// let mut client = Client::new("Kunde GmbH");
/// client.country = Some("DE".into());
/// client.vat_id = Some("DE123456789".into());
///
/// let doc = DocumentBuilder::new(DocType::Invoice, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(), seller)
///     .number("RE-2025-001")
///     .client(client)
///     .add_line(DocLine::new(dec!(10), dec!(120), dec!(20)).title("Beratung"))
///     .build(TaxEngine::builtin())
///     .unwrap();
///
/// assert_eq!(doc.tax_scheme, TaxScheme::ReverseCharge);
/// assert_eq!(doc.total_gross, dec!(1200.00));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    doc_type: DocType,
    number: String,
    date: NaiveDate,
    due_date: Option<NaiveDate>,
    seller: CompanyProfile,
    client: Option<Client>,
    currency: Option<CurrencyCode>,
    language: Option<Language>,
    scheme: Option<TaxScheme>,
    lines: Vec<DocLine>,
    notes: Option<String>,
}

impl DocumentBuilder {
    pub fn new(doc_type: DocType, date: NaiveDate, seller: CompanyProfile) -> Self {
        Self {
            doc_type,
            number: String::new(),
            date,
            due_date: None,
            seller,
            client: None,
            currency: None,
            language: None,
            scheme: None,
            lines: Vec::new(),
            notes: None,
        }
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    /// Take the next number from the seller's own sequence for this type.
    ///
    /// The builder owns its copy of the seller, so the advanced counter is
    /// only visible through the built document's `seller.numbering`. Persist
    /// that profile to keep the sequence.
    pub fn next_number(mut self) -> Self {
        self.number = self.seller.numbering.next_for(self.doc_type, self.date);
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Override the currency (default: client default, then seller currency).
    pub fn currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Override the note language (default: seller language).
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Force a scheme instead of resolving it. Checked against the context on build.
    pub fn tax_scheme(mut self, scheme: TaxScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    pub fn add_line(mut self, line: DocLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn lines(mut self, lines: impl IntoIterator<Item = DocLine>) -> Self {
        self.lines.extend(lines);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Tax context for the current seller/client pair.
    pub fn context(&self) -> TaxContext {
        let client = self.client.as_ref();
        let buyer_country = client
            .and_then(|c| c.country.as_deref())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(&self.seller.country);
        let business_type = client
            .and_then(|c| c.business_type)
            .or(self.seller.business_type_default)
            .unwrap_or(BusinessType::B2B);

        TaxContext {
            seller_country: self.seller.country.clone(),
            buyer_country: buyer_country.to_string(),
            business_type,
            seller_vat_id: self.seller.vat_id.clone(),
            buyer_vat_id: client.and_then(|c| c.vat_id.clone()),
            small_business: self.seller.small_business,
            invoice_date: Some(self.date),
            currency: self.resolved_currency(),
            language: self.language.unwrap_or(self.seller.language),
        }
    }

    /// Live preview of scheme, totals and notes without validation.
    pub fn preview(&self, assessor: &impl TaxAssessor) -> TaxAssessment {
        let ctx = self.context();
        match self.scheme {
            Some(scheme) => assessor.assess_as(&ctx, &self.lines, scheme),
            None => assessor.assess(&ctx, &self.lines),
        }
    }

    /// Build the document. Returns all validation findings as one error.
    pub fn build(self, assessor: &impl TaxAssessor) -> Result<Document, InvotaxError> {
        let mut findings =
            validation::validate_document(&self.number, self.client.as_ref(), &self.lines);
        if let Some(scheme) = self.scheme {
            findings.extend(assessor.check_scheme(&self.context(), scheme));
        }
        if !findings.is_empty() {
            return Err(InvotaxError::from_findings(&findings));
        }

        let assessment = self.preview(assessor);
        let currency = self.resolved_currency();
        let client = self
            .client
            .ok_or_else(|| InvotaxError::Validation("client: client is required".into()))?;

        let doc = Document {
            doc_type: self.doc_type,
            number: self.number,
            date: self.date,
            due_date: self.due_date,
            seller: self.seller,
            client,
            currency,
            tax_scheme: assessment.scheme,
            lines: self.lines,
            subtotal_net: assessment.totals.subtotal_net,
            tax_total: assessment.totals.tax_total,
            total_gross: assessment.totals.total_gross,
            tax_breakdown: assessment.totals.tax_breakdown,
            legal_notes: assessment.legal_notes,
            notes: self.notes,
        };

        let errors = validation::validate_document_for_pdf(&doc);
        if !errors.is_empty() {
            return Err(InvotaxError::from_findings(&errors));
        }

        debug!(number = %doc.number, scheme = doc.tax_scheme.code(), gross = %doc.total_gross, "built document");
        Ok(doc)
    }

    fn resolved_currency(&self) -> CurrencyCode {
        self.currency
            .or_else(|| self.client.as_ref().and_then(|c| c.default_currency))
            .unwrap_or(self.seller.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{region_for, totals};
    use rust_decimal_macros::dec;

    /// Minimal assessor: domestic is standard, everything else exempt.
    struct Flat;

    impl TaxAssessor for Flat {
        fn resolve(&self, ctx: &TaxContext) -> TaxScheme {
            if ctx.small_business
                || region_for(&ctx.seller_country, &ctx.buyer_country) != TaxRegion::Domestic
            {
                TaxScheme::Exempt
            } else {
                TaxScheme::Standard
            }
        }

        fn assess_as(&self, ctx: &TaxContext, lines: &[DocLine], scheme: TaxScheme) -> TaxAssessment {
            let mut legal_notes = Vec::new();
            if ctx.small_business {
                legal_notes.push("Kleinunternehmerregelung".to_string());
            }
            if scheme == TaxScheme::Exempt {
                legal_notes.push("Export".to_string());
            }
            TaxAssessment {
                scheme,
                region: region_for(&ctx.seller_country, &ctx.buyer_country),
                totals: totals(lines, scheme),
                legal_notes,
                badge: TaxBadge::new("-", "#000000"),
            }
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn builder() -> DocumentBuilder {
        DocumentBuilder::new(DocType::Invoice, date(), CompanyProfile::new("Studio", "AT"))
            .number("RE-2025-001")
            .client(Client::new("Kunde"))
            .add_line(DocLine::new(dec!(2), dec!(100), dec!(20)))
    }

    #[test]
    fn context_falls_back_to_seller_country_and_b2b() {
        let ctx = builder().context();
        assert_eq!(ctx.buyer_country, "AT");
        assert_eq!(ctx.business_type, BusinessType::B2B);
        assert_eq!(ctx.currency, CurrencyCode::Eur);
        assert_eq!(ctx.invoice_date, Some(date()));
    }

    #[test]
    fn context_prefers_client_then_profile_defaults() {
        let mut seller = CompanyProfile::new("Studio", "AT");
        seller.business_type_default = Some(BusinessType::B2C);
        let mut client = Client::new("Kunde");
        client.country = Some("  ".into());
        client.default_currency = Some(CurrencyCode::Chf);

        let ctx = DocumentBuilder::new(DocType::Quote, date(), seller.clone())
            .client(client.clone())
            .context();
        assert_eq!(ctx.buyer_country, "AT");
        assert_eq!(ctx.business_type, BusinessType::B2C);
        assert_eq!(ctx.currency, CurrencyCode::Chf);

        client.business_type = Some(BusinessType::B2B);
        let ctx = DocumentBuilder::new(DocType::Quote, date(), seller)
            .client(client)
            .currency(CurrencyCode::Usd)
            .language(Language::En)
            .context();
        assert_eq!(ctx.business_type, BusinessType::B2B);
        assert_eq!(ctx.currency, CurrencyCode::Usd);
        assert_eq!(ctx.language, Language::En);
    }

    #[test]
    fn build_copies_assessment() {
        let doc = builder().notes("Danke").build(&Flat).unwrap();
        assert_eq!(doc.tax_scheme, TaxScheme::Standard);
        assert_eq!(doc.subtotal_net, dec!(200.00));
        assert_eq!(doc.tax_total, dec!(40.00));
        assert_eq!(doc.total_gross, dec!(240.00));
        assert_eq!(doc.tax_breakdown.len(), 1);
        assert_eq!(doc.notes.as_deref(), Some("Danke"));
    }

    #[test]
    fn next_number_uses_seller_sequence() {
        let quote = DocumentBuilder::new(DocType::Quote, date(), CompanyProfile::new("S", "AT"))
            .next_number()
            .client(Client::new("Kunde"))
            .add_line(DocLine::new(dec!(1), dec!(10), dec!(20)))
            .build(&Flat)
            .unwrap();
        assert_eq!(quote.number, "AN-2025-001");
        assert_eq!(quote.seller.numbering.quote.next_raw(), 2);
        assert_eq!(quote.seller.numbering.invoice.next_raw(), 1);
    }

    #[test]
    fn missing_parts_are_reported_together() {
        let err = DocumentBuilder::new(DocType::Invoice, date(), CompanyProfile::new("S", "AT"))
            .build(&Flat)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("number"), "{msg}");
        assert!(msg.contains("client"), "{msg}");
        assert!(msg.contains("lines"), "{msg}");
    }

    #[test]
    fn forced_scheme_is_checked() {
        let err = builder()
            .tax_scheme(TaxScheme::ReverseCharge)
            .build(&Flat)
            .unwrap_err();
        assert!(err.to_string().contains("buyer_vat_id"));
    }

    #[test]
    fn forced_exempt_is_used() {
        let doc = builder().tax_scheme(TaxScheme::Exempt).build(&Flat).unwrap();
        assert_eq!(doc.tax_scheme, TaxScheme::Exempt);
        assert_eq!(doc.tax_total, dec!(0.00));
        assert_eq!(doc.total_gross, dec!(200.00));
    }
}
