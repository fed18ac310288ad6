use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::countries::region_for;
use super::error::ValidationError;
use super::types::*;
use super::vat_id::is_likely_valid_vat;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("hardcoded email pattern should be valid")
});

/// Validate the seller's company profile.
/// Returns all validation errors found (not just the first).
pub fn validate_company(profile: &CompanyProfile) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if profile.display_name.trim().is_empty() {
        errors.push(ValidationError::new(
            "display_name",
            "display name is required",
        ));
    }

    if profile.country.trim().is_empty() {
        errors.push(ValidationError::new("country", "country is required"));
    }

    validate_email(profile.email.as_deref(), "email", &mut errors);
    validate_vat_id(profile.vat_id.as_deref(), "vat_id", &mut errors);

    debug!(errors = errors.len(), "validated company profile");
    errors
}

/// Validate a client record.
pub fn validate_client(client: &Client) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if client.name.trim().is_empty() {
        errors.push(ValidationError::new("name", "client name is required"));
    }

    validate_email(client.email.as_deref(), "email", &mut errors);
    validate_vat_id(client.vat_id.as_deref(), "vat_id", &mut errors);

    debug!(errors = errors.len(), "validated client");
    errors
}

/// Validate the parts of a document draft before totals are computed.
///
/// The totals calculator accepts any numbers; this is where quantities,
/// prices and discounts are range-checked.
pub fn validate_document(
    number: &str,
    client: Option<&Client>,
    lines: &[DocLine],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if number.trim().is_empty() {
        errors.push(ValidationError::new("number", "document number is required"));
    }

    if client.is_none() {
        errors.push(ValidationError::new("client", "client is required"));
    }

    if lines.is_empty() {
        errors.push(ValidationError::new(
            "lines",
            "at least one line item is required",
        ));
    }

    for (i, line) in lines.iter().enumerate() {
        validate_line(line, i, &mut errors);
    }

    debug!(errors = errors.len(), "validated document");
    errors
}

/// Validate a manually chosen scheme against the transaction context.
pub fn validate_scheme_choice(ctx: &TaxContext, requested: TaxScheme) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if ctx.seller_country.trim().is_empty() {
        errors.push(ValidationError::new(
            "seller_country",
            "seller country is required",
        ));
    }

    if ctx.buyer_country.trim().is_empty() {
        errors.push(ValidationError::new(
            "buyer_country",
            "buyer country is required",
        ));
    }

    if requested == TaxScheme::ReverseCharge {
        if ctx.business_type != BusinessType::B2B {
            errors.push(ValidationError::with_rule(
                "business_type",
                "reverse charge requires a B2B transaction",
                "Art. 196 MwStSystRL",
            ));
        }
        if !is_likely_valid_vat(ctx.buyer_vat_id.as_deref()) {
            errors.push(ValidationError::with_rule(
                "buyer_vat_id",
                "reverse charge requires a valid buyer VAT ID",
                "Art. 196 MwStSystRL",
            ));
        }
    }

    if ctx.small_business && requested == TaxScheme::Standard {
        errors.push(ValidationError::new(
            "small_business",
            "small business flag conflicts with standard VAT scheme",
        ));
    }

    debug!(errors = errors.len(), scheme = requested.code(), "validated scheme choice");
    errors
}

/// Check a finished document before it is rendered to PDF.
///
/// Zero-tax schemes must carry zero tax and the disclosure that explains why.
pub fn validate_document_for_pdf(doc: &Document) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if doc.tax_scheme.is_zero_tax() && doc.tax_total != Decimal::ZERO {
        errors.push(ValidationError::new(
            "tax_total",
            format!("{} document must have zero tax", doc.tax_scheme.code()),
        ));
    }

    let expected_gross = doc.subtotal_net + doc.tax_total;
    if (doc.total_gross - expected_gross).abs() > dec!(0.01) {
        errors.push(ValidationError::new(
            "total_gross",
            format!(
                "gross total {} does not match net {} + tax {}",
                doc.total_gross, doc.subtotal_net, doc.tax_total
            ),
        ));
    }

    match doc.tax_scheme {
        TaxScheme::ReverseCharge => {
            if !has_note(doc, &["reverse", "umkehr"]) {
                errors.push(ValidationError::with_rule(
                    "legal_notes",
                    "reverse charge document requires a reverse charge notice",
                    "Art. 226 Nr. 11a MwStSystRL",
                ));
            }
        }
        TaxScheme::Exempt if doc.seller.small_business => {
            if !has_note(doc, &["kleinunternehmer", "kleinunternehmen", "small business", "small-business"]) {
                errors.push(ValidationError::new(
                    "legal_notes",
                    "small business document requires a small business exemption notice",
                ));
            }
        }
        TaxScheme::Exempt => {
            let buyer_country = doc.client.country.as_deref().unwrap_or(&doc.seller.country);
            if region_for(&doc.seller.country, buyer_country) == TaxRegion::ExtraEu
                && !has_note(doc, &["export", "ausfuhr"])
            {
                errors.push(ValidationError::with_rule(
                    "legal_notes",
                    "export document requires an export notice",
                    "Art. 146 MwStSystRL",
                ));
            }
        }
        TaxScheme::Standard => {}
    }

    debug!(errors = errors.len(), number = %doc.number, "validated document for PDF");
    errors
}

fn has_note(doc: &Document, keywords: &[&str]) -> bool {
    doc.legal_notes.iter().any(|note| {
        let lower = note.to_lowercase();
        keywords.iter().any(|k| lower.contains(k))
    })
}

fn validate_email(email: Option<&str>, field: &str, errors: &mut Vec<ValidationError>) {
    if let Some(email) = email {
        if !email.trim().is_empty() && !EMAIL_PATTERN.is_match(email) {
            errors.push(ValidationError::new(field, "invalid email format"));
        }
    }
}

fn validate_vat_id(vat_id: Option<&str>, field: &str, errors: &mut Vec<ValidationError>) {
    if let Some(vat_id) = vat_id {
        if !vat_id.trim().is_empty() && !is_likely_valid_vat(Some(vat_id)) {
            errors.push(ValidationError::new(
                field,
                format!("VAT ID '{vat_id}' format appears invalid"),
            ));
        }
    }
}

fn validate_line(line: &DocLine, index: usize, errors: &mut Vec<ValidationError>) {
    let prefix = format!("lines[{index}]");

    if line.qty <= Decimal::ZERO {
        errors.push(ValidationError::new(
            format!("{prefix}.qty"),
            "quantity must be greater than zero",
        ));
    }

    if line.unit_price < Decimal::ZERO {
        errors.push(ValidationError::new(
            format!("{prefix}.unit_price"),
            "unit price must not be negative",
        ));
    }

    if line.tax_rate < Decimal::ZERO || line.tax_rate > dec!(100) {
        errors.push(ValidationError::new(
            format!("{prefix}.tax_rate"),
            "tax rate must be between 0 and 100",
        ));
    }

    if let Some(pct) = line.discount_pct {
        if pct < Decimal::ZERO || pct > dec!(100) {
            errors.push(ValidationError::new(
                format!("{prefix}.discount_pct"),
                "discount must be between 0 and 100",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::totals::totals;
    use chrono::NaiveDate;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn test_line() -> DocLine {
        DocLine::new(dec!(10), dec!(150), dec!(20)).title("Beratung")
    }

    fn document(scheme: TaxScheme, notes: &[&str]) -> Document {
        let lines = vec![test_line()];
        let t = totals(&lines, scheme);
        let mut client = Client::new("Kunde GmbH");
        client.country = Some("DE".into());
        Document {
            doc_type: DocType::Invoice,
            number: "RE-2025-001".into(),
            date: test_date(),
            due_date: None,
            seller: CompanyProfile::new("Studio Huber", "AT"),
            client,
            currency: crate::core::CurrencyCode::Eur,
            tax_scheme: scheme,
            lines,
            subtotal_net: t.subtotal_net,
            tax_total: t.tax_total,
            total_gross: t.total_gross,
            tax_breakdown: t.tax_breakdown,
            legal_notes: notes.iter().map(|n| n.to_string()).collect(),
            notes: None,
        }
    }

    #[test]
    fn valid_company() {
        let mut profile = CompanyProfile::new("Studio Huber", "AT");
        profile.email = Some("office@huber.at".into());
        profile.vat_id = Some("ATU12345678".into());
        assert!(validate_company(&profile).is_empty());
    }

    #[test]
    fn company_collects_all_errors() {
        let mut profile = CompanyProfile::new("  ", "");
        profile.email = Some("not-an-email".into());
        profile.vat_id = Some("AT123".into());
        let errors = validate_company(&profile);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["display_name", "country", "email", "vat_id"]);
    }

    #[test]
    fn blank_optional_fields_are_ignored() {
        let mut client = Client::new("Kunde");
        client.email = Some("".into());
        client.vat_id = Some("  ".into());
        assert!(validate_client(&client).is_empty());
    }

    #[test]
    fn client_name_required() {
        let errors = validate_client(&Client::new(""));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn document_requires_number_client_and_lines() {
        let errors = validate_document("", None, &[]);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn document_lines_are_range_checked() {
        let lines = [
            DocLine::new(dec!(0), dec!(10), dec!(20)),
            DocLine::new(dec!(1), dec!(-1), dec!(120)),
            DocLine::new(dec!(1), dec!(10), dec!(20)).discount(dec!(101)),
        ];
        let client = Client::new("Kunde");
        let errors = validate_document("RE-1", Some(&client), &lines);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "lines[0].qty",
                "lines[1].unit_price",
                "lines[1].tax_rate",
                "lines[2].discount_pct"
            ]
        );
    }

    #[test]
    fn reverse_charge_choice_requires_b2b_and_vat_id() {
        let ctx = TaxContext::new("AT", "DE", BusinessType::B2C);
        let errors = validate_scheme_choice(&ctx, TaxScheme::ReverseCharge);
        assert_eq!(errors.len(), 2);

        let ctx = TaxContext::new("AT", "DE", BusinessType::B2B).buyer_vat_id("DE123456789");
        assert!(validate_scheme_choice(&ctx, TaxScheme::ReverseCharge).is_empty());
    }

    #[test]
    fn small_business_conflicts_with_standard() {
        let ctx = TaxContext::new("AT", "AT", BusinessType::B2C).small_business(true);
        let errors = validate_scheme_choice(&ctx, TaxScheme::Standard);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "small_business");
        assert!(validate_scheme_choice(&ctx, TaxScheme::Exempt).is_empty());
    }

    #[test]
    fn pdf_check_rejects_tax_on_reverse_charge() {
        let mut doc = document(TaxScheme::ReverseCharge, &["Reverse-Charge gemäß Art. 196"]);
        assert!(validate_document_for_pdf(&doc).is_empty());

        doc.tax_total = dec!(300);
        doc.total_gross = doc.subtotal_net + doc.tax_total;
        let errors = validate_document_for_pdf(&doc);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "tax_total");
    }

    #[test]
    fn pdf_check_requires_reverse_charge_note() {
        let doc = document(TaxScheme::ReverseCharge, &["Irrtum vorbehalten."]);
        let errors = validate_document_for_pdf(&doc);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "legal_notes");
    }

    #[test]
    fn pdf_check_requires_small_business_note() {
        let mut doc = document(TaxScheme::Exempt, &[]);
        doc.seller.small_business = true;
        assert_eq!(validate_document_for_pdf(&doc).len(), 1);

        doc.legal_notes = vec!["Keine Umsatzsteuer (Kleinunternehmerregelung).".into()];
        assert!(validate_document_for_pdf(&doc).is_empty());
    }

    #[test]
    fn pdf_check_requires_export_note_outside_eu() {
        let mut doc = document(TaxScheme::Exempt, &[]);
        doc.client.country = Some("US".into());
        assert_eq!(validate_document_for_pdf(&doc).len(), 1);

        doc.legal_notes = vec!["Zero-rated export under Article 146.".into()];
        assert!(validate_document_for_pdf(&doc).is_empty());
    }

    #[test]
    fn pdf_check_accepts_intra_eu_exempt_without_export_note() {
        let doc = document(TaxScheme::Exempt, &[]);
        assert!(validate_document_for_pdf(&doc).is_empty());
    }

    #[test]
    fn pdf_check_detects_inconsistent_gross() {
        let mut doc = document(TaxScheme::Standard, &[]);
        doc.total_gross += dec!(1);
        let errors = validate_document_for_pdf(&doc);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "total_gross");
    }
}
