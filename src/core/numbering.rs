use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::InvotaxError;
use super::types::DocType;

/// Sequential document number generator.
///
/// Generates numbers in the format `{prefix}{year}-{sequential}`,
/// e.g. "RE-2025-001", "RE-2025-002". A bare sequence only resets when the
/// year is advanced; [`DocumentNumbering`] does that on the first number of a new year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberSequence {
    prefix: String,
    next: u64,
    padding: usize,
    year: Option<i32>,
}

impl NumberSequence {
    /// Create a new sequence starting at 1.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    /// Create a sequence continuing from a given number.
    pub fn starting_at(prefix: impl Into<String>, next: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next,
            padding: 3,
            year: None,
        }
    }

    /// Set zero-padding width (default: 3, so "001").
    pub fn with_padding(mut self, width: usize) -> Self {
        self.padding = width;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The number that will be issued next (without prefix/formatting).
    pub fn next_raw(&self) -> u64 {
        self.next
    }

    /// Year of the last issued number, if any.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Issue the number for `year` and advance the counter.
    pub fn issue(&mut self, year: i32) -> String {
        let number = self.format(year, self.next);
        self.next += 1;
        self.year = Some(self.year.map_or(year, |current| current.max(year)));
        debug!(number = %number, "issued document number");
        number
    }

    /// Preview the number for `year` without consuming it.
    pub fn peek(&self, year: i32) -> String {
        self.format(year, self.next)
    }

    /// Start counting from 1 again for a later year.
    pub fn advance_year(&mut self, new_year: i32) -> Result<(), InvotaxError> {
        if let Some(current) = self.year {
            if new_year <= current {
                return Err(InvotaxError::Numbering(format!(
                    "new year {new_year} must be greater than current year {current}"
                )));
            }
        }
        self.year = Some(new_year);
        self.next = 1;
        Ok(())
    }

    /// Reset the counter if `date` falls in a later year than the last issued number.
    /// Returns true if the year was advanced.
    pub fn auto_advance(&mut self, date: NaiveDate) -> bool {
        match self.year {
            Some(current) if date.year() > current => {
                self.year = Some(date.year());
                self.next = 1;
                true
            }
            _ => false,
        }
    }

    fn format(&self, year: i32, n: u64) -> String {
        format!(
            "{}{}-{:0>width$}",
            self.prefix,
            year,
            n,
            width = self.padding
        )
    }
}

/// Invoice and quote sequences of a company profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNumbering {
    pub invoice: NumberSequence,
    pub quote: NumberSequence,
}

impl Default for DocumentNumbering {
    /// "RE-" for invoices (Rechnung), "AN-" for quotes (Angebot).
    fn default() -> Self {
        Self {
            invoice: NumberSequence::new("RE-"),
            quote: NumberSequence::new("AN-"),
        }
    }
}

impl DocumentNumbering {
    fn sequence_mut(&mut self, doc_type: DocType) -> &mut NumberSequence {
        match doc_type {
            DocType::Invoice => &mut self.invoice,
            DocType::Quote => &mut self.quote,
        }
    }

    /// Issue the next number for a document dated `date`. The first document
    /// of a new year starts again at 1.
    ///
    /// There is one counter per document type, not per year. A back-dated
    /// document takes the current counter with its own year, so after
    /// `RE-2025-001` a 2024 document gets `RE-2024-002` and the next 2025
    /// document `RE-2025-003`.
    pub fn next_for(&mut self, doc_type: DocType, date: NaiveDate) -> String {
        let seq = self.sequence_mut(doc_type);
        seq.auto_advance(date);
        seq.issue(date.year())
    }

    /// Preview what [`next_for`](Self::next_for) would return.
    pub fn peek_for(&self, doc_type: DocType, date: NaiveDate) -> String {
        let seq = match doc_type {
            DocType::Invoice => &self.invoice,
            DocType::Quote => &self.quote,
        };
        match seq.year {
            Some(current) if date.year() > current => seq.format(date.year(), 1),
            _ => seq.peek(date.year()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sequential_numbering() {
        let mut seq = NumberSequence::new("RE-");
        assert_eq!(seq.issue(2025), "RE-2025-001");
        assert_eq!(seq.issue(2025), "RE-2025-002");
        assert_eq!(seq.issue(2025), "RE-2025-003");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut seq = NumberSequence::new("RE-");
        assert_eq!(seq.peek(2025), "RE-2025-001");
        assert_eq!(seq.peek(2025), "RE-2025-001");
        assert_eq!(seq.issue(2025), "RE-2025-001");
        assert_eq!(seq.peek(2025), "RE-2025-002");
    }

    #[test]
    fn starting_at() {
        let mut seq = NumberSequence::starting_at("INV-", 42);
        assert_eq!(seq.issue(2024), "INV-2024-042");
        assert_eq!(seq.next_raw(), 43);
    }

    #[test]
    fn custom_padding() {
        let mut seq = NumberSequence::new("R").with_padding(5);
        assert_eq!(seq.issue(2024), "R2024-00001");
    }

    #[test]
    fn counter_does_not_reset_on_its_own() {
        let mut seq = NumberSequence::new("RE-");
        seq.issue(2024);
        assert_eq!(seq.issue(2025), "RE-2025-002");
    }

    #[test]
    fn year_advance() {
        let mut seq = NumberSequence::new("RE-");
        seq.issue(2024);
        seq.issue(2024);
        seq.advance_year(2025).unwrap();
        assert_eq!(seq.issue(2025), "RE-2025-001");
    }

    #[test]
    fn year_advance_rejects_past() {
        let mut seq = NumberSequence::new("RE-");
        seq.issue(2024);
        assert!(seq.advance_year(2023).is_err());
        assert!(seq.advance_year(2024).is_err());
    }

    #[test]
    fn auto_advance_year() {
        let mut seq = NumberSequence::new("RE-");
        assert!(!seq.auto_advance(date(2025, 1, 1)));
        seq.issue(2024);

        assert!(seq.auto_advance(date(2025, 1, 1)));
        assert_eq!(seq.issue(2025), "RE-2025-001");
        assert!(!seq.auto_advance(date(2025, 2, 1)));
        assert_eq!(seq.issue(2025), "RE-2025-002");
    }

    #[test]
    fn invoices_and_quotes_count_separately() {
        let mut numbering = DocumentNumbering::default();
        let d = date(2025, 3, 10);
        assert_eq!(numbering.next_for(DocType::Invoice, d), "RE-2025-001");
        assert_eq!(numbering.next_for(DocType::Quote, d), "AN-2025-001");
        assert_eq!(numbering.next_for(DocType::Invoice, d), "RE-2025-002");
        assert_eq!(numbering.peek_for(DocType::Quote, d), "AN-2025-002");
    }

    #[test]
    fn new_year_restarts_document_numbers() {
        let mut numbering = DocumentNumbering::default();
        numbering.next_for(DocType::Invoice, date(2024, 12, 31));
        assert_eq!(numbering.peek_for(DocType::Invoice, date(2025, 1, 2)), "RE-2025-001");
        assert_eq!(numbering.next_for(DocType::Invoice, date(2025, 1, 2)), "RE-2025-001");
        // Back-dated documents keep counting in the current sequence.
        assert_eq!(numbering.next_for(DocType::Invoice, date(2024, 12, 31)), "RE-2024-002");
        assert_eq!(numbering.next_for(DocType::Invoice, date(2025, 1, 3)), "RE-2025-003");
        assert_eq!(numbering.invoice.year(), Some(2025));
    }
}
