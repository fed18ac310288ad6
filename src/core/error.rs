use thiserror::Error;

/// Errors that can occur while loading tax configuration or building documents.
///
/// The calculation functions themselves are total and never return these.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvotaxError {
    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A rules table or message catalog could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Document number sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),
}

impl InvotaxError {
    /// Collapse a list of findings into a single `Validation` error.
    pub fn from_findings(findings: &[ValidationError]) -> Self {
        let joined = findings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(joined)
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "client.vat_id").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Legal reference or rule ID if applicable (e.g. "§19 UStG").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a rule reference.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}
