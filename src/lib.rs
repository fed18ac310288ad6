//! # invotax
//!
//! Tax resolution and document math for a small-business invoicing app
//! selling within and out of the EU.
//!
//! Given the seller/buyer countries, the business type, the buyer's VAT ID and
//! the seller's small-business election, the crate decides the VAT scheme
//! (standard, reverse charge or exempt), computes document totals with a
//! per-rate breakdown, and produces the localized legal notes a compliant
//! invoice has to carry.
//!
//! All monetary values use [`rust_decimal::Decimal`] and are rounded once, at
//! output, to two decimal places.
//!
//! ## Quick Start
//!
//! ```rust
//! use invotax::core::*;
//! use invotax::vat::{resolve_scheme, build_legal_notes, summarize_tax_badge};
//! use rust_decimal_macros::dec;
//!
//! let ctx = TaxContext::new("AT", "AT", BusinessType::B2C);
//! let scheme = resolve_scheme(&ctx);
//! assert_eq!(scheme, TaxScheme::Standard);
//!
//! let lines = [DocLine::new(dec!(2), dec!(100), dec!(20))];
//! let result = totals(&lines, scheme);
//! assert_eq!(result.total_gross, dec!(240.00));
//!
//! assert_eq!(summarize_tax_badge(&ctx).label, "20%");
//! assert!(!build_legal_notes(&ctx).is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document types, VAT-ID plausibility, totals, validation, numbering, formatting |
//! | `vat` (default) | Tax rules table, scheme resolver, legal notes, badges, [`vat::TaxEngine`] |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "vat")]
pub mod vat;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
