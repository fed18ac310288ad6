//! Localized legal-note texts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{InvotaxError, Language};

const BUILTIN_DE: &str = include_str!("data/messages.de.json");
const BUILTIN_EN: &str = include_str!("data/messages.en.json");

/// Note category, one dictionary per category in each language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    SmallBusiness,
    ReverseCharge,
    DomesticStandard,
    Export,
}

/// Country-keyed note texts. Besides country codes, `EU` and `default` are fallbacks.
pub type NoteDictionary = BTreeMap<String, String>;

/// All texts of one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    /// Hint printed with every reverse-charge note.
    pub uid_hint: String,
    /// Appended to every note list.
    pub disclaimer: String,
    #[serde(default)]
    pub small_business: NoteDictionary,
    #[serde(default)]
    pub reverse_charge: NoteDictionary,
    #[serde(default)]
    pub domestic_standard: NoteDictionary,
    #[serde(default)]
    pub export: NoteDictionary,
}

impl Messages {
    pub fn from_json(json: &str) -> Result<Self, InvotaxError> {
        serde_json::from_str(json).map_err(|e| InvotaxError::Config(format!("messages: {e}")))
    }

    pub fn dictionary(&self, kind: NoteKind) -> &NoteDictionary {
        match kind {
            NoteKind::SmallBusiness => &self.small_business,
            NoteKind::ReverseCharge => &self.reverse_charge,
            NoteKind::DomesticStandard => &self.domestic_standard,
            NoteKind::Export => &self.export,
        }
    }

    /// First text found under `keys`, then `EU`, then `default`.
    pub fn note(&self, kind: NoteKind, keys: &[&str]) -> Option<&str> {
        let dict = self.dictionary(kind);
        keys.iter()
            .copied()
            .chain(["EU", "default"])
            .find_map(|key| dict.get(key))
            .map(String::as_str)
    }
}

/// German and English message sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    de: Messages,
    en: Messages,
}

impl MessageCatalog {
    pub fn new(de: Messages, en: Messages) -> Self {
        Self { de, en }
    }

    /// The catalogs shipped with the crate.
    pub fn builtin() -> Result<Self, InvotaxError> {
        Ok(Self::new(
            Messages::from_json(BUILTIN_DE)?,
            Messages::from_json(BUILTIN_EN)?,
        ))
    }

    pub fn get(&self, language: Language) -> &Messages {
        match language {
            Language::De => &self.de,
            Language::En => &self.en,
        }
    }
}
