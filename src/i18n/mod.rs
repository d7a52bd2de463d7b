//! Localization module
//!
//! Static translation tables for Uzbek, Russian and English.

mod translations;

use serde::{Deserialize, Serialize};

pub use translations::Translations;

/// UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Uz,
    Ru,
    #[default]
    En,
}

impl Language {
    /// All languages in menu order
    pub const ALL: [Language; 3] = [Language::Uz, Language::Ru, Language::En];

    /// Short language code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Uz => "uz",
            Language::Ru => "ru",
            Language::En => "en",
        }
    }

    /// Name of the language in that language
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Uz => "O'zbek",
            Language::Ru => "Русский",
            Language::En => "English",
        }
    }

    /// Parse from a language code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Translation table for this language
    pub fn strings(&self) -> &'static Translations {
        match self {
            Language::Uz => &translations::UZ,
            Language::Ru => &translations::RU,
            Language::En => &translations::EN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("RU"), Some(Language::Ru));
        assert_eq!(Language::from_code("uz"), Some(Language::Uz));
        assert_eq!(Language::from_code("de"), None);
    }

    #[test]
    fn test_every_language_has_loading_messages() {
        for lang in Language::ALL {
            let t = lang.strings();
            assert!(t.loading_gen.len() >= 2, "{:?}", lang);
            assert!(t.loading_edit.len() >= 2, "{:?}", lang);
            assert!(!t.app_name.is_empty());
        }
    }
}
