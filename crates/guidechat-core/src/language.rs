//! Languages offered to the user

use guidechat_api::LanguageCode;
use serde::{Deserialize, Serialize};

/// A selectable language: the code sent to the backend and its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: LanguageCode,
    pub name: String,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: LanguageCode::new(code),
            name: name.into(),
        }
    }
}

/// The fixed list of languages a widget instance accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCatalog {
    languages: Vec<Language>,
}

impl LanguageCatalog {
    /// Build a catalog; falls back to the defaults when `languages` is empty
    pub fn new(languages: Vec<Language>) -> Self {
        if languages.is_empty() {
            return Self::default();
        }
        Self { languages }
    }

    pub fn find(&self, code: &LanguageCode) -> Option<&Language> {
        self.languages.iter().find(|l| &l.code == code)
    }

    pub fn position(&self, code: &LanguageCode) -> Option<usize> {
        self.languages.iter().position(|l| &l.code == code)
    }

    pub fn get(&self, index: usize) -> Option<&Language> {
        self.languages.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self {
            languages: default_languages(),
        }
    }
}

/// English plus the major Indian languages the backend translates into
pub fn default_languages() -> Vec<Language> {
    [
        ("en", "English"),
        ("hi", "Hindi"),
        ("bn", "Bengali"),
        ("te", "Telugu"),
        ("mr", "Marathi"),
        ("ta", "Tamil"),
        ("gu", "Gujarati"),
        ("kn", "Kannada"),
        ("ml", "Malayalam"),
        ("pa", "Punjabi"),
    ]
    .into_iter()
    .map(|(code, name)| Language::new(code, name))
    .collect()
}
