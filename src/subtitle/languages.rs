//! Language codes and per-language subtitle styles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display names and the codes used for file and style lookup.
const LANGUAGES: &[(&str, &str)] = &[
    ("English", "en"),
    ("Spanish", "es"),
    ("Bhasa", "id"),
    ("Hindi", "hi"),
    ("Malay", "ms"),
    ("Tamil", "ta"),
    ("Malayalam", "ml"),
    ("Kannada", "kn"),
    ("Marathi", "mr"),
    ("Gujarati", "gu"),
    ("Bhojpuri", "bho"),
];

/// Resolve a language name (`"Hindi"`) or code (`"hi"`) to its code.
///
/// Matching is case-insensitive. Unknown inputs yield `None`.
pub fn resolve_language_code(name_or_code: &str) -> Option<&'static str> {
    let needle = name_or_code.trim();
    LANGUAGES
        .iter()
        .find(|(name, code)| name.eq_ignore_ascii_case(needle) || code.eq_ignore_ascii_case(needle))
        .map(|(_, code)| *code)
}

/// All known `(name, code)` pairs.
pub fn known_languages() -> &'static [(&'static str, &'static str)] {
    LANGUAGES
}

/// Visual style of the `Default` ASS style for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleStyle {
    pub font_name: String,
    pub font_size: u32,
    /// ASS colour, `&HAABBGGRR`.
    pub primary_color: String,
}

impl SubtitleStyle {
    pub fn new(font_name: &str, font_size: u32, primary_color: &str) -> Self {
        Self {
            font_name: font_name.to_string(),
            font_size,
            primary_color: primary_color.to_string(),
        }
    }
}

/// Language code -> style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleTable(BTreeMap<String, SubtitleStyle>);

impl StyleTable {
    /// An empty table.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Styles shipped with reelsplice.
    pub fn builtin() -> Self {
        let devanagari = SubtitleStyle::new("Noto Sans Devanagari", 32, "&H0000FF00");
        let latin = SubtitleStyle::new("Noto Sans", 32, "&H0000FF00");

        let mut table = Self::empty();
        table
            .insert("hi", devanagari.clone())
            .insert("kn", SubtitleStyle::new("Noto Sans Kannada", 28, "&H00FFFFFF"))
            .insert("ta", SubtitleStyle::new("Noto Sans Tamil", 30, "&H00FFFF00"))
            .insert("ml", SubtitleStyle::new("Noto Sans Malayalam", 32, "&H0000FF00"))
            .insert("gu", SubtitleStyle::new("Noto Sans Gujarati", 32, "&H0000FF00"))
            .insert("mr", devanagari.clone())
            .insert("es", latin.clone())
            .insert("ms", latin.clone())
            .insert("id", latin)
            .insert("bho", devanagari);
        table
    }

    /// Add or replace the style for `code`.
    pub fn insert(&mut self, code: &str, style: SubtitleStyle) -> &mut Self {
        self.0.insert(code.to_ascii_lowercase(), style);
        self
    }

    /// Style for a language code, case-insensitive.
    pub fn get(&self, code: &str) -> Option<&SubtitleStyle> {
        self.0.get(&code.to_ascii_lowercase())
    }

    /// `overrides` layered on top of `self`.
    pub fn merged(mut self, overrides: &StyleTable) -> Self {
        for (code, style) in overrides.iter() {
            self.insert(code, style.clone());
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubtitleStyle)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::builtin()
    }
}
