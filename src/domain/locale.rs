// Locale tag and the number symbols it implies
use super::number_format::NumberSymbols;
use serde::Deserialize;

/// Languages that write decimals with a comma and group with a period.
const COMMA_DECIMAL_LANGUAGES: &[&str] = &[
    "cs", "da", "de", "el", "es", "fi", "fr", "hu", "id", "it", "nb", "nl", "no", "pl", "pt",
    "ro", "ru", "sv", "tr", "uk",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Default for Locale {
    fn default() -> Self {
        Self("en".to_string())
    }
}

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn tag(&self) -> &str {
        &self.0
    }

    /// `"de_DE"` and `"de-AT"` both give `"de"`.
    pub fn language(&self) -> String {
        self.0
            .split(['_', '-'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    pub fn symbols(&self) -> NumberSymbols {
        if COMMA_DECIMAL_LANGUAGES.contains(&self.language().as_str()) {
            NumberSymbols {
                decimal: ',',
                grouping: '.',
            }
        } else {
            NumberSymbols::default()
        }
    }
}
