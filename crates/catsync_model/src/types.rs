//! Shared value types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A text value keyed by locale tag (`"en"`, `"de-DE"`, ...).
///
/// Locales are kept sorted so two strings with the same translations always
/// compare equal, regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedString(BTreeMap<String, String>);

impl LocalizedString {
    /// Creates an empty localized string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a localized string with a single translation.
    pub fn of(locale: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new().with(locale, value)
    }

    /// Adds (or replaces) a translation.
    pub fn with(mut self, locale: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(locale.into(), value.into());
        self
    }

    /// Returns the translation for `locale`.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Returns true if there are no translations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(locale, value)` pairs in locale order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (locale, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{locale}: {value}")?;
            first = false;
        }
        Ok(())
    }
}
