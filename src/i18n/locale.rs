//! Locale type: a locale code that has been validated against a registry.

use serde::Serialize;
use std::fmt;

/// A validated locale.
///
/// Values are only handed out by [`LocaleRegistry`](crate::i18n::LocaleRegistry),
/// so holding a `Locale` means the code was registered when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locale {
    code: String,
}

impl Locale {
    pub(crate) fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
        }
    }

    /// The locale code (e.g. "en", "sv").
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.code
    }
}
