//! Locale registry: the ordered set of locales the site is published in.
//!
//! The registry is an immutable value built once from configuration and
//! passed (usually behind an `Arc`) to every component that needs it. The
//! first-class ordering matters: sitemap blocks and hreflang alternates are
//! emitted in registry order.

use crate::i18n::Locale;
use thiserror::Error;

/// Errors raised while building a registry or resolving a code against it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("locale registry must contain at least one locale")]
    Empty,

    #[error("locale '{0}' is registered more than once")]
    Duplicate(String),

    #[error("default locale '{0}' is not in the registry")]
    UnknownDefault(String),

    #[error("unknown locale code: '{0}'")]
    Unknown(String),

    #[error("invalid locale code: '{0}'")]
    InvalidCode(String),
}

/// Metadata for one supported locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    /// Short code used in URLs and catalog file names (e.g. "en", "sv")
    pub code: String,

    /// English name (e.g. "Swedish")
    pub name: String,

    /// Name in the locale itself, shown in the language switcher (e.g. "Svenska")
    pub native_name: String,

    /// Flag glyph shown next to the native name
    pub flag: String,
}

impl LocaleConfig {
    /// Build a config for `code`, filling labels from the known-locale table
    /// and falling back to the code itself for unknown locales.
    pub fn for_code(code: &str) -> Self {
        match KNOWN_LOCALES.iter().find(|(c, ..)| *c == code) {
            Some((_, name, native_name, flag)) => Self {
                code: code.to_string(),
                name: name.to_string(),
                native_name: native_name.to_string(),
                flag: flag.to_string(),
            },
            None => Self {
                code: code.to_string(),
                name: code.to_string(),
                native_name: code.to_string(),
                flag: String::new(),
            },
        }
    }
}

/// Labels for locales the site has shipped in.
const KNOWN_LOCALES: &[(&str, &str, &str, &str)] = &[
    ("en", "English", "English", "🇬🇧"),
    ("sv", "Swedish", "Svenska", "🇸🇪"),
    ("de", "German", "Deutsch", "🇩🇪"),
    ("fr", "French", "Français", "🇫🇷"),
];

/// Ordered, non-empty set of locales with exactly one default.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    default_index: usize,
}

impl LocaleRegistry {
    /// Build a registry from locale configs, validating the invariants.
    ///
    /// # Errors
    /// * `LocaleError::Empty` if `locales` is empty
    /// * `LocaleError::InvalidCode` if a code is empty or contains `/`
    /// * `LocaleError::Duplicate` if a code appears twice
    /// * `LocaleError::UnknownDefault` if `default_code` is not among them
    pub fn new(locales: Vec<LocaleConfig>, default_code: &str) -> Result<Self, LocaleError> {
        if locales.is_empty() {
            return Err(LocaleError::Empty);
        }

        for (i, locale) in locales.iter().enumerate() {
            if locale.code.is_empty() || locale.code.contains('/') {
                return Err(LocaleError::InvalidCode(locale.code.clone()));
            }
            if locales[..i].iter().any(|other| other.code == locale.code) {
                return Err(LocaleError::Duplicate(locale.code.clone()));
            }
        }

        let default_index = locales
            .iter()
            .position(|locale| locale.code == default_code)
            .ok_or_else(|| LocaleError::UnknownDefault(default_code.to_string()))?;

        Ok(Self {
            locales,
            default_index,
        })
    }

    /// Build a registry from bare codes, using known labels where available.
    pub fn from_codes<S: AsRef<str>>(codes: &[S], default_code: &str) -> Result<Self, LocaleError> {
        let locales = codes
            .iter()
            .map(|code| LocaleConfig::for_code(code.as_ref().trim()))
            .collect();
        Self::new(locales, default_code)
    }

    /// Get a locale configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Check if a code is registered.
    pub fn contains(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// Resolve a code to a validated `Locale`.
    pub fn locale(&self, code: &str) -> Result<Locale, LocaleError> {
        self.get_by_code(code)
            .map(|config| Locale::new(&config.code))
            .ok_or_else(|| LocaleError::Unknown(code.to_string()))
    }

    /// All locales, in registry order.
    pub fn list(&self) -> &[LocaleConfig] {
        &self.locales
    }

    /// All locales as validated handles, in registry order.
    pub fn locales(&self) -> Vec<Locale> {
        self.locales.iter().map(|c| Locale::new(&c.code)).collect()
    }

    /// Registered codes, in registry order.
    pub fn codes(&self) -> Vec<&str> {
        self.locales.iter().map(|c| c.code.as_str()).collect()
    }

    /// The default locale's configuration.
    ///
    /// The default locale is also the base locale for catalog validation and
    /// the `x-default` hreflang target.
    pub fn default_config(&self) -> &LocaleConfig {
        &self.locales[self.default_index]
    }

    /// The default locale.
    pub fn default_locale(&self) -> Locale {
        Locale::new(&self.default_config().code)
    }

    /// Number of registered locales.
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    /// Always false for a constructed registry; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

impl Default for LocaleRegistry {
    /// English (default), Swedish, German, French.
    fn default() -> Self {
        Self {
            locales: KNOWN_LOCALES
                .iter()
                .map(|(code, ..)| LocaleConfig::for_code(code))
                .collect(),
            default_index: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_order() {
        let registry = LocaleRegistry::default();
        assert_eq!(registry.codes(), vec!["en", "sv", "de", "fr"]);
        assert_eq!(registry.default_locale().code(), "en");
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_get_by_code_swedish() {
        let registry = LocaleRegistry::default();
        let config = registry.get_by_code("sv").expect("sv is registered");

        assert_eq!(config.name, "Swedish");
        assert_eq!(config.native_name, "Svenska");
        assert_eq!(config.flag, "🇸🇪");
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        let registry = LocaleRegistry::default();
        assert!(registry.get_by_code("es").is_none());
        assert!(!registry.contains("es"));
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        let registry = LocaleRegistry::default();
        assert!(!registry.contains("EN"));
    }

    #[test]
    fn test_from_codes_with_unknown_locale_uses_code_as_label() {
        let registry = LocaleRegistry::from_codes(&["en", "nb"], "en").unwrap();
        let config = registry.get_by_code("nb").unwrap();

        assert_eq!(config.name, "nb");
        assert_eq!(config.native_name, "nb");
        assert!(config.flag.is_empty());
    }

    #[test]
    fn test_from_codes_trims_whitespace() {
        let registry = LocaleRegistry::from_codes(&["en", " sv "], "en").unwrap();
        assert_eq!(registry.codes(), vec!["en", "sv"]);
    }

    #[test]
    fn test_non_first_default() {
        let registry = LocaleRegistry::from_codes(&["en", "sv"], "sv").unwrap();
        assert_eq!(registry.default_locale().code(), "sv");
        // Order is unaffected by which locale is the default
        assert_eq!(registry.codes(), vec!["en", "sv"]);
    }

    #[test]
    fn test_empty_registry_rejected() {
        let codes: [&str; 0] = [];
        let err = LocaleRegistry::from_codes(&codes, "en").unwrap_err();
        assert_eq!(err, LocaleError::Empty);
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let err = LocaleRegistry::from_codes(&["en", "sv", "en"], "en").unwrap_err();
        assert_eq!(err, LocaleError::Duplicate("en".to_string()));
    }

    #[test]
    fn test_unknown_default_rejected() {
        let err = LocaleRegistry::from_codes(&["en", "sv"], "de").unwrap_err();
        assert_eq!(err, LocaleError::UnknownDefault("de".to_string()));
    }

    #[test]
    fn test_invalid_code_rejected() {
        let err = LocaleRegistry::from_codes(&["en", "s/v"], "en").unwrap_err();
        assert_eq!(err, LocaleError::InvalidCode("s/v".to_string()));

        let err = LocaleRegistry::from_codes(&["en", ""], "en").unwrap_err();
        assert_eq!(err, LocaleError::InvalidCode(String::new()));
    }

    #[test]
    fn test_locale_resolution() {
        let registry = LocaleRegistry::default();
        assert_eq!(registry.locale("de").unwrap().code(), "de");
        assert_eq!(
            registry.locale("xx").unwrap_err(),
            LocaleError::Unknown("xx".to_string())
        );
    }
}
