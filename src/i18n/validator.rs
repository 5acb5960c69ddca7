//! Catalog consistency validation.
//!
//! Compares one locale's catalog against the base catalog: keys that are
//! missing, keys that only exist in the locale, and messages whose
//! `{placeholder}` tokens drifted from the base message.

use crate::i18n::MessageCatalog;
use regex::Regex;
use std::sync::OnceLock;

/// A key whose placeholders differ between base and locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMismatch {
    pub key: String,
    /// Sorted placeholder tokens in the base message
    pub base: Vec<String>,
    /// Sorted placeholder tokens in the locale message
    pub locale: Vec<String>,
}

/// Validation report for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub locale: String,

    /// Base keys absent from this locale (failure)
    pub missing_keys: Vec<String>,

    /// Keys only present in this locale (warning)
    pub extra_keys: Vec<String>,

    /// Shared keys with differing placeholders (failure)
    pub placeholder_mismatches: Vec<PlaceholderMismatch>,

    /// Number of keys present in both catalogs
    pub shared_keys: usize,
}

impl ValidationReport {
    /// Create an empty report for `locale`
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            missing_keys: Vec::new(),
            extra_keys: Vec::new(),
            placeholder_mismatches: Vec::new(),
            shared_keys: 0,
        }
    }

    /// Missing keys or placeholder drift fail a locale; extra keys alone do not.
    pub fn has_errors(&self) -> bool {
        !self.missing_keys.is_empty() || !self.placeholder_mismatches.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.extra_keys.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Validator for message catalogs.
pub struct CatalogValidator;

// `{...}` with no nested braces
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl CatalogValidator {
    /// Validate `catalog` against `base`.
    pub fn validate(base: &MessageCatalog, catalog: &MessageCatalog) -> ValidationReport {
        let mut report = ValidationReport::new(&catalog.locale);

        for (key, base_value) in &base.messages {
            let Some(value) = catalog.get(key) else {
                report.missing_keys.push(key.clone());
                continue;
            };

            report.shared_keys += 1;

            let base_placeholders = Self::extract_placeholders(base_value);
            let placeholders = Self::extract_placeholders(value);
            if base_placeholders != placeholders {
                report.placeholder_mismatches.push(PlaceholderMismatch {
                    key: key.clone(),
                    base: base_placeholders,
                    locale: placeholders,
                });
            }
        }

        report.extra_keys = catalog
            .keys()
            .filter(|key| !base.contains_key(key))
            .map(str::to_string)
            .collect();

        report
    }

    /// Extract placeholder tokens (braces included), sorted.
    ///
    /// Repeated tokens are kept, so `{name} {name}` and `{name}` differ.
    pub fn extract_placeholders(template: &str) -> Vec<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{[^{}]+\}").unwrap());

        let mut tokens: Vec<String> = regex
            .find_iter(template)
            .map(|m| m.as_str().to_string())
            .collect();
        tokens.sort();
        tokens
    }
}
