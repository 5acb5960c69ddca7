//! Mapping between canonical (locale-free) paths and locale-prefixed paths.
//!
//! Every public page is reachable both as `/about` (default locale) and as
//! `/{locale}/about`. Routing, canonical links and the sitemap all rely on
//! `delocalize(localize(p, l)) == p` holding for every canonical path `p`.

use crate::i18n::{Locale, LocaleRegistry};
use std::sync::Arc;

/// A request path split into its locale and canonical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub locale: Locale,
    /// Whether the locale came from an explicit prefix rather than the default
    pub explicit: bool,
    pub path: String,
}

/// Stateless URL localizer over an injected registry.
#[derive(Debug, Clone)]
pub struct UrlLocalizer {
    registry: Arc<LocaleRegistry>,
}

impl UrlLocalizer {
    pub fn new(registry: Arc<LocaleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Prefix a canonical path with `/{locale}`.
    ///
    /// `/` maps to `/{locale}` without a trailing slash. A path missing its
    /// leading `/` is treated as root-relative.
    pub fn localize(&self, path: &str, locale: &Locale) -> String {
        localize_with_code(path, locale.code())
    }

    /// Strip a leading registered locale segment; anything else is returned
    /// unchanged, including unregistered prefixes such as `/xx/about`.
    pub fn delocalize(&self, path: &str) -> String {
        match self.split_prefix(path) {
            Some((_, rest)) if rest.is_empty() => "/".to_string(),
            Some((_, rest)) => rest.to_string(),
            None => path.to_string(),
        }
    }

    /// The registered locale prefixing `path`, if any.
    pub fn detect_locale(&self, path: &str) -> Option<Locale> {
        self.split_prefix(path)
            .map(|(code, _)| self.registry.locale(code))
            .and_then(Result::ok)
    }

    /// Resolve a request path to its locale (falling back to the default)
    /// and canonical path.
    pub fn resolve(&self, path: &str) -> ResolvedPath {
        match self.detect_locale(path) {
            Some(locale) => ResolvedPath {
                locale,
                explicit: true,
                path: self.delocalize(path),
            },
            None => ResolvedPath {
                locale: self.registry.default_locale(),
                explicit: false,
                path: path.to_string(),
            },
        }
    }

    /// The same page in another locale, whether or not `path` is already prefixed.
    pub fn switch_locale(&self, path: &str, target: &Locale) -> String {
        self.localize(&self.delocalize(path), target)
    }

    /// Split `/{code}/rest` into `(code, "/rest")` when `code` is registered.
    fn split_prefix<'a>(&self, path: &'a str) -> Option<(&'a str, &'a str)> {
        let trimmed = path.strip_prefix('/')?;
        let (segment, rest) = match trimmed.find('/') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
            None => (trimmed, ""),
        };

        self.registry.contains(segment).then_some((segment, rest))
    }
}

/// Shared by the localizer and by URL builders that only hold a code.
pub(crate) fn localize_with_code(path: &str, code: &str) -> String {
    if path.is_empty() || path == "/" {
        return format!("/{code}");
    }

    if path.starts_with('/') {
        format!("/{code}{path}")
    } else {
        format!("/{code}/{path}")
    }
}
