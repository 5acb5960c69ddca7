//! Internationalization (i18n) module.
//!
//! Everything locale-related lives here: the registry of published locales,
//! the URL localizer that maps canonical paths to `/{locale}` paths and
//! back, and the message catalogs with their consistency validator.
//!
//! # Architecture
//!
//! - `registry`: ordered set of locales with one default, injected rather than global
//! - `locale`: validated `Locale` handle
//! - `localizer`: `localize` / `delocalize` and request path resolution
//! - `catalog`: per-locale message catalogs and the `CatalogSource` seam
//! - `validator`: missing keys, extra keys and placeholder drift
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lightning_site::i18n::{LocaleRegistry, UrlLocalizer};
//!
//! let registry = Arc::new(LocaleRegistry::default());
//! let localizer = UrlLocalizer::new(registry.clone());
//!
//! let sv = registry.locale("sv").unwrap();
//! assert_eq!(localizer.localize("/services", &sv), "/sv/services");
//! assert_eq!(localizer.delocalize("/sv/services"), "/services");
//! ```

mod catalog;
mod locale;
mod localizer;
mod registry;
mod validator;

pub use catalog::{CatalogLoadError, CatalogSource, FsCatalogSource, MessageCatalog, SCHEMA_KEY};
pub use locale::Locale;
pub(crate) use localizer::localize_with_code;
pub use localizer::{ResolvedPath, UrlLocalizer};
pub use registry::{LocaleConfig, LocaleError, LocaleRegistry};
pub use validator::{CatalogValidator, PlaceholderMismatch, ValidationReport};
