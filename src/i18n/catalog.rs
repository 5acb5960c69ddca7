//! Per-locale message catalogs and where they are loaded from.
//!
//! A catalog file is a flat JSON object mapping message keys to templates.
//! The optional `$schema` key is editor tooling metadata and is dropped on
//! load, so it never takes part in key comparisons.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Key carrying the JSON schema reference in catalog sources.
pub const SCHEMA_KEY: &str = "$schema";

/// Failure to obtain a usable catalog for a locale.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("message file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: top-level value must be an object", path.display())]
    NotAnObject { path: PathBuf },

    #[error("{}: value for key '{key}' must be a string", path.display())]
    NonStringValue { path: PathBuf, key: String },
}

/// Messages for one locale, keyed and ordered by message key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    pub locale: String,
    pub messages: BTreeMap<String, String>,
}

impl MessageCatalog {
    pub fn new(locale: impl Into<String>, messages: BTreeMap<String, String>) -> Self {
        let mut messages = messages;
        messages.remove(SCHEMA_KEY);
        Self {
            locale: locale.into(),
            messages,
        }
    }

    /// Parse catalog JSON. `origin` is only used in error messages.
    pub fn from_json(locale: &str, json: &str, origin: &Path) -> Result<Self, CatalogLoadError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|source| CatalogLoadError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;

        let serde_json::Value::Object(object) = value else {
            return Err(CatalogLoadError::NotAnObject {
                path: origin.to_path_buf(),
            });
        };

        let mut messages = BTreeMap::new();
        for (key, value) in object {
            if key == SCHEMA_KEY {
                continue;
            }
            match value {
                serde_json::Value::String(template) => {
                    messages.insert(key, template);
                }
                _ => {
                    return Err(CatalogLoadError::NonStringValue {
                        path: origin.to_path_buf(),
                        key,
                    })
                }
            }
        }

        Ok(Self::new(locale, messages))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Where catalogs come from. The checker only sees this trait.
pub trait CatalogSource {
    /// Locales that have a catalog available, sorted.
    fn available_locales(&self) -> Result<Vec<String>, CatalogLoadError>;

    /// Load the catalog for `locale`.
    fn load(&self, locale: &str) -> Result<MessageCatalog, CatalogLoadError>;
}

/// Catalogs stored as `{dir}/{locale}.json`.
#[derive(Debug, Clone)]
pub struct FsCatalogSource {
    dir: PathBuf,
}

impl FsCatalogSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.dir.join(format!("{locale}.json"))
    }
}

impl CatalogSource for FsCatalogSource {
    fn available_locales(&self) -> Result<Vec<String>, CatalogLoadError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => CatalogLoadError::NotFound {
                path: self.dir.clone(),
            },
            _ => CatalogLoadError::Io {
                path: self.dir.clone(),
                source,
            },
        })?;

        let mut locales = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CatalogLoadError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                locales.push(stem.to_string());
            }
        }

        locales.sort();
        debug!(dir = %self.dir.display(), count = locales.len(), "found message catalogs");
        Ok(locales)
    }

    fn load(&self, locale: &str) -> Result<MessageCatalog, CatalogLoadError> {
        let path = self.path_for(locale);
        let json = std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => CatalogLoadError::NotFound { path: path.clone() },
            _ => CatalogLoadError::Io {
                path: path.clone(),
                source,
            },
        })?;

        MessageCatalog::from_json(locale, &json, &path)
    }
}
