use crate::feed::{DEFAULT_FEED_TIMEOUT, DEFAULT_FEED_URL};
use crate::i18n::LocaleRegistry;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Site
    pub site_origin: String,

    // Locales
    pub locales: Vec<String>,
    pub default_locale: String,

    // Data locations
    pub messages_dir: PathBuf,
    pub content_dir: PathBuf,
    pub sitemap_output: PathBuf,

    // Content feed
    pub feed_url: String,
    pub feed_timeout: Duration,

    // Server
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_origin: "https://balllightning.cloud".to_string(),
            locales: ["en", "sv", "de", "fr"].iter().map(|s| s.to_string()).collect(),
            default_locale: "en".to_string(),
            messages_dir: PathBuf::from("messages"),
            content_dir: PathBuf::from("src/data"),
            sitemap_output: PathBuf::from("public/sitemap.xml"),
            feed_url: DEFAULT_FEED_URL.to_string(),
            feed_timeout: DEFAULT_FEED_TIMEOUT,
            port: 3000,
        }
    }
}

impl Config {
    /// Read configuration from the environment; every setting has a default.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            site_origin: std::env::var("SITE_ORIGIN")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.site_origin),

            locales: std::env::var("LOCALES")
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.locales),
            default_locale: std::env::var("DEFAULT_LOCALE").unwrap_or(defaults.default_locale),

            messages_dir: std::env::var("MESSAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.messages_dir),
            content_dir: std::env::var("CONTENT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.content_dir),
            sitemap_output: std::env::var("SITEMAP_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.sitemap_output),

            feed_url: std::env::var("FEED_URL").unwrap_or(defaults.feed_url),
            feed_timeout: std::env::var("FEED_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.feed_timeout),

            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
        };

        // Fail at startup rather than on first use
        config.locale_registry()?;
        Ok(config)
    }

    /// Build the locale registry described by `locales` / `default_locale`.
    pub fn locale_registry(&self) -> Result<LocaleRegistry> {
        LocaleRegistry::from_codes(&self.locales, &self.default_locale)
            .context("invalid LOCALES / DEFAULT_LOCALE configuration")
    }
}
