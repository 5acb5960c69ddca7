//! Generate sitemap.xml from the static page lists and published content.
//!
//! Usage:
//!   cargo run --bin generate-sitemap
//!
//! Optional environment variables:
//! - SITE_ORIGIN (defaults to https://balllightning.cloud)
//! - LOCALES / DEFAULT_LOCALE (defaults to en,sv,de,fr / en)
//! - CONTENT_DIR (defaults to src/data; reads blog/*.json and news/*.json)
//! - SITEMAP_OUTPUT (defaults to public/sitemap.xml)

use anyhow::{Context, Result};
use lightning_site::config::Config;
use lightning_site::content::FsContentRepository;
use lightning_site::sitemap::{self, SitemapGenerator};
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    lightning_site::init_tracing()?;

    let config = Config::from_env()?;
    let registry = Arc::new(config.locale_registry()?);

    info!("Generating sitemap.xml...");
    let generator = SitemapGenerator::new(&config.site_origin, registry.clone());
    let repo = FsContentRepository::new(&config.content_dir);

    let pages = sitemap::write_to_file(&generator, &repo, &config.sitemap_output)
        .context("Sitemap generation failed")?;

    info!(
        "✓ Sitemap written to {} ({} pages × {} locales)",
        config.sitemap_output.display(),
        pages,
        registry.len()
    );
    Ok(())
}
