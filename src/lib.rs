//! Locale routing, SEO output and content-integrity tooling for a
//! multi-locale consultancy site.

pub mod check;
pub mod config;
pub mod content;
pub mod feed;
pub mod i18n;
pub mod seo;
pub mod server;
pub mod sitemap;

/// Install the `tracing` subscriber shared by all binaries.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lightning_site=info".parse()?),
        )
        .init();
    Ok(())
}
