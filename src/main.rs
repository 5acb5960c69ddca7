use anyhow::{Context, Result};
use lightning_site::config::Config;
use lightning_site::content::FsContentRepository;
use lightning_site::feed::FeedClient;
use lightning_site::i18n::UrlLocalizer;
use lightning_site::seo::Seo;
use lightning_site::server::{self, AppState};
use lightning_site::sitemap::SitemapGenerator;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    lightning_site::init_tracing()?;

    let config = Config::from_env()?;
    let registry = Arc::new(config.locale_registry()?);
    info!(
        "Locales: {} (default {})",
        registry.codes().join(", "),
        registry.default_locale()
    );

    let state = AppState {
        localizer: UrlLocalizer::new(registry.clone()),
        seo: Seo::new(&config.site_origin, registry.clone()),
        sitemap: SitemapGenerator::new(&config.site_origin, registry),
        content: Arc::new(FsContentRepository::new(&config.content_dir)),
        feed: FeedClient::new(&config.feed_url, config.feed_timeout)
            .context("Failed to build feed HTTP client")?,
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, server::app(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
