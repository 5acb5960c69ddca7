//! Check message catalogs against the base locale.
//!
//! Reports missing keys, extra keys and `{placeholder}` mismatches for every
//! locale. Exits 1 when any locale fails or the base catalog is unusable.
//!
//! Usage:
//!   cargo run --bin i18n-check
//!
//! Optional environment variables:
//! - MESSAGES_DIR (defaults to messages)
//! - LOCALES / DEFAULT_LOCALE (the default locale is the base)

use anyhow::Result;
use lightning_site::check;
use lightning_site::config::Config;
use lightning_site::i18n::FsCatalogSource;
use tracing::error;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    lightning_site::init_tracing()?;

    let config = Config::from_env()?;
    let registry = config.locale_registry()?;
    let base = registry.default_config().code.clone();
    let source = FsCatalogSource::new(&config.messages_dir);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match check::run(&source, &base, &registry.codes(), &mut out) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            error!("{}", e);
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    }
}
