//! Batch i18n consistency check.
//!
//! Validates every non-base locale against the base catalog and writes a
//! human-readable report. Each locale is checked independently and all of
//! them are reported before the verdict; only a missing or broken base
//! catalog stops the run early.

use crate::i18n::{CatalogLoadError, CatalogSource, CatalogValidator, ValidationReport};
use std::collections::BTreeSet;
use std::io::Write;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort the whole check.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("base catalog unusable: {0}")]
    Base(#[source] CatalogLoadError),

    #[error("cannot list message catalogs: {0}")]
    Listing(#[source] CatalogLoadError),

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Result of checking a single locale.
#[derive(Debug)]
pub enum LocaleOutcome {
    Checked(ValidationReport),
    LoadFailed {
        locale: String,
        error: CatalogLoadError,
    },
}

impl LocaleOutcome {
    pub fn locale(&self) -> &str {
        match self {
            Self::Checked(report) => &report.locale,
            Self::LoadFailed { locale, .. } => locale,
        }
    }

    pub fn is_failing(&self) -> bool {
        match self {
            Self::Checked(report) => report.has_errors(),
            Self::LoadFailed { .. } => true,
        }
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Checked(report) => Some(report),
            Self::LoadFailed { .. } => None,
        }
    }
}

/// Outcome of a full check run.
#[derive(Debug)]
pub struct CheckOutcome {
    pub base_locale: String,
    pub base_keys: usize,
    pub locales: Vec<LocaleOutcome>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        !self.locales.iter().any(LocaleOutcome::is_failing)
    }

    /// Process exit code: 0 when every locale passes, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    pub fn failing_locales(&self) -> Vec<&str> {
        self.locales
            .iter()
            .filter(|o| o.is_failing())
            .map(LocaleOutcome::locale)
            .collect()
    }

    pub fn outcome_for(&self, locale: &str) -> Option<&LocaleOutcome> {
        self.locales.iter().find(|o| o.locale() == locale)
    }
}

/// Run the check.
///
/// Locales checked are every catalog the source offers plus every locale in
/// `expected` (a registered locale without a catalog is reported as a load
/// failure), minus `base_locale`.
pub fn run<W: Write>(
    source: &dyn CatalogSource,
    base_locale: &str,
    expected: &[&str],
    out: &mut W,
) -> Result<CheckOutcome, CheckError> {
    writeln!(out, "🌐 i18n QA Check\n")?;

    let available = source.available_locales().map_err(CheckError::Listing)?;
    let base = source.load(base_locale).map_err(CheckError::Base)?;

    let others: Vec<String> = available
        .iter()
        .map(String::as_str)
        .chain(expected.iter().copied())
        .filter(|locale| *locale != base_locale)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    writeln!(out, "Base locale: {} ({} keys)", base_locale, base.len())?;
    writeln!(out, "Other locales: {}\n", others.join(", "))?;

    let mut outcomes = Vec::with_capacity(others.len());
    for locale in others {
        let outcome = match source.load(&locale) {
            Ok(catalog) => LocaleOutcome::Checked(CatalogValidator::validate(&base, &catalog)),
            Err(error) => {
                warn!(locale = %locale, error = %error, "catalog failed to load");
                LocaleOutcome::LoadFailed { locale, error }
            }
        };
        write_locale_report(out, &outcome)?;
        outcomes.push(outcome);
    }

    let outcome = CheckOutcome {
        base_locale: base_locale.to_string(),
        base_keys: base.len(),
        locales: outcomes,
    };

    if outcome.passed() {
        writeln!(out, "✅ i18n check PASSED")?;
    } else {
        writeln!(out, "❌ i18n check FAILED")?;
    }
    info!(
        passed = outcome.passed(),
        failing = ?outcome.failing_locales(),
        "i18n check finished"
    );

    Ok(outcome)
}

fn write_locale_report<W: Write>(out: &mut W, outcome: &LocaleOutcome) -> std::io::Result<()> {
    let report = match outcome {
        LocaleOutcome::Checked(report) => report,
        LocaleOutcome::LoadFailed { locale, error } => {
            writeln!(out, "❌ [{locale}] {error}\n")?;
            return Ok(());
        }
    };
    let locale = &report.locale;

    if !report.missing_keys.is_empty() {
        writeln!(out, "❌ [{locale}] Missing {} key(s):", report.missing_keys.len())?;
        for key in &report.missing_keys {
            writeln!(out, "   - {key}")?;
        }
    }

    if !report.extra_keys.is_empty() {
        writeln!(
            out,
            "⚠️  [{locale}] Extra {} key(s) not in base:",
            report.extra_keys.len()
        )?;
        for key in &report.extra_keys {
            writeln!(out, "   - {key}")?;
        }
    }

    if !report.placeholder_mismatches.is_empty() {
        writeln!(
            out,
            "❌ [{locale}] Placeholder mismatch in {} key(s):",
            report.placeholder_mismatches.len()
        )?;
        for mismatch in &report.placeholder_mismatches {
            writeln!(
                out,
                "   - {}: base=[{}] {locale}=[{}]",
                mismatch.key,
                mismatch.base.join(", "),
                mismatch.locale.join(", ")
            )?;
        }
    }

    if report.is_clean() {
        writeln!(out, "✅ [{locale}] All {} keys OK", report.shared_keys)?;
    }

    writeln!(out)
}
