//! Published content metadata (blog and news posts).
//!
//! Generation code depends only on [`ContentRepository`]; the filesystem
//! implementation reads one JSON file per item from `{root}/blog` and
//! `{root}/news`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors reading content metadata. Any of these aborts generation.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed content file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("content file {}: missing required field '{field}'", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("content file {}: invalid timestamp '{value}' in '{field}'", path.display())]
    InvalidTimestamp {
        path: PathBuf,
        field: &'static str,
        value: String,
    },
}

/// Content collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Blog,
    News,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::News => "news",
        }
    }

    /// Canonical page path for an item of this kind.
    pub fn path_for(&self, slug: &str) -> String {
        format!("/{}/{}", self.as_str(), slug)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    #[serde(other)]
    Other,
}

/// Metadata of a published item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItemMeta {
    pub slug: String,
    pub kind: ContentKind,
    pub published_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub status: ContentStatus,
}

impl ContentItemMeta {
    /// Last modification: `updated_at`, else `published_at`.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.published_at)
    }

    pub fn path(&self) -> String {
        self.kind.path_for(&self.slug)
    }
}

/// Source of published content metadata.
pub trait ContentRepository: Send + Sync {
    /// Published items of `kind`, in a stable order.
    fn list_published(&self, kind: ContentKind) -> Result<Vec<ContentItemMeta>, ContentError>;
}

/// Only the publication gate; read before anything else so drafts are
/// never held to the published schema.
#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(default)]
    status: ContentStatus,
}

/// Raw shape of a published content file; unrecognised fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContentFile {
    slug: Option<String>,
    published_at: Option<String>,
    updated_at: Option<String>,
}

/// Reads `{root}/{kind}/*.json`.
#[derive(Debug, Clone)]
pub struct FsContentRepository {
    root: PathBuf,
}

impl FsContentRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn dir_for(&self, kind: ContentKind) -> PathBuf {
        self.root.join(kind.as_str())
    }
}

impl ContentRepository for FsContentRepository {
    fn list_published(&self, kind: ContentKind) -> Result<Vec<ContentItemMeta>, ContentError> {
        let dir = self.dir_for(kind);
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "content directory missing, no {} items", kind);
            return Ok(Vec::new());
        }

        let io_err = |source| ContentError::Io {
            path: dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        // read_dir order is platform dependent
        files.sort();

        let mut items = Vec::new();
        for path in files {
            let json = std::fs::read_to_string(&path).map_err(|source| ContentError::Io {
                path: path.clone(),
                source,
            })?;
            if let Some(item) = parse_content_file(kind, &json, &path)? {
                items.push(item);
            }
        }

        debug!(kind = %kind, count = items.len(), "loaded published content");
        Ok(items)
    }
}

/// Parse one content file. Returns `None` for unpublished items.
pub fn parse_content_file(
    kind: ContentKind,
    json: &str,
    path: &Path,
) -> Result<Option<ContentItemMeta>, ContentError> {
    let parse_err = |source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let RawStatus { status } = serde_json::from_str(json).map_err(parse_err)?;
    if status != ContentStatus::Published {
        return Ok(None);
    }
    let raw: RawContentFile = serde_json::from_str(json).map_err(parse_err)?;

    let slug = raw.slug.ok_or_else(|| ContentError::MissingField {
        path: path.to_path_buf(),
        field: "slug",
    })?;
    let published_raw = raw.published_at.ok_or_else(|| ContentError::MissingField {
        path: path.to_path_buf(),
        field: "publishedAt",
    })?;

    let published_at = parse_timestamp(&published_raw).ok_or_else(|| {
        ContentError::InvalidTimestamp {
            path: path.to_path_buf(),
            field: "publishedAt",
            value: published_raw.clone(),
        }
    })?;
    // A blank updatedAt means "never updated"
    let updated_at = match raw.updated_at.filter(|v| !v.trim().is_empty()) {
        Some(value) => Some(parse_timestamp(&value).ok_or_else(|| {
            ContentError::InvalidTimestamp {
                path: path.to_path_buf(),
                field: "updatedAt",
                value: value.clone(),
            }
        })?),
        None => None,
    };

    Ok(Some(ContentItemMeta {
        slug,
        kind,
        published_at,
        updated_at,
        status,
    }))
}

/// Accepts RFC 3339 timestamps, offset-less `YYYY-MM-DDTHH:MM:SS[.f]`
/// (read as UTC) or bare `YYYY-MM-DD` dates (UTC midnight).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    // %.f also matches an absent fractional part
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
