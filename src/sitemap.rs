//! Sitemap generation.
//!
//! Emits one `<url>` per (page × locale) with full hreflang alternates.
//! Output depends only on the page lists, the registry and content
//! metadata, so regenerating from unchanged input is byte-identical.

use crate::content::{ContentError, ContentKind, ContentRepository};
use crate::i18n::LocaleRegistry;
use crate::seo::Seo;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SitemapError>;

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// A canonical page to list in the sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDescriptor {
    /// Root-relative path without locale prefix
    pub path: String,
    pub changefreq: ChangeFreq,
    /// 0.0 to 1.0
    pub priority: f32,
    pub lastmod: Option<DateTime<Utc>>,
}

impl PageDescriptor {
    /// Priority is clamped to `[0.0, 1.0]`.
    pub fn new(path: impl Into<String>, changefreq: ChangeFreq, priority: f32) -> Self {
        Self {
            path: path.into(),
            changefreq,
            priority: priority.clamp(0.0, 1.0),
            lastmod: None,
        }
    }

    pub fn with_lastmod(mut self, lastmod: DateTime<Utc>) -> Self {
        self.lastmod = Some(lastmod);
        self
    }
}

/// Top-level marketing pages.
pub fn default_static_pages() -> Vec<PageDescriptor> {
    vec![
        PageDescriptor::new("/", ChangeFreq::Weekly, 1.0),
        PageDescriptor::new("/services", ChangeFreq::Monthly, 0.9),
        PageDescriptor::new("/technologies", ChangeFreq::Monthly, 0.8),
        PageDescriptor::new("/portfolio", ChangeFreq::Weekly, 0.9),
        PageDescriptor::new("/contact", ChangeFreq::Monthly, 0.7),
    ]
}

/// Portfolio case-study pages.
pub fn default_portfolio_pages() -> Vec<String> {
    [
        "/portfolio/chronomation",
        "/portfolio/the-builder-coil",
        "/portfolio/shipping-api-dojo",
        "/portfolio/jorild-se",
        "/portfolio/blightfell",
        "/portfolio/skyscraper",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

/// Sitemap generator.
#[derive(Debug, Clone)]
pub struct SitemapGenerator {
    seo: Seo,
    static_pages: Vec<PageDescriptor>,
    portfolio_pages: Vec<String>,
}

impl SitemapGenerator {
    /// Generator with the site's default page lists.
    pub fn new(origin: &str, registry: Arc<LocaleRegistry>) -> Self {
        Self {
            seo: Seo::new(origin, registry),
            static_pages: default_static_pages(),
            portfolio_pages: default_portfolio_pages(),
        }
    }

    pub fn with_pages(mut self, static_pages: Vec<PageDescriptor>, portfolio: Vec<String>) -> Self {
        self.static_pages = static_pages;
        self.portfolio_pages = portfolio;
        self
    }

    /// All pages in output order: static, portfolio, blog, news.
    pub fn collect_pages(&self, repo: &dyn ContentRepository) -> Result<Vec<PageDescriptor>> {
        let mut pages = self.static_pages.clone();

        pages.extend(
            self.portfolio_pages
                .iter()
                .map(|path| PageDescriptor::new(path.as_str(), ChangeFreq::Monthly, 0.7)),
        );

        for (kind, priority) in [(ContentKind::Blog, 0.8), (ContentKind::News, 0.7)] {
            let items = repo.list_published(kind)?;
            debug!(kind = %kind, count = items.len(), "adding content pages");
            pages.extend(items.iter().map(|item| {
                PageDescriptor::new(item.path(), ChangeFreq::Monthly, priority)
                    .with_lastmod(item.last_modified())
            }));
        }

        Ok(pages)
    }

    /// Generate the sitemap document.
    pub fn generate(&self, repo: &dyn ContentRepository) -> Result<String> {
        let pages = self.collect_pages(repo)?;
        Ok(self.render(&pages))
    }

    /// Render pages to XML.
    pub fn render(&self, pages: &[PageDescriptor]) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            "<urlset xmlns=\"{SITEMAP_NS}\"\n        xmlns:xhtml=\"{XHTML_NS}\">\n"
        ));

        for page in pages {
            self.push_page(&mut xml, page);
        }

        xml.push_str("</urlset>\n");
        xml
    }

    fn push_page(&self, xml: &mut String, page: &PageDescriptor) {
        let alternates = self.seo.alternates(&page.path);

        for locale in self.seo.registry().locales() {
            xml.push_str("  <url>\n");
            xml.push_str(&format!(
                "    <loc>{}</loc>\n",
                escape_xml(&self.seo.localized_url(&page.path, &locale))
            ));
            if let Some(lastmod) = &page.lastmod {
                xml.push_str(&format!(
                    "    <lastmod>{}</lastmod>\n",
                    lastmod.format("%Y-%m-%d")
                ));
            }
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                page.changefreq.as_str()
            ));
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", page.priority));

            for alt in &alternates {
                xml.push_str(&format!(
                    "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\" />\n",
                    escape_xml(&alt.hreflang),
                    escape_xml(&alt.href)
                ));
            }

            xml.push_str("  </url>\n");
        }
    }
}

/// Generate and write to `writer`. Nothing is written if generation fails.
pub fn run<W: Write>(
    generator: &SitemapGenerator,
    repo: &dyn ContentRepository,
    writer: &mut W,
) -> Result<usize> {
    let pages = generator.collect_pages(repo)?;
    let xml = generator.render(&pages);
    writer.write_all(xml.as_bytes())?;
    Ok(pages.len())
}

/// Write the sitemap through a sibling temp file and rename it into place,
/// so an existing sitemap is never left half-written.
pub fn write_to_file(
    generator: &SitemapGenerator,
    repo: &dyn ContentRepository,
    path: &Path,
) -> Result<usize> {
    let pages = generator.collect_pages(repo)?;
    let xml = generator.render(&pages);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, xml.as_bytes())?;
    std::fs::rename(&tmp, path)?;

    info!(
        path = %path.display(),
        pages = pages.len(),
        "sitemap written"
    );
    Ok(pages.len())
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{parse_timestamp, ContentItemMeta, ContentStatus};

    struct StubRepo {
        blog: Vec<ContentItemMeta>,
        news: Vec<ContentItemMeta>,
    }

    impl ContentRepository for StubRepo {
        fn list_published(
            &self,
            kind: ContentKind,
        ) -> std::result::Result<Vec<ContentItemMeta>, ContentError> {
            Ok(match kind {
                ContentKind::Blog => self.blog.clone(),
                ContentKind::News => self.news.clone(),
            })
        }
    }

    fn item(kind: ContentKind, slug: &str, published: &str, updated: Option<&str>) -> ContentItemMeta {
        ContentItemMeta {
            slug: slug.to_string(),
            kind,
            published_at: parse_timestamp(published).unwrap(),
            updated_at: updated.and_then(parse_timestamp),
            status: ContentStatus::Published,
        }
    }

    struct FailingRepo;

    impl ContentRepository for FailingRepo {
        fn list_published(
            &self,
            _kind: ContentKind,
        ) -> std::result::Result<Vec<ContentItemMeta>, ContentError> {
            Err(ContentError::MissingField {
                path: "bad.json".into(),
                field: "slug",
            })
        }
    }

    fn generator() -> SitemapGenerator {
        SitemapGenerator::new("https://example.com", Arc::new(LocaleRegistry::default()))
    }

    fn empty_repo() -> StubRepo {
        StubRepo {
            blog: vec![],
            news: vec![],
        }
    }

    #[test]
    fn test_priority_clamped() {
        assert_eq!(PageDescriptor::new("/", ChangeFreq::Daily, 1.5).priority, 1.0);
        assert_eq!(PageDescriptor::new("/", ChangeFreq::Daily, -0.2).priority, 0.0);
    }

    #[test]
    fn test_header_and_namespaces() {
        let xml = generator().generate(&empty_repo()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset"));
        assert!(xml.contains("xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\""));
        assert!(xml.contains("xmlns:xhtml=\"http://www.w3.org/1999/xhtml\""));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_one_url_per_page_and_locale() {
        let xml = generator().generate(&empty_repo()).unwrap();
        // 5 static + 6 portfolio pages, 4 locales
        assert_eq!(xml.matches("<url>").count(), 11 * 4);
    }

    #[test]
    fn test_root_entry() {
        let xml = generator().generate(&empty_repo()).unwrap();
        let expected = "  <url>\n    <loc>https://example.com/sv</loc>\n    \
            <changefreq>weekly</changefreq>\n    <priority>1.0</priority>\n    \
            <xhtml:link rel=\"alternate\" hreflang=\"en\" href=\"https://example.com/en\" />\n    \
            <xhtml:link rel=\"alternate\" hreflang=\"sv\" href=\"https://example.com/sv\" />\n    \
            <xhtml:link rel=\"alternate\" hreflang=\"de\" href=\"https://example.com/de\" />\n    \
            <xhtml:link rel=\"alternate\" hreflang=\"fr\" href=\"https://example.com/fr\" />\n    \
            <xhtml:link rel=\"alternate\" hreflang=\"x-default\" href=\"https://example.com/en\" />\n  \
            </url>\n";
        assert!(xml.contains(expected), "missing root entry in:\n{xml}");
    }

    #[test]
    fn test_every_url_has_locales_plus_one_alternates() {
        let repo = StubRepo {
            blog: vec![item(ContentKind::Blog, "a", "2024-01-01", None)],
            news: vec![item(ContentKind::News, "b", "2024-01-02", None)],
        };
        let xml = generator().generate(&repo).unwrap();

        for block in xml.split("<url>").skip(1) {
            assert_eq!(block.matches("<xhtml:link").count(), 5);
            assert_eq!(block.matches("hreflang=\"x-default\"").count(), 1);
        }
    }

    #[test]
    fn test_groups_in_order() {
        let repo = StubRepo {
            blog: vec![item(ContentKind::Blog, "post", "2024-01-01", None)],
            news: vec![item(ContentKind::News, "update", "2024-01-02", None)],
        };
        let pages = generator().collect_pages(&repo).unwrap();
        let paths: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();

        assert_eq!(paths[0], "/");
        assert_eq!(paths[4], "/contact");
        assert_eq!(paths[5], "/portfolio/chronomation");
        assert_eq!(paths[10], "/portfolio/skyscraper");
        assert_eq!(paths[11], "/blog/post");
        assert_eq!(paths[12], "/news/update");
    }

    #[test]
    fn test_content_lastmod_and_priority() {
        let repo = StubRepo {
            blog: vec![item(
                ContentKind::Blog,
                "post",
                "2024-01-01T09:00:00Z",
                Some("2024-03-10T23:59:00Z"),
            )],
            news: vec![item(ContentKind::News, "update", "2024-02-02T12:00:00+01:00", None)],
        };
        let xml = generator().generate(&repo).unwrap();

        assert!(xml.contains(
            "<loc>https://example.com/de/blog/post</loc>\n    <lastmod>2024-03-10</lastmod>\n    \
             <changefreq>monthly</changefreq>\n    <priority>0.8</priority>"
        ));
        assert!(xml.contains(
            "<loc>https://example.com/fr/news/update</loc>\n    <lastmod>2024-02-02</lastmod>\n    \
             <changefreq>monthly</changefreq>\n    <priority>0.7</priority>"
        ));
        // static pages carry no lastmod
        assert_eq!(xml.matches("<lastmod>").count(), 2 * 4);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let repo = StubRepo {
            blog: vec![item(ContentKind::Blog, "a", "2024-01-01", None)],
            news: vec![],
        };
        let g = generator();
        assert_eq!(g.generate(&repo).unwrap(), g.generate(&repo).unwrap());
    }

    #[test]
    fn test_custom_pages_and_registry() {
        let registry = LocaleRegistry::from_codes(&["en", "sv"], "en").unwrap();
        let g = SitemapGenerator::new("https://example.com", Arc::new(registry)).with_pages(
            vec![PageDescriptor::new("/a&b", ChangeFreq::Yearly, 0.3)],
            vec![],
        );
        let xml = g.generate(&empty_repo()).unwrap();

        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<loc>https://example.com/en/a&amp;b</loc>"));
        assert!(xml.contains("<changefreq>yearly</changefreq>\n    <priority>0.3</priority>"));
        assert_eq!(xml.matches("<xhtml:link").count(), 2 * 3);
    }

    #[test]
    fn test_run_writes_nothing_on_content_error() {
        let mut out = Vec::new();
        let err = run(&generator(), &FailingRepo, &mut out).unwrap_err();
        assert!(matches!(err, SitemapError::Content(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_to_file_is_repeatable_and_keeps_previous_on_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("public").join("sitemap.xml");

        let pages = write_to_file(&generator(), &empty_repo(), &path).unwrap();
        assert_eq!(pages, 11);
        let first = std::fs::read_to_string(&path).unwrap();

        write_to_file(&generator(), &empty_repo(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);

        assert!(write_to_file(&generator(), &FailingRepo, &path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
        assert!(!dir.path().join("public").join("sitemap.xml.tmp").exists());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&apos;");
    }
}
