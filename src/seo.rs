//! Canonical URLs, hreflang alternates and JSON-LD structured data.

use crate::content::ContentKind;
use crate::i18n::{localize_with_code, Locale, LocaleRegistry};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// `hreflang` value pointing search engines at the fallback variant.
pub const X_DEFAULT: &str = "x-default";

/// One `<link rel="alternate">` target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternateLink {
    pub rel: &'static str,
    pub hreflang: String,
    pub href: String,
}

/// Head metadata for one page in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageHead {
    pub locale: Locale,
    pub path: String,
    pub canonical: String,
    pub alternates: Vec<AlternateLink>,
}

/// Who publishes the site.
#[derive(Debug, Clone)]
pub struct SiteIdentity {
    pub site_name: String,
    pub organization_name: String,
    pub organization_description: String,
    pub site_description: String,
    pub author_name: String,
    pub logo_path: String,
    pub same_as: Vec<String>,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            site_name: "Ball Lightning AB".to_string(),
            organization_name: "Ball Lightning AB".to_string(),
            organization_description: "Software consulting and product development company \
                specializing in full-stack web, systems integration, and AI-driven solutions."
                .to_string(),
            site_description: "Software consulting and product development. Full-stack web, \
                systems integration, and AI-driven solutions by Ball Lightning AB."
                .to_string(),
            author_name: "Nicolas Brulay".to_string(),
            logo_path: "/logo-60.svg".to_string(),
            same_as: vec![
                "https://github.com/BallLightningAB".to_string(),
                "https://x.com/nicbrulay".to_string(),
                "https://linkedin.com/in/nicolas-brulay-vip".to_string(),
            ],
        }
    }
}

/// Post fields used for `BlogPosting` / `NewsArticle` data.
#[derive(Debug, Clone)]
pub struct ArticleMeta {
    pub kind: ContentKind,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub published_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub hero_image: Option<String>,
    pub tags: Vec<String>,
    pub reading_time_minutes: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    SoftwareApplication,
    CreativeWork,
    VideoGame,
    WebSite,
}

impl ProjectType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::SoftwareApplication => "SoftwareApplication",
            Self::CreativeWork => "CreativeWork",
            Self::VideoGame => "VideoGame",
            Self::WebSite => "WebSite",
        }
    }
}

/// Portfolio project fields.
#[derive(Debug, Clone)]
pub struct ProjectMeta {
    pub name: String,
    pub description: String,
    pub slug: String,
    pub project_type: ProjectType,
    pub application_category: Option<String>,
    pub operating_system: Option<String>,
    pub image: Option<String>,
    pub date_created: Option<String>,
    pub keywords: Vec<String>,
    /// External project URL; defaults to the portfolio page
    pub url: Option<String>,
}

/// URL and structured-data builder bound to a site origin and registry.
#[derive(Debug, Clone)]
pub struct Seo {
    origin: String,
    registry: Arc<LocaleRegistry>,
    identity: SiteIdentity,
}

impl Seo {
    /// `origin` is scheme + host, e.g. `https://example.com`; a trailing `/` is dropped.
    pub fn new(origin: &str, registry: Arc<LocaleRegistry>) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            registry,
            identity: SiteIdentity::default(),
        }
    }

    pub fn with_identity(mut self, identity: SiteIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Absolute URL of `path` in `locale`.
    pub fn localized_url(&self, path: &str, locale: &Locale) -> String {
        format!("{}{}", self.origin, localize_with_code(path, locale.code()))
    }

    /// Canonical URL, locale-prefixed when a locale is given.
    pub fn canonical(&self, path: &str, locale: Option<&Locale>) -> String {
        match locale {
            Some(locale) => self.localized_url(path, locale),
            None => format!("{}{}", self.origin, path),
        }
    }

    /// One alternate per registered locale (registry order) plus `x-default`
    /// pointing at the default locale.
    pub fn alternates(&self, path: &str) -> Vec<AlternateLink> {
        let mut links: Vec<AlternateLink> = self
            .registry
            .list()
            .iter()
            .map(|config| AlternateLink {
                rel: "alternate",
                hreflang: config.code.clone(),
                href: format!("{}{}", self.origin, localize_with_code(path, &config.code)),
            })
            .collect();

        links.push(AlternateLink {
            rel: "alternate",
            hreflang: X_DEFAULT.to_string(),
            href: self.localized_url(path, &self.registry.default_locale()),
        });
        links
    }

    pub fn head(&self, path: &str, locale: &Locale) -> PageHead {
        PageHead {
            locale: locale.clone(),
            path: path.to_string(),
            canonical: self.canonical(path, Some(locale)),
            alternates: self.alternates(path),
        }
    }

    fn organization_id(&self) -> String {
        format!("{}/#organization", self.origin)
    }

    fn website_id(&self) -> String {
        format!("{}/#website", self.origin)
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else {
            format!("{}{}", self.origin, url)
        }
    }

    pub fn organization_schema(&self) -> Value {
        json!({
            "@context": "https://schema.org",
            "@type": "Organization",
            "@id": self.organization_id(),
            "name": self.identity.organization_name,
            "url": self.origin,
            "logo": self.absolute(&self.identity.logo_path),
            "description": self.identity.organization_description,
            "founder": {
                "@type": "Person",
                "name": self.identity.author_name,
            },
            "sameAs": self.identity.same_as,
        })
    }

    pub fn website_schema(&self) -> Value {
        json!({
            "@context": "https://schema.org",
            "@type": "WebSite",
            "@id": self.website_id(),
            "name": self.identity.site_name,
            "description": self.identity.site_description,
            "url": self.origin,
            "inLanguage": self.registry.codes(),
            "publisher": { "@id": self.organization_id() },
            "potentialAction": {
                "@type": "SearchAction",
                "target": {
                    "@type": "EntryPoint",
                    "urlTemplate": format!("{}/blog?q={{search_term_string}}", self.origin),
                },
                "query-input": "required name=search_term_string",
            },
        })
    }

    /// `BlogPosting` for blog posts, `NewsArticle` for news.
    pub fn article_schema(&self, article: &ArticleMeta) -> Value {
        let url = self.canonical(&article.kind.path_for(&article.slug), None);
        let schema_type = match article.kind {
            ContentKind::Blog => "BlogPosting",
            ContentKind::News => "NewsArticle",
        };
        let published = article.published_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let modified = article
            .updated_at
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| published.clone());

        let mut schema = json!({
            "@context": "https://schema.org",
            "@type": schema_type,
            "headline": article.title,
            "description": article.summary,
            "url": url,
            "datePublished": published,
            "dateModified": modified,
            "author": {
                "@type": "Person",
                "name": article.author.as_deref().unwrap_or(&self.identity.author_name),
            },
            "publisher": {
                "@id": self.organization_id(),
                "logo": {
                    "@type": "ImageObject",
                    "url": self.absolute(&self.identity.logo_path),
                },
            },
            "mainEntityOfPage": {
                "@type": "WebPage",
                "@id": url,
            },
        });

        if let Value::Object(map) = &mut schema {
            if let Some(image) = &article.hero_image {
                map.insert("image".into(), Value::String(self.absolute(image)));
            }
            insert_keywords(map, &article.tags);
            if let Some(minutes) = article.reading_time_minutes {
                map.insert("timeRequired".into(), Value::String(format!("PT{minutes}M")));
            }
        }
        schema
    }

    pub fn project_schema(&self, project: &ProjectMeta) -> Value {
        let page_url = self.canonical(&format!("/portfolio/{}", project.slug), None);
        let url = project.url.clone().unwrap_or_else(|| page_url.clone());

        let mut schema = json!({
            "@context": "https://schema.org",
            "@type": project.project_type.as_str(),
            "name": project.name,
            "description": project.description,
            "url": url,
            "author": {
                "@type": "Organization",
                "@id": self.organization_id(),
                "name": self.identity.organization_name,
            },
            "mainEntityOfPage": {
                "@type": "WebPage",
                "@id": page_url,
            },
        });

        if let Value::Object(map) = &mut schema {
            if let Some(category) = &project.application_category {
                map.insert("applicationCategory".into(), Value::String(category.clone()));
            }
            if let Some(os) = &project.operating_system {
                map.insert("operatingSystem".into(), Value::String(os.clone()));
            }
            if let Some(image) = &project.image {
                map.insert("image".into(), Value::String(self.absolute(image)));
            }
            if let Some(created) = &project.date_created {
                map.insert("dateCreated".into(), Value::String(created.clone()));
            }
            insert_keywords(map, &project.keywords);
        }
        schema
    }
}

fn insert_keywords(map: &mut Map<String, Value>, keywords: &[String]) {
    if !keywords.is_empty() {
        map.insert("keywords".into(), Value::String(keywords.join(", ")));
    }
}
