//! HTTP surface: locale-aware routing plus the SEO and feed endpoints.
//!
//! Every route is reachable both unprefixed (default locale) and under
//! `/{locale}`. The rewrite runs before routing, so handlers only ever see
//! canonical paths and read the locale from [`RequestLocale`].

use crate::content::ContentRepository;
use crate::feed::{FeedClient, FeedResponse};
use crate::i18n::{Locale, UrlLocalizer};
use crate::seo::{PageHead, Seo};
use crate::sitemap::SitemapGenerator;
use axum::extract::{Query, Request, State};
use axum::http::uri::PathAndQuery;
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

const SEO_CACHE_CONTROL: &str = "public, max-age=86400";

/// Locale resolved for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

/// Shared, read-only application state.
pub struct AppState {
    pub localizer: UrlLocalizer,
    pub seo: Seo,
    pub sitemap: SitemapGenerator,
    pub content: Arc<dyn ContentRepository>,
    pub feed: FeedClient,
}

/// Full application: locale rewrite in front of the routes.
pub fn app(state: Arc<AppState>) -> Router {
    let localizer = state.localizer.clone();

    Router::new()
        .fallback_service(routes(state))
        .layer(middleware::from_fn_with_state(localizer, locale_rewrite))
        .layer(TraceLayer::new_for_http())
}

fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/robots.txt", get(robots_txt))
        .route("/api/feed", get(feed))
        .route("/api/head", get(head))
        .with_state(state)
}

/// Strip a registered `/{locale}` prefix and record the request locale.
async fn locale_rewrite(
    State(localizer): State<UrlLocalizer>,
    mut req: Request,
    next: Next,
) -> Response {
    let resolved = localizer.resolve(req.uri().path());

    if resolved.explicit {
        let target = match req.uri().query() {
            Some(query) => format!("{}?{}", resolved.path, query),
            None => resolved.path.clone(),
        };
        match rewrite_uri(req.uri(), &target) {
            Some(uri) => {
                debug!(from = %req.uri(), to = %uri, "rewrote localized path");
                *req.uri_mut() = uri;
            }
            None => debug!(target = %target, "could not rewrite localized path"),
        }
    }

    let locale = resolved.locale;
    req.extensions_mut().insert(RequestLocale(locale.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(locale.code()) {
        response.headers_mut().insert(header::CONTENT_LANGUAGE, value);
    }
    response
}

fn rewrite_uri(uri: &Uri, path_and_query: &str) -> Option<Uri> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>().ok()?);
    Uri::from_parts(parts).ok()
}

async fn health() -> &'static str {
    "OK"
}

async fn sitemap_xml(State(state): State<Arc<AppState>>) -> Response {
    let task_state = Arc::clone(&state);
    let result =
        tokio::task::spawn_blocking(move || task_state.sitemap.generate(task_state.content.as_ref()))
            .await;

    match result {
        Ok(Ok(xml)) => (
            [
                (header::CONTENT_TYPE, "application/xml; charset=utf-8"),
                (header::CACHE_CONTROL, SEO_CACHE_CONTROL),
            ],
            xml,
        )
            .into_response(),
        Ok(Err(e)) => {
            error!("Sitemap generation failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            error!("Sitemap task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn robots_txt(State(state): State<Arc<AppState>>) -> Response {
    let body = format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        state.seo.origin()
    );
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, SEO_CACHE_CONTROL),
        ],
        body,
    )
        .into_response()
}

/// `null` when the remote feed is unavailable.
async fn feed(State(state): State<Arc<AppState>>) -> Json<Option<FeedResponse>> {
    Json(state.feed.fetch().await)
}

#[derive(Debug, Deserialize)]
struct HeadQuery {
    path: Option<String>,
}

async fn head(
    State(state): State<Arc<AppState>>,
    Extension(RequestLocale(locale)): Extension<RequestLocale>,
    Query(query): Query<HeadQuery>,
) -> Json<PageHead> {
    let path = query.path.unwrap_or_else(|| "/".to_string());
    let canonical = state.localizer.delocalize(&path);
    Json(state.seo.head(&canonical, &locale))
}
