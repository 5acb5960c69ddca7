//! Remote content feed (latest blog and news items from the sister blog).
//!
//! The home page embeds these items, so a slow or broken feed must never
//! fail the page: every failure is logged and reported as `None`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_FEED_URL: &str = "https://thebuildercoil.com/api/feed";
pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedItemType {
    Blog,
    News,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedImage {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(rename = "type")]
    pub kind: FeedItemType,
    pub title: String,
    pub slug: String,
    pub url: String,
    pub excerpt: String,
    pub published_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<FeedImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub items: Vec<FeedItem>,
    pub updated_at: String,
}

/// Client for the feed endpoint. One GET per call; no retry and no cache.
#[derive(Debug, Clone)]
pub struct FeedClient {
    url: String,
    client: reqwest::Client,
}

impl FeedClient {
    /// Build a client with a per-request `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the feed, returning `None` on any failure.
    pub async fn fetch(&self) -> Option<FeedResponse> {
        let response = match self.client.get(&self.url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(url = %self.url, "Content feed timed out");
                return None;
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "Content feed request failed");
                return None;
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(url = %self.url, status = %status, "Content feed unavailable");
            return None;
        }

        match response.json::<FeedResponse>().await {
            Ok(feed) => {
                debug!(items = feed.items.len(), "Content feed fetched");
                Some(feed)
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "Content feed returned malformed JSON");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const FEED_JSON: &str = r#"{
        "items": [
            {
                "type": "blog",
                "title": "Notes on shipping",
                "slug": "notes-on-shipping",
                "url": "https://blog.example.com/blog/notes-on-shipping",
                "excerpt": "What we learned",
                "publishedAt": "2024-01-15T10:00:00Z",
                "image": {"url": "https://blog.example.com/a.webp", "alt": "Cover"}
            },
            {
                "type": "news",
                "title": "Launch",
                "slug": "launch",
                "url": "https://blog.example.com/news/launch",
                "excerpt": "We launched",
                "publishedAt": "2024-02-01T08:00:00Z"
            }
        ],
        "updatedAt": "2024-02-01T08:05:00Z"
    }"#;

    fn client_for(server: &MockServer, timeout: Duration) -> FeedClient {
        FeedClient::new(format!("{}/api/feed", server.uri()), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/feed"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(FEED_JSON.as_bytes(), "application/json"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let feed = client_for(&mock_server, DEFAULT_FEED_TIMEOUT)
            .fetch()
            .await
            .expect("feed should parse");

        assert_eq!(feed.items.len(), 2);
        assert_eq!(feed.items[0].kind, FeedItemType::Blog);
        assert_eq!(feed.items[0].image.as_ref().unwrap().alt, "Cover");
        assert_eq!(feed.items[1].kind, FeedItemType::News);
        assert!(feed.items[1].image.is_none());
        assert_eq!(feed.updated_at, "2024-02-01T08:05:00Z");
    }

    #[tokio::test]
    async fn test_fetch_server_error_returns_none() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/feed"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let feed = client_for(&mock_server, DEFAULT_FEED_TIMEOUT).fetch().await;
        assert!(feed.is_none());
    }

    #[tokio::test]
    async fn test_fetch_non_200_success_status_returns_none() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/feed"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let feed = client_for(&mock_server, DEFAULT_FEED_TIMEOUT).fetch().await;
        assert!(feed.is_none());
    }

    #[tokio::test]
    async fn test_fetch_malformed_json_returns_none() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/feed"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"items": "nope"}"#))
            .mount(&mock_server)
            .await;

        let feed = client_for(&mock_server, DEFAULT_FEED_TIMEOUT).fetch().await;
        assert!(feed.is_none());
    }

    #[tokio::test]
    async fn test_fetch_timeout_returns_none_within_window() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/feed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(FEED_JSON.as_bytes(), "application/json")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Duration::from_millis(200));
        let started = Instant::now();
        let feed = client.fetch().await;

        assert!(feed.is_none());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_fetch_connection_error_returns_none() {
        let client = FeedClient::new("http://localhost:1/api/feed", DEFAULT_FEED_TIMEOUT).unwrap();
        assert!(client.fetch().await.is_none());
    }

    #[test]
    fn test_feed_item_serializes_camel_case() {
        let item = FeedItem {
            kind: FeedItemType::News,
            title: "t".to_string(),
            slug: "s".to_string(),
            url: "u".to_string(),
            excerpt: "e".to_string(),
            published_at: "2024-01-01".to_string(),
            image: None,
        };
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["type"], "news");
        assert_eq!(json["publishedAt"], "2024-01-01");
        assert!(json.get("image").is_none());
    }
}
