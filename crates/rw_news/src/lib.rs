use async_trait::async_trait;
use rw_core::{AppConfig, Error, NewsSource, RawArticle, Result};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};

const MEDIASTACK_API_URL: &str = "http://api.mediastack.com";

/// Query parameters sent on every fetch.
#[derive(Debug, Clone)]
pub struct NewsQuery {
    pub countries: String,
    pub keywords: String,
    pub limit: u32,
}

impl NewsQuery {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            countries: config.news_countries.clone(),
            keywords: config.news_keywords.clone(),
            limit: config.news_limit,
        }
    }
}

/// Client for a Mediastack-compatible news API.
pub struct NewsClient {
    api_key: String,
    query: NewsQuery,
    http: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsClient")
            .field("api_key", &"<redacted>")
            .field("query", &self.query)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    data: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    source: Option<String>,
    published_at: Option<String>,
    country: Option<String>,
}

impl NewsClient {
    pub fn new(api_key: &str, query: NewsQuery) -> Self {
        Self {
            api_key: api_key.to_string(),
            query,
            http: reqwest::Client::new(),
            base_url: MEDIASTACK_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

#[async_trait]
impl NewsSource for NewsClient {
    async fn fetch(&self) -> Result<Vec<RawArticle>> {
        let url = format!("{}/v1/news", self.base_url);
        debug!("Fetching news from {}", url);

        let limit = self.query.limit.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("access_key", self.api_key.as_str()),
                ("countries", self.query.countries.as_str()),
                ("keywords", self.query.keywords.as_str()),
                ("limit", limit.as_str()),
                ("sort", "published_desc"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::News(format!(
                "news API returned {}: {}",
                status, body
            )));
        }

        let parsed: NewsResponse = response.json().await?;

        let articles: Vec<RawArticle> = parsed
            .data
            .into_iter()
            .filter_map(|item| {
                // Items without a title carry nothing to key on downstream.
                let title = item.title.filter(|t| !t.trim().is_empty())?;
                Some(RawArticle {
                    title,
                    description: item.description,
                    url: item.url,
                    source: item.source,
                    published_at: item.published_at,
                    country: item.country,
                })
            })
            .collect();

        info!("📰 Fetched {} articles from news API", articles.len());
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "pagination": {"limit": 25, "offset": 0, "count": 2, "total": 2},
            "data": [
                {
                    "title": "Sanctions expanded",
                    "description": "New export controls announced.",
                    "url": "https://example.com/a",
                    "source": "example",
                    "published_at": "2026-08-01T12:00:00+00:00",
                    "country": "us"
                },
                {
                    "title": null,
                    "description": "no title, should be dropped",
                    "url": null,
                    "source": null,
                    "published_at": null,
                    "country": null
                }
            ]
        }"#;
        let parsed: NewsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0].title.as_deref(), Some("Sanctions expanded"));
    }

    #[test]
    fn test_empty_response_parses() {
        let parsed: NewsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.data.is_empty());
    }
}
