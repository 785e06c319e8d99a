//! Search page fetching.

use crate::config::{RequestConfig, LIVE_FILTER_PARAM};
use crate::error::ScrapeError;
use crate::extract::is_short_page;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of raw search-result HTML for one query.
#[async_trait]
pub trait SearchPageFetcher: Send + Sync {
    async fn fetch_search_page(&self, query: &str) -> Result<String, ScrapeError>;
}

/// Fetches YouTube search result pages over HTTPS.
pub struct YouTubeSearchFetcher {
    client: Client,
    config: RequestConfig,
}

impl YouTubeSearchFetcher {
    pub fn new(config: RequestConfig) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);
        headers.insert(REFERER, header_value(&config.referer)?);

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .cookie_store(true)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(ScrapeError::HttpRequest)?;

        Ok(Self { client, config })
    }

    /// Search URL for `query`, with the live filter when enabled.
    pub fn search_url(&self, query: &str) -> Result<Url, ScrapeError> {
        let mut url = Url::parse(&self.config.search_url)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("search_query", query);
            if self.config.live_filter {
                pairs.append_pair("sp", LIVE_FILTER_PARAM);
            }
        }
        Ok(url)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ScrapeError> {
    HeaderValue::from_str(value)
        .map_err(|e| ScrapeError::Config(format!("invalid header value '{}': {}", value, e)))
}

#[async_trait]
impl SearchPageFetcher for YouTubeSearchFetcher {
    async fn fetch_search_page(&self, query: &str) -> Result<String, ScrapeError> {
        let url = self.search_url(query)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ScrapeError::HttpRequest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UpstreamStatus(status.as_u16()));
        }

        let html = response.text().await.map_err(ScrapeError::HttpRequest)?;
        debug!(
            target: "livescout.fetch",
            query = %query,
            bytes = html.len(),
            "search page fetched"
        );

        // Consent walls and bot checks come back 200 with a near-empty body.
        if is_short_page(&html) {
            return Err(ScrapeError::Blocked(html.chars().count()));
        }
        Ok(html)
    }
}
