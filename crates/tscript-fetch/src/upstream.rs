//! Upstream HTTP client for the watch page and caption payloads.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use tracing::debug;
use tscript_models::VideoId;
use url::Url;

use crate::config::FetchConfig;
use crate::error::{FetchError, FetchResult};
use crate::parser::TimedTextDocument;

/// Outbound fetches used by the watch page strategy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetch the watch page HTML.
    async fn fetch_watch_page(&self, video_id: &VideoId) -> FetchResult<String>;

    /// Fetch and decode a caption track payload from its locator.
    async fn fetch_caption_payload(&self, locator: &str) -> FetchResult<TimedTextDocument>;
}

/// reqwest-backed [`Upstream`].
pub struct HttpUpstream {
    http: Client,
    config: FetchConfig,
}

impl HttpUpstream {
    pub fn new(config: FetchConfig) -> FetchResult<Self> {
        let mut headers = HeaderMap::new();
        let accept_language = HeaderValue::from_str(&config.accept_language)
            .map_err(|_| FetchError::Config(format!("invalid Accept-Language: {}", config.accept_language)))?;
        headers.insert(ACCEPT_LANGUAGE, accept_language);

        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self { http, config })
    }

    pub fn from_env() -> FetchResult<Self> {
        Self::new(FetchConfig::from_env())
    }

    /// `{base}/watch?v=<id>&hl=en`
    pub fn watch_page_url(&self, video_id: &VideoId) -> String {
        format!("{}/watch?v={}&hl=en", self.config.base_url, video_id)
    }

    async fn get(&self, url: &str) -> FetchResult<reqwest::Response> {
        let response = self.http.get(url).send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    fn map_send_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.config.upstream_timeout)
        } else {
            FetchError::Network(e)
        }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch_watch_page(&self, video_id: &VideoId) -> FetchResult<String> {
        let url = self.watch_page_url(video_id);
        debug!(%url, "Fetching watch page");

        let response = self.get(&url).await?;
        response.text().await.map_err(|e| self.map_send_error(e))
    }

    async fn fetch_caption_payload(&self, locator: &str) -> FetchResult<TimedTextDocument> {
        let url = caption_payload_url(&self.config.base_url, locator)?;
        debug!(%url, "Fetching caption payload");

        let response = self.get(url.as_str()).await?;
        let body = response.bytes().await.map_err(|e| self.map_send_error(e))?;
        TimedTextDocument::from_slice(&body)
    }
}

/// Resolve a track locator against the watch page origin and force the
/// timed-event JSON format unless a format is already requested.
pub fn caption_payload_url(base_url: &str, locator: &str) -> FetchResult<Url> {
    let base = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;
    let mut url = base
        .join(locator.trim())
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", locator, e)))?;

    if !url.query_pairs().any(|(key, _)| key == "fmt") {
        url.query_pairs_mut().append_pair("fmt", "json3");
    }
    Ok(url)
}
