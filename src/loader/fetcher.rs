use crate::config::FetcherConfig;
use crate::error::{Error, Result};
use reqwest::{header, Client, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// HTTP fetcher with retry logic and a response size limit
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    initial_backoff: Duration,
    max_feed_size: usize,
}

#[derive(Debug)]
pub struct FetchResult {
    pub content: String,
    pub content_type: Option<String>,
}

impl Fetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            initial_backoff: Duration::from_secs(1),
            max_feed_size: config.max_feed_size,
        })
    }

    /// Override the delay before the first retry. Doubles on each further attempt.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Fetch a URL with retry logic and exponential backoff
    pub async fn fetch(&self, url: &str) -> Result<FetchResult> {
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            match self.fetch_once(url).await {
                Ok(result) => return Ok(result),
                Err(e) if retries < self.max_retries && Self::is_retryable(&e) => {
                    retries += 1;
                    warn!(
                        "Fetch failed (attempt {}/{}): {}. Retrying in {:?}",
                        retries, self.max_retries, e, backoff
                    );
                    sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchResult> {
        debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::FeedParse(format!("HTTP {}", response.status())));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        if let Some(ref ct) = content_type {
            let ct_lower = ct.to_lowercase();
            let valid_types = [
                "text/xml",
                "application/xml",
                "application/atom+xml",
                "application/rss+xml",
                "application/feed+json",
                "application/json",
                "text/plain",
                "text/html", // Some feeds are served as HTML
            ];

            if !valid_types
                .iter()
                .any(|&valid_type| ct_lower.starts_with(valid_type))
            {
                // Servers mislabel feeds often enough that this only warns
                warn!("Unexpected content type: {} for {}", ct, url);
            }
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size as u64 {
                return Err(Error::Validation(format!(
                    "Feed size {} exceeds maximum {}",
                    content_length, self.max_feed_size
                )));
            }
        }

        let content = self.read_with_limit(response).await?;

        Ok(FetchResult {
            content,
            content_type,
        })
    }

    async fn read_with_limit(&self, response: Response) -> Result<String> {
        let bytes = response.bytes().await?;

        if bytes.len() > self.max_feed_size {
            return Err(Error::Validation(format!(
                "Feed size {} exceeds maximum {}",
                bytes.len(),
                self.max_feed_size
            )));
        }

        let content = String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::FeedParse(format!("Invalid UTF-8 in response: {e}")))?;

        Ok(content)
    }

    fn is_retryable(error: &Error) -> bool {
        match error {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}
