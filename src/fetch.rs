use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::{info, warn};

use crate::error::FetchError;

pub const DEFAULT_USER_AGENT: &str = "wiki_quiz (educational project)";

/// Source of raw article markup. The pipeline never retries a failed fetch.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "text/html")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Fetch of {} returned {}", url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        info!(
            "Fetched {} ({} bytes in {}ms)",
            url,
            html.len(),
            start.elapsed().as_millis()
        );
        Ok(html)
    }
}
