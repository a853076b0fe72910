// src/fetch.rs

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::config::SourceConfig;
use crate::error::FetchError;

/// Anything that can hand back the raw listing page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Where the page comes from, for log lines.
    fn describe(&self) -> String;

    /// One attempt, no retries.
    async fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

/// Single HTTP GET with a browser-like user agent and a bounded timeout.
pub struct HttpFetcher {
    client: Client,
    url: Url,
}

impl HttpFetcher {
    pub fn new(cfg: &SourceConfig) -> Result<Self, FetchError> {
        let url = Url::parse(&cfg.url).map_err(|source| FetchError::InvalidUrl {
            url: cfg.url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(cfg.timeout())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let url = self.url.to_string();
        info!(%url, "fetching price page");

        let classify = |source: reqwest::Error| {
            if source.is_timeout() {
                FetchError::Timeout { url: url.clone() }
            } else {
                FetchError::Request {
                    url: url.clone(),
                    source,
                }
            }
        };

        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status,
            });
        }

        let body = resp.bytes().await.map_err(classify)?;
        debug!(%url, bytes = body.len(), "received body");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        let cfg = SourceConfig {
            url: "not a url".to_string(),
            ..SourceConfig::default()
        };
        match HttpFetcher::new(&cfg) {
            Err(FetchError::InvalidUrl { url, .. }) => assert_eq!(url, "not a url"),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_describe_is_the_url() {
        let fetcher = HttpFetcher::new(&SourceConfig::default()).unwrap();
        assert_eq!(
            fetcher.describe(),
            "https://www.pvoil.com.vn/tin-gia-xang-dau"
        );
    }
}
