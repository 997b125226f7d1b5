use std::time::Duration;
use tracing::{debug, warn};

use crate::error::FetchError;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_attempts: u32,
    /// Back-off before retry `n` is `n * retry_delay`
    pub retry_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(20),
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Blocking page fetcher with a bounded retry policy
pub struct PageClient {
    client: reqwest::blocking::Client,
    config: FetchConfig,
}

impl PageClient {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client, config })
    }

    /// Raw body bytes of `url`
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.try_fetch(url) {
                Ok(body) => {
                    debug!(url, attempt, bytes = body.len(), "page fetched");
                    return Ok(body);
                }
                Err(e) if attempt < attempts && e.is_retryable() => {
                    warn!(url, attempt, error = %e, "fetch failed, retrying");
                    std::thread::sleep(self.config.retry_delay * attempt);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn try_fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response.bytes().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}
