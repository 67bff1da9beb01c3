use std::time::Duration;

use futures_util::StreamExt;
use lexcrawl_core::is_absolute_http_url;
use lexcrawl_logging::{crawl_debug, crawl_warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

/// Client identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("lexcrawl/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Extra attempts after the first one, for transient failures only.
    pub retries: u32,
    pub retry_backoff: Duration,
    pub user_agent: String,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            retries: 2,
            retry_backoff: Duration::from_secs(2),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

/// HTTP GET with a bounded, fixed-backoff retry budget. Keeps no state between calls.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    async fn fetch_once(&self, url: &Url) -> Result<FetchOutput, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            status: status.as_u16(),
            content_type,
            byte_len: bytes.len() as u64,
            attempts: 1,
        };

        Ok(FetchOutput { bytes, metadata })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let parsed = parse_target(url)?;
        let max_attempts = self.settings.retries.saturating_add(1);
        let mut attempt = 1;
        loop {
            crawl_debug!("GET {} (attempt {}/{})", parsed, attempt, max_attempts);
            match self.fetch_once(&parsed).await {
                Ok(mut output) => {
                    output.metadata.original_url = url.to_string();
                    output.metadata.attempts = attempt;
                    return Ok(output);
                }
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    crawl_warn!(
                        "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                        attempt,
                        max_attempts,
                        url,
                        err,
                        self.settings.retry_backoff
                    );
                    tokio::time::sleep(self.settings.retry_backoff).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.with_attempts(attempt)),
            }
        }
    }
}

/// Absolute http(s) URLs only; anything else fails before touching the network.
fn parse_target(url: &str) -> Result<Url, FetchError> {
    let trimmed = url.trim();
    if !is_absolute_http_url(trimmed) {
        return Err(FetchError::new(
            FailureKind::InvalidUrl,
            format!("not an absolute http(s) url: {url}"),
        ));
    }
    Url::parse(trimmed).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
