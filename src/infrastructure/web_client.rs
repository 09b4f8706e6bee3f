//! Page fetching over HTTP or a browser-automation session
//!
//! The transport boundary of the whole library: `fetch(url) -> raw HTML`.
//! The portal renders without script execution today, so the default path is
//! a plain HTTP GET; a WebDriver session can be swapped in should that ever
//! change. No retries and no backoff here: the caller owns resiliency.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use thirtyfour::WebDriver;
use thiserror::Error;
use tracing::debug;

/// Fixed realistic desktop browser user agent used unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.77 Safari/537.36";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed for {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from {url}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("browser automation selected but no WebDriver session was provided")]
    DriverNotConfigured,

    #[error("WebDriver navigation failed for {url}")]
    Driver {
        url: String,
        #[source]
        source: thirtyfour::error::WebDriverError,
    },

    #[error("invalid client configuration: {0}")]
    Configuration(String),
}

/// Transport configuration with documented defaults; passed explicitly to
/// [`WebClient::new`], never read from process-wide state.
#[derive(Debug, Clone)]
pub struct WebClientConfig {
    /// Route fetches through a stateful WebDriver session instead of a
    /// stateless HTTP call.
    pub use_browser_automation: bool,
    /// User agent sent with every HTTP request.
    pub user_agent: String,
    /// Additional headers sent with every HTTP request.
    pub extra_headers: HashMap<String, String>,
    /// Transport-level request timeout.
    pub timeout_seconds: u64,
}

impl Default for WebClientConfig {
    fn default() -> Self {
        Self {
            use_browser_automation: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_headers: HashMap::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// The one I/O seam of the library.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw page text behind `url`.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages either with a plain HTTP client or through a WebDriver
/// session, depending on configuration.
pub struct WebClient {
    client: reqwest::Client,
    driver: Option<WebDriver>,
    config: WebClientConfig,
}

impl WebClient {
    /// Build a client for stateless HTTP fetching.
    pub fn new(config: WebClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.extra_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                FetchError::Configuration(format!("invalid header name '{name}': {e}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                FetchError::Configuration(format!("invalid value for header '{name}': {e}"))
            })?;
            headers.insert(header_name, header_value);
        }

        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .cookie_store(true)
            .gzip(true)
            .build()
            .map_err(|e| FetchError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            driver: None,
            config,
        })
    }

    /// Build a client that owns a WebDriver session for browser-automation
    /// fetching.
    pub fn with_driver(config: WebClientConfig, driver: WebDriver) -> Result<Self, FetchError> {
        let mut client = Self::new(config)?;
        client.driver = Some(driver);
        Ok(client)
    }

    pub fn config(&self) -> &WebClientConfig {
        &self.config
    }

    async fn fetch_via_http(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        // The portal does not use HTTP status codes meaningfully; the body is
        // returned as-is whatever the status.
        let status = response.status();
        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        debug!(%status, url = %url, bytes = body.len(), "fetched page over HTTP");
        Ok(body)
    }

    async fn fetch_via_driver(&self, url: &str) -> Result<String, FetchError> {
        let driver = self.driver.as_ref().ok_or(FetchError::DriverNotConfigured)?;
        driver.goto(url).await.map_err(|source| FetchError::Driver {
            url: url.to_string(),
            source,
        })?;
        let body = driver.source().await.map_err(|source| FetchError::Driver {
            url: url.to_string(),
            source,
        })?;
        debug!(url = %url, bytes = body.len(), "fetched page via WebDriver");
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for WebClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if self.config.use_browser_automation {
            self.fetch_via_driver(url).await
        } else {
            self.fetch_via_http(url).await
        }
    }
}
