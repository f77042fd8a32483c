//! Page fetching from URLs, files, and stdin.
//!
//! The batch driver talks to the network through the [`PageFetcher`] trait.
//! [`HttpFetcher`] is the reqwest-backed implementation; tests substitute
//! canned pages.

use std::fs;
use std::future::Future;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use tracing::debug;
use url::Url;

use crate::{RecipeError, Result};

/// HTTP client configuration for fetching pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 10, user_agent: format!("Mozilla/5.0 (compatible; simrecipe/{})", env!("CARGO_PKG_VERSION")) }
    }
}

/// Source of page bodies for the batch driver.
pub trait PageFetcher {
    /// Returns the body of `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Checks that `url` is absolute and uses http or https.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| RecipeError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(RecipeError::InvalidUrl(format!("unsupported scheme '{scheme}' in {url}"))),
    }
}

/// Builds a client with the configured timeout and user agent.
#[cfg(feature = "fetch")]
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(RecipeError::HttpError)
}

#[cfg(feature = "fetch")]
async fn get_text(client: &Client, url: &str, config: &FetchConfig) -> Result<String> {
    let parsed = validate_url(url)?;
    debug!(url, "Fetching page");

    let to_fetch_error = |e: reqwest::Error| {
        if e.is_timeout() { RecipeError::Timeout { timeout: config.timeout } } else { RecipeError::HttpError(e) }
    };

    let response = client
        .get(parsed)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(to_fetch_error)?
        .error_for_status()
        .map_err(RecipeError::HttpError)?;

    response.text().await.map_err(to_fetch_error)
}

/// Fetches one page with a fresh client.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let client = build_client(config)?;
    get_text(&client, url, config).await
}

/// Reusable reqwest-backed fetcher.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

#[cfg(feature = "fetch")]
impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[cfg(feature = "fetch")]
impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send {
        get_text(&self.client, url, &self.config)
    }
}

/// Reads a page from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() { Err(RecipeError::FileNotFound(path_buf)) } else { Ok(fs::read_to_string(&path_buf)?) }
}

/// Reads a page from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(buffer)
}
