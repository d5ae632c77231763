//! Content fetching from URLs, files, and stdin.
//!
//! This module provides functions for retrieving HTML content from
//! various sources: HTTP/HTTPS URLs, local files, and standard input.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::FetchError;

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; Glossa/0.1; article reader)".to_string() }
    }
}

impl FetchConfig {
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Fetches HTML content from a URL.
///
/// Performs a GET request with browser-like headers, follows redirects and
/// returns the body as text. Only `http` and `https` URLs are accepted.
///
/// # Errors
///
/// - [`FetchError::InvalidUrl`] for unparseable or non-http(s) URLs
/// - [`FetchError::Timeout`] when the server does not answer within `config.timeout`
/// - [`FetchError::Status`] for non-success responses
/// - [`FetchError::Http`] for any other transport failure
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String, FetchError> {
    let parsed_url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(format!("{}: URL must use http:// or https://", url)));
    }

    let client = Client::builder().timeout(Duration::from_secs(config.timeout)).build()?;
    let classify = |e: reqwest::Error| {
        if e.is_timeout() { FetchError::Timeout { timeout: config.timeout } } else { FetchError::Http(e) }
    };

    tracing::debug!(url = %parsed_url, "fetching article page");
    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(classify)?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "article page request failed");
        return Err(FetchError::Status(status.as_u16()));
    }

    response.text().await.map_err(classify)
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: impl AsRef<Path>) -> Result<String, FetchError> {
    Ok(fs::read_to_string(path)?)
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String, FetchError> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
