//! Error types for Glossa operations.
//!
//! Each stage of the pipeline owns its error type so that callers can match on
//! exactly the failures that stage can produce:
//!
//! - [`ExtractionError`]: the HTML could not be turned into article text.
//! - [`LookupError`]: the language-model lookup failed or answered garbage.
//! - [`FetchError`]: the article page could not be downloaded.
//!
//! [`GlossaError`] wraps all of them for callers that do not care which stage failed.
//!
//! # Example
//!
//! ```rust
//! use glossa_core::{ExtractionError, structure};
//!
//! match structure("", "https://example.com/a") {
//!     Err(ExtractionError::EmptyDocument) => println!("nothing to read"),
//!     Err(e) => println!("Error: {}", e),
//!     Ok(article) => println!("{} paragraphs", article.paragraphs().len()),
//! }
//! ```

use thiserror::Error;

/// Errors raised while extracting the main content of a page.
///
/// Extraction either succeeds completely or fails with one of these; a partially
/// extracted article is never returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The supplied HTML was empty or contained only whitespace.
    #[error("Document is empty")]
    EmptyDocument,

    /// The source URL is not an absolute http(s) URL with a host.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParse(String),

    /// No content candidate was found, or the chosen block held no text.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// The best candidate scored below the readability threshold.
    ///
    /// This typically happens on navigation pages, search results,
    /// or pages with very little text content.
    #[error("Content is not readable (score {score} below threshold {threshold})")]
    NotReadable { score: f64, threshold: f64 },
}

/// Errors raised by the lookup gateway.
#[cfg(feature = "lookup")]
#[derive(Error, Debug)]
pub enum LookupError {
    /// The word, context or sentence to look up was blank.
    #[error("Lookup input is empty")]
    EmptyInput,

    /// Transport-level failure talking to the language model.
    #[error("Language model request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The language model did not answer within the configured timeout.
    #[error("Language model timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The language model answered with a non-success status.
    #[error("Language model returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The answer could not be read as the expected structure.
    #[error("Could not parse language model answer: {0}")]
    Parse(String),
}

/// Errors raised while downloading an article page.
#[cfg(feature = "fetch")]
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL cannot be parsed or does not use http(s).
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// HTTP request errors from reqwest.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("Server responded with status {0}")]
    Status(u16),

    /// Reading a local file or stdin failed.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Umbrella error for callers that drive several stages.
#[derive(Error, Debug)]
pub enum GlossaError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[cfg(feature = "lookup")]
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[cfg(feature = "fetch")]
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Result type alias defaulting to [`GlossaError`].
pub type Result<T, E = GlossaError> = std::result::Result<T, E>;
