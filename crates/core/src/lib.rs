//! Turn news-article HTML into an addressable paragraph, sentence and word tree.
//!
//! The pipeline runs leaf-first: [`ContentExtractor`] isolates the article text,
//! [`SentenceSegmenter`] and [`WordTokenizer`] split it, and
//! [`ArticleStructurer`] assembles the resulting [`ParsedArticle`]. With the
//! `lookup` feature, [`LookupGateway`] asks a language model for word glosses
//! and sentence translations.

pub mod article;
pub mod error;
pub mod extract;
#[cfg(feature = "fetch")]
pub mod fetch;
#[cfg(feature = "lookup")]
pub mod lookup;
pub mod metadata;
pub mod parse;
pub mod preprocess;
pub mod ratelimit;
pub mod scoring;
pub mod segment;
pub mod structure;
pub mod text;
pub mod tokenize;

pub use article::{Paragraph, ParsedArticle, Sentence, SentenceAddress, Word};
#[cfg(feature = "fetch")]
pub use error::FetchError;
#[cfg(feature = "lookup")]
pub use error::LookupError;
pub use error::{ExtractionError, GlossaError, Result};
pub use extract::{ContentExtractor, ExtractConfig, ExtractConfigBuilder, ExtractedContent, RawDocument, extract};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, fetch_file, fetch_stdin, fetch_url};
#[cfg(feature = "lookup")]
pub use lookup::{ChatClient, CompletionClient, CompletionRequest, LookupConfig, LookupGateway, WordMeaning};
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use preprocess::preprocess_html;
pub use ratelimit::{
    EndpointKind, MemoryRateLimitStore, RateLimit, RateLimitConfig, RateLimitDecision, RateLimitStore, RateLimiter,
};
#[doc(hidden)]
pub use scoring::{ScoreConfig, ScoreResult, calculate_score};
pub use segment::{DEFAULT_ABBREVIATIONS, SentenceSegmenter};
pub use structure::{ArticleStructurer, split_paragraphs, structure};
pub use tokenize::{DEFAULT_PUNCTUATION, WordTokenizer};
