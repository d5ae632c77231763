//! Article structuring: extraction, paragraph splitting, segmentation and tokenization
//! composed into one [`ParsedArticle`].
//!
//! # Example
//!
//! ```rust
//! use glossa_core::structure;
//!
//! let html = r#"<html><head><title>Test Article</title></head><body><article>
//!     <p>First sentence. Second sentence.</p>
//!     <p>Third sentence.</p>
//! </article></body></html>"#;
//!
//! let article = structure(html, "https://example.com/a").unwrap();
//! assert_eq!(article.title(), "Test Article");
//! assert_eq!(article.source(), "example.com");
//! assert_eq!(article.paragraphs().len(), 2);
//! assert_eq!(article.paragraphs()[0].sentences().len(), 2);
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::ExtractionError;
use crate::article::{Paragraph, ParsedArticle, Sentence};
use crate::extract::{ContentExtractor, ExtractConfig, ExtractedContent};
use crate::segment::SentenceSegmenter;
use crate::tokenize::WordTokenizer;

/// One or more blank lines, possibly holding stray whitespace.
static PARAGRAPH_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Builds [`ParsedArticle`]s from raw HTML.
///
/// Holds the extractor, segmenter and tokenizer configuration; cheap to clone
/// and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct ArticleStructurer {
    extractor: ContentExtractor,
    segmenter: SentenceSegmenter,
    tokenizer: WordTokenizer,
}

impl ArticleStructurer {
    /// Structurer with default extraction, abbreviation and punctuation settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extract_config(mut self, config: ExtractConfig) -> Self {
        self.extractor = ContentExtractor::with_config(config);
        self
    }

    pub fn with_segmenter(mut self, segmenter: SentenceSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: WordTokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn extractor(&self) -> &ContentExtractor {
        &self.extractor
    }

    /// Extract and segment `html` fetched from `url`.
    ///
    /// Extraction errors are returned unchanged; segmentation never fails.
    pub fn structure(&self, html: &str, url: &str) -> Result<ParsedArticle, ExtractionError> {
        let content = self.extractor.extract(html, url)?;
        Ok(self.structure_content(content))
    }

    /// Segment content that was already extracted.
    pub fn structure_content(&self, content: ExtractedContent) -> ParsedArticle {
        let paragraphs: Vec<Paragraph> =
            split_paragraphs(&content.body_text).map(|text| self.structure_paragraph(text)).collect();

        tracing::debug!(
            paragraphs = paragraphs.len(),
            source = %content.source_domain,
            "structured article"
        );
        ParsedArticle::new(content.title, content.source_domain, paragraphs)
    }

    fn structure_paragraph(&self, text: &str) -> Paragraph {
        let sentences = self
            .segmenter
            .segment(text)
            .into_iter()
            .map(|sentence| {
                let words = self.tokenizer.tokenize(&sentence);
                Sentence::new(sentence, words)
            })
            .collect();
        Paragraph::new(sentences)
    }

    /// Download `url` and structure the page.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_structure(
        &self, url: &str, config: &crate::FetchConfig,
    ) -> Result<ParsedArticle, crate::GlossaError> {
        let html = crate::fetch_url(url, config).await?;
        Ok(self.structure(&html, url)?)
    }
}

/// Structure `html` with the default configuration.
pub fn structure(html: &str, url: &str) -> Result<ParsedArticle, ExtractionError> {
    ArticleStructurer::new().structure(html, url)
}

/// Split body text at blank lines, dropping whitespace-only paragraphs.
pub fn split_paragraphs(body_text: &str) -> impl Iterator<Item = &str> {
    PARAGRAPH_BREAK_RE.split(body_text).map(str::trim).filter(|p| !p.is_empty())
}
