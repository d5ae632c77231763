//! Main-content extraction.
//!
//! [`ContentExtractor`] turns a raw HTML page into an [`ExtractedContent`]: the
//! article title, the plain body text with paragraphs separated by blank lines,
//! and the host of the page URL.
//!
//! # Example
//!
//! ```rust
//! use glossa_core::ContentExtractor;
//!
//! let html = r#"<html><head><title>Test Article</title></head><body>
//!     <article><p>First sentence. Second sentence.</p><p>Third sentence.</p></article>
//! </body></html>"#;
//!
//! let content = ContentExtractor::new().extract(html, "https://example.com/a").unwrap();
//! assert_eq!(content.title, "Test Article");
//! assert_eq!(content.source_domain, "example.com");
//! assert_eq!(content.body_text, "First sentence. Second sentence.\n\nThird sentence.");
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ExtractionError;
use crate::metadata::clean_title;
use crate::parse::{Document, Element};
use crate::preprocess::PreprocessConfig;
use crate::scoring::{ScoreConfig, ScoreResult, calculate_score, link_density, normalized_len, paragraph_score};
use crate::text::block_paragraphs;

/// Containers that are scored as potential article bodies.
const CANDIDATE_SELECTOR: &str = "div, article, section, main, td, blockquote, pre";

/// Containers that are scored no matter how little text they hold.
const ALWAYS_CANDIDATES: &[&str] = &["article", "section", "main"];

/// Elements whose text is propagated to their parent and grandparent.
const PARAGRAPH_SELECTOR: &str = "p, pre, td, blockquote";

/// Configuration for content extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Minimum score the top candidate needs (default: 10.0)
    pub min_score_threshold: f64,
    /// Reject a below-threshold candidate even when it holds paragraphs (default: false)
    pub strict_threshold: bool,
    /// Containers other than article/section/main need `char_threshold / 10` characters to be seeded (default: 500)
    pub char_threshold: usize,
    /// Paragraphs shorter than this do not propagate a score (default: 25)
    pub min_paragraph_chars: usize,
    /// Maximum elements considered per selector pass, 0 = unlimited (default: 1000)
    pub max_elements: usize,
    /// Sibling score threshold as a multiple of the top score (default: 0.2)
    pub sibling_threshold: f64,
    /// Text blocks with a higher share of link text are dropped (default: 0.5)
    pub max_link_density: f64,
    /// Boilerplate removal applied before scoring
    pub preprocess: PreprocessConfig,
    /// Weights used by the scorer
    pub scoring: ScoreConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_score_threshold: 10.0,
            strict_threshold: false,
            char_threshold: 500,
            min_paragraph_chars: 25,
            max_elements: 1000,
            sibling_threshold: 0.2,
            max_link_density: 0.5,
            preprocess: PreprocessConfig::default(),
            scoring: ScoreConfig::default(),
        }
    }
}

impl ExtractConfig {
    /// Creates a new builder for ExtractConfig.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glossa_core::ExtractConfig;
    ///
    /// let config = ExtractConfig::builder().min_score(25.0).char_threshold(1000).build();
    /// assert_eq!(config.min_score_threshold, 25.0);
    /// ```
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::new()
    }
}

/// Builder for [`ExtractConfig`].
#[derive(Debug, Clone, Default)]
pub struct ExtractConfigBuilder {
    config: ExtractConfig,
}

impl ExtractConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum score threshold.
    pub fn min_score(mut self, value: f64) -> Self {
        self.config.min_score_threshold = value;
        self
    }

    /// Sets whether the minimum score is a hard limit.
    pub fn strict(mut self, value: bool) -> Self {
        self.config.strict_threshold = value;
        self
    }

    /// Sets the character threshold.
    pub fn char_threshold(mut self, value: usize) -> Self {
        self.config.char_threshold = value;
        self
    }

    /// Sets the minimum paragraph length that propagates a score.
    pub fn min_paragraph_chars(mut self, value: usize) -> Self {
        self.config.min_paragraph_chars = value;
        self
    }

    /// Sets the maximum number of elements to consider (0 = unlimited).
    pub fn max_elements(mut self, value: usize) -> Self {
        self.config.max_elements = value;
        self
    }

    /// Sets the sibling score threshold.
    pub fn sibling_threshold(mut self, value: f64) -> Self {
        self.config.sibling_threshold = value;
        self
    }

    /// Sets the link density above which a text block is dropped.
    pub fn max_link_density(mut self, value: f64) -> Self {
        self.config.max_link_density = value;
        self
    }

    /// Sets whether unlikely candidates are removed before scoring.
    pub fn remove_unlikely(mut self, value: bool) -> Self {
        self.config.preprocess.remove_unlikely = value;
        self
    }

    /// Replaces the preprocessing configuration.
    pub fn preprocess(mut self, value: PreprocessConfig) -> Self {
        self.config.preprocess = value;
        self
    }

    /// Replaces the scoring weights.
    pub fn scoring(mut self, value: ScoreConfig) -> Self {
        self.config.scoring = value;
        self
    }

    /// Builds the ExtractConfig.
    pub fn build(self) -> ExtractConfig {
        self.config
    }
}

/// A page as handed to the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    html: String,
    source_url: String,
}

impl RawDocument {
    pub fn new(html: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self { html: html.into(), source_url: source_url.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

/// The main content of a page as plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Article headline, empty when the page has none
    pub title: String,
    /// Plain text, paragraphs separated by `"\n\n"`
    pub body_text: String,
    /// Host of the source URL
    pub source_domain: String,
}

/// A scored container.
#[derive(Debug, Clone)]
struct Candidate<'a> {
    element: Element<'a>,
    score_result: ScoreResult,
    /// Score received from paragraphs below this element
    paragraph_boost: f64,
}

impl<'a> Candidate<'a> {
    fn new(element: Element<'a>, score_result: ScoreResult) -> Self {
        Self { element, score_result, paragraph_boost: 0.0 }
    }

    /// Own score plus paragraph boost, the boost discounted by link density.
    fn score(&self) -> f64 {
        self.score_result.final_score + self.paragraph_boost * (1.0 - self.score_result.link_density)
    }
}

/// Readability-style extractor for article pages.
#[derive(Debug, Clone, Default)]
pub struct ContentExtractor {
    config: ExtractConfig,
}

impl ContentExtractor {
    /// Creates an extractor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract the title, body text and source domain from `html`.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::EmptyDocument`] if `html` is blank
    /// - [`ExtractionError::InvalidUrl`] if `url` is not an absolute http(s) URL with a host
    /// - [`ExtractionError::NoContent`] if no candidate exists or the chosen block has no text
    /// - [`ExtractionError::NotReadable`] if the best candidate scores below the threshold and
    ///   either holds no paragraphs or the threshold is strict
    pub fn extract(&self, html: &str, url: &str) -> Result<ExtractedContent, ExtractionError> {
        if html.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }
        let source_domain = source_domain(url)?;

        let title = Document::parse(html).extract_title().map(|t| clean_title(&t)).unwrap_or_default();

        let doc = Document::parse_with_preprocessing(html, &self.config.preprocess);
        let candidates = score_candidates(&doc, &self.config)?;
        tracing::debug!(candidates = candidates.len(), "scored content candidates");

        let top = select_top_candidate(&candidates, &self.config)?;
        tracing::debug!(tag = %top.element.tag_name(), score = top.score(), "selected top candidate");

        let selected = select_siblings(top, &candidates, &self.config);
        let paragraphs = block_paragraphs(&selected, &title, self.config.max_link_density);
        if paragraphs.is_empty() {
            return Err(ExtractionError::NoContent);
        }
        tracing::debug!(elements = selected.len(), paragraphs = paragraphs.len(), "extracted body text");

        Ok(ExtractedContent { title, body_text: paragraphs.join("\n\n"), source_domain })
    }

    /// Extract from a [`RawDocument`].
    pub fn extract_document(&self, document: &RawDocument) -> Result<ExtractedContent, ExtractionError> {
        self.extract(document.html(), document.source_url())
    }
}

/// Extract with the default configuration.
pub fn extract(html: &str, url: &str) -> Result<ExtractedContent, ExtractionError> {
    ContentExtractor::new().extract(html, url)
}

/// Host component of an absolute http(s) URL.
pub fn source_domain(url: &str) -> Result<String, ExtractionError> {
    let parsed = Url::parse(url).map_err(|e| ExtractionError::InvalidUrl(format!("{}: {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExtractionError::InvalidUrl(format!("{}: unsupported scheme {}", url, parsed.scheme())));
    }

    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| ExtractionError::InvalidUrl(format!("{}: missing host", url)))
}

/// Score every candidate container and propagate paragraph scores upwards.
///
/// Parents receive a paragraph's full score and grandparents half of it;
/// ancestors that were not seeded become candidates on first contact.
fn score_candidates<'a>(doc: &'a Document, config: &ExtractConfig) -> Result<Vec<Candidate<'a>>, ExtractionError> {
    let limit = if config.max_elements == 0 { usize::MAX } else { config.max_elements };
    let mut candidates: Vec<Candidate<'a>> = Vec::new();
    let mut index = HashMap::new();

    for element in doc.select(CANDIDATE_SELECTOR)?.into_iter().take(limit) {
        let tag = element.tag_name();
        if !ALWAYS_CANDIDATES.contains(&tag.as_str()) && element.text_len() < config.char_threshold / 10 {
            continue;
        }
        index.insert(element.node_id(), candidates.len());
        candidates.push(Candidate::new(element, calculate_score(&element, &config.scoring)));
    }

    for paragraph in doc.select(PARAGRAPH_SELECTOR)?.into_iter().take(limit) {
        let text = paragraph.text();
        if normalized_len(&text) < config.min_paragraph_chars {
            continue;
        }
        let score = paragraph_score(&text, &config.scoring);

        for (level, ancestor) in paragraph.ancestors().take(2).enumerate() {
            if ancestor.tag_name() == "html" {
                break;
            }
            let slot = *index.entry(ancestor.node_id()).or_insert_with(|| {
                candidates.push(Candidate::new(ancestor, calculate_score(&ancestor, &config.scoring)));
                candidates.len() - 1
            });
            candidates[slot].paragraph_boost += if level == 0 { score } else { score / 2.0 };
        }
    }

    Ok(candidates)
}

/// Select the top candidate from the list
///
/// Returns the highest scoring candidate if it meets the minimum threshold.
/// Below the threshold the candidate is still used when paragraphs fed its
/// score and its link density is acceptable, unless `strict_threshold` is set;
/// otherwise returns a NotReadable error.
fn select_top_candidate<'c, 'a>(
    candidates: &'c [Candidate<'a>], config: &ExtractConfig,
) -> Result<&'c Candidate<'a>, ExtractionError> {
    let top = candidates.iter().max_by(|a, b| compare_candidates(a, b)).ok_or(ExtractionError::NoContent)?;

    if top.score() >= config.min_score_threshold {
        return Ok(top);
    }

    let holds_paragraphs = top.paragraph_boost > 0.0 && top.score_result.link_density <= config.max_link_density;
    if !config.strict_threshold && holds_paragraphs {
        tracing::debug!(
            score = top.score(),
            threshold = config.min_score_threshold,
            "falling back to best candidate below threshold"
        );
        return Ok(top);
    }

    Err(ExtractionError::NotReadable { score: top.score(), threshold: config.min_score_threshold })
}

/// The top candidate together with the siblings worth keeping, in document order.
///
/// A sibling is kept when its own candidate score reaches
/// `top score * sibling_threshold`, or when it is a `p` longer than 80
/// characters with link density below 0.25.
fn select_siblings<'a>(top: &Candidate<'a>, candidates: &[Candidate<'a>], config: &ExtractConfig) -> Vec<Element<'a>> {
    let Some(parent) = top.element.parent() else {
        return vec![top.element];
    };
    let threshold = top.score() * config.sibling_threshold;

    let selected: Vec<Element<'a>> = parent
        .child_elements()
        .filter(|sibling| {
            if *sibling == top.element {
                return true;
            }
            if candidates.iter().any(|c| c.element == *sibling && c.score() >= threshold) {
                return true;
            }
            sibling.tag_name() == "p" && sibling.text_len() > 80 && link_density(sibling) < 0.25
        })
        .collect();

    tracing::trace!(siblings = selected.len() - 1, "selected siblings");
    selected
}

fn compare_candidates(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.score()
        .partial_cmp(&b.score())
        .unwrap_or(Ordering::Equal)
        .then_with(|| candidate_priority(&a.element.tag_name()).cmp(&candidate_priority(&b.element.tag_name())))
        .then_with(|| a.element.text_len().cmp(&b.element.text_len()))
}

fn candidate_priority(tag_name: &str) -> u8 {
    match tag_name {
        "article" | "main" | "section" => 3,
        "div" => 2,
        _ => 1,
    }
}
