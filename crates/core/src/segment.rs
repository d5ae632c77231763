//! Sentence segmentation.
//!
//! A sentence ends at `.`, `!` or `?` followed by whitespace, or at the end of
//! the text. A period that closes a known abbreviation (`Mr.`, `Dr.`, ...) is
//! not a boundary.
//!
//! # Example
//!
//! ```rust
//! use glossa_core::SentenceSegmenter;
//!
//! let sentences = SentenceSegmenter::new().segment("Mr. Smith went home. He was tired.");
//! assert_eq!(sentences, vec!["Mr. Smith went home.", "He was tired."]);
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Abbreviations whose trailing period never ends a sentence.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &["Mr", "Mrs", "Ms", "Dr", "Prof", "Sr", "Jr"];

/// A terminator followed by at least one whitespace character.
static BOUNDARY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

static DEFAULT_ABBREVIATION_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| abbreviation_regex(DEFAULT_ABBREVIATIONS.iter().copied()));

/// Splits plain text into sentences.
///
/// The abbreviation list is fixed at construction; segmenters with different
/// lists can coexist.
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    abbreviations: Vec<String>,
    /// `None` when the list is empty.
    abbreviation_re: Option<Regex>,
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self {
            abbreviations: DEFAULT_ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
            abbreviation_re: DEFAULT_ABBREVIATION_RE.clone(),
        }
    }
}

impl SentenceSegmenter {
    /// Segmenter using [`DEFAULT_ABBREVIATIONS`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Segmenter with a custom abbreviation list.
    ///
    /// Entries are matched case-sensitively on a word boundary and given
    /// without their trailing period. Blank entries are ignored.
    pub fn with_abbreviations<I, S>(abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let abbreviations: Vec<String> = abbreviations
            .into_iter()
            .map(Into::into)
            .map(|a| a.trim().trim_end_matches('.').to_string())
            .filter(|a| !a.is_empty())
            .collect();
        let abbreviation_re = abbreviation_regex(abbreviations.iter().map(String::as_str));
        Self { abbreviations, abbreviation_re }
    }

    pub fn abbreviations(&self) -> &[String] {
        &self.abbreviations
    }

    /// Split `text` into trimmed, non-empty sentences in source order.
    ///
    /// Each sentence keeps its terminator; runs such as `?!` stay together
    /// because only the last character of a run is followed by whitespace.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let protected = self.protected_periods(text);

        let mut sentences = Vec::new();
        let mut start = 0;
        for boundary in BOUNDARY_RE.find_iter(text) {
            if protected.contains(&boundary.start()) {
                continue;
            }
            let end = boundary.start() + 1;
            push_trimmed(&mut sentences, &text[start..end]);
            start = boundary.end();
        }
        push_trimmed(&mut sentences, &text[start..]);

        sentences
    }

    /// Byte offsets of periods that close an abbreviation.
    fn protected_periods(&self, text: &str) -> HashSet<usize> {
        match &self.abbreviation_re {
            Some(re) => re.find_iter(text).map(|m| m.end() - 1).collect(),
            None => HashSet::new(),
        }
    }
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}

/// `\b(?:Prof|Mrs|...)\.` with longer entries first so `Mrs` wins over `Mr`.
fn abbreviation_regex<'s>(abbreviations: impl Iterator<Item = &'s str>) -> Option<Regex> {
    let mut escaped: Vec<String> = abbreviations.map(regex::escape).collect();
    if escaped.is_empty() {
        return None;
    }
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();

    match Regex::new(&format!(r"\b(?:{})\.", escaped.join("|"))) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, "abbreviation pattern rejected, abbreviations disabled");
            None
        }
    }
}
