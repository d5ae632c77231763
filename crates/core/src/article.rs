//! The structured article tree.
//!
//! A [`ParsedArticle`] is built once per request by the
//! [`ArticleStructurer`](crate::ArticleStructurer) and never mutated afterwards:
//! fields are private and exposed through accessors. Positions inside the tree
//! are stable, so a [`SentenceAddress`] can key caches of translations or glosses.
//!
//! The JSON shape is
//!
//! ```text
//! { "title": "...", "source": "...",
//!   "paragraphs": [ { "sentences": [ { "text": "...", "words": ["..."] } ] } ] }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single punctuation-stripped token. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Word {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Word {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One sentence: its verbatim text and the words in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    text: String,
    words: Vec<Word>,
}

impl Sentence {
    pub(crate) fn new(text: String, words: Vec<Word>) -> Self {
        Self { text, words }
    }

    /// The sentence as it appeared in the article, terminator included.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    sentences: Vec<Sentence>,
}

impl Paragraph {
    pub(crate) fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Sentence texts joined by single spaces.
    pub fn text(&self) -> String {
        self.sentences.iter().map(Sentence::text).collect::<Vec<_>>().join(" ")
    }
}

/// Position of a sentence inside a [`ParsedArticle`], both indices zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SentenceAddress {
    pub paragraph: usize,
    pub sentence: usize,
}

impl fmt::Display for SentenceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.paragraph, self.sentence)
    }
}

/// A fully segmented article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedArticle {
    title: String,
    /// Host of the page the article came from.
    source: String,
    paragraphs: Vec<Paragraph>,
}

impl ParsedArticle {
    pub(crate) fn new(title: String, source: String, paragraphs: Vec<Paragraph>) -> Self {
        Self { title, source, paragraphs }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn sentence(&self, paragraph: usize, sentence: usize) -> Option<&Sentence> {
        self.paragraphs.get(paragraph)?.sentences.get(sentence)
    }

    pub fn word(&self, paragraph: usize, sentence: usize, word: usize) -> Option<&Word> {
        self.sentence(paragraph, sentence)?.words.get(word)
    }

    /// Every sentence with its address, in reading order.
    pub fn sentences(&self) -> impl Iterator<Item = (SentenceAddress, &Sentence)> {
        self.paragraphs.iter().enumerate().flat_map(|(p, paragraph)| {
            paragraph
                .sentences
                .iter()
                .enumerate()
                .map(move |(s, sentence)| (SentenceAddress { paragraph: p, sentence: s }, sentence))
        })
    }

    pub fn sentence_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.sentences.len()).sum()
    }

    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().flat_map(|p| &p.sentences).map(|s| s.words.len()).sum()
    }

    /// True when no paragraph survived segmentation.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Compact JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain text: the title, then each paragraph with one sentence per line,
    /// paragraphs separated by a blank line.
    pub fn to_text(&self) -> String {
        let mut blocks = Vec::with_capacity(self.paragraphs.len() + 1);
        if !self.title.is_empty() {
            blocks.push(self.title.clone());
        }
        blocks.extend(
            self.paragraphs
                .iter()
                .map(|p| p.sentences.iter().map(Sentence::text).collect::<Vec<_>>().join("\n")),
        );
        blocks.join("\n\n")
    }
}
