//! Word tokenization.

use crate::article::Word;

/// Characters removed from a sentence before it is split into words.
pub const DEFAULT_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '\'', '"', '(', ')'];

/// Splits a sentence into words with punctuation stripped.
///
/// Punctuation is removed anywhere in the sentence, not only at word edges,
/// so `"don't"` becomes `"dont"`.
///
/// ```rust
/// use glossa_core::WordTokenizer;
///
/// let words = WordTokenizer::new().tokenize("Hello, world!");
/// assert_eq!(words, vec!["Hello", "world"]);
/// ```
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    punctuation: Vec<char>,
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self { punctuation: DEFAULT_PUNCTUATION.to_vec() }
    }
}

impl WordTokenizer {
    /// Tokenizer using [`DEFAULT_PUNCTUATION`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenizer removing exactly the given characters.
    pub fn with_punctuation(punctuation: impl IntoIterator<Item = char>) -> Self {
        Self { punctuation: punctuation.into_iter().collect() }
    }

    pub fn punctuation(&self) -> &[char] {
        &self.punctuation
    }

    /// Words of `sentence` in source order. Never returns empty words.
    pub fn tokenize(&self, sentence: &str) -> Vec<Word> {
        let stripped: String = sentence.chars().filter(|c| !self.punctuation.contains(c)).collect();
        stripped.split_whitespace().map(Word::new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello, world!", &["Hello", "world"])]
    #[case("This is a sentence.", &["This", "is", "a", "sentence"])]
    #[case("I don't know.", &["I", "dont", "know"])]
    #[case("\"Quoted\" (aside); done: yes?", &["Quoted", "aside", "done", "yes"])]
    #[case("well-known  e-mail\tover\nlines", &["well-known", "e-mail", "over", "lines"])]
    #[case("Mr. Smith", &["Mr", "Smith"])]
    #[case("... !!! ,,,", &[])]
    #[case("", &[])]
    fn test_tokenize(#[case] sentence: &str, #[case] expected: &[&str]) {
        let words = WordTokenizer::new().tokenize(sentence);
        assert_eq!(words, expected);
    }

    #[test]
    fn test_default_punctuation_is_pinned() {
        assert_eq!(DEFAULT_PUNCTUATION, &['.', ',', '!', '?', ';', ':', '\'', '"', '(', ')']);
    }

    #[test]
    fn test_custom_punctuation() {
        let tokenizer = WordTokenizer::with_punctuation(['-', '.']);
        assert_eq!(tokenizer.tokenize("well-known fact, really."), vec!["wellknown", "fact,", "really"]);
    }

    #[test]
    fn test_no_empty_words() {
        let words = WordTokenizer::new().tokenize("a , b ; ( ) c");
        assert!(words.iter().all(|w| !w.as_str().is_empty()));
        assert_eq!(words, vec!["a", "b", "c"]);
    }
}
