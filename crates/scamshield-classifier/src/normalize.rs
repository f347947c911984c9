use std::collections::HashSet;

use crate::stemmer::Stemmer;

/// Converts raw text into the single normalized string the vectorizer was fitted on.
///
/// Steps, in order: lowercase, drop ASCII punctuation, split on whitespace, drop
/// stopwords, stem, rejoin with single spaces. Stopwords are matched before stemming.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
    stemmer: Stemmer,
}

impl Normalizer {
    pub fn new(stopwords: HashSet<String>, stemmer: Stemmer) -> Self {
        Self { stopwords, stemmer }
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    /// Normalized tokens for `text`; empty when nothing survives.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let cleaned = strip_ascii_punctuation(&text.to_lowercase());
        cleaned
            .split(is_python_whitespace)
            .filter(|token| !token.is_empty())
            .filter(|token| !self.stopwords.contains(*token))
            .map(|token| self.stemmer.stem(token))
            .collect()
    }

    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }
}

/// Separators of Python's `str.split()`: Unicode whitespace plus the four
/// information separators U+001C..=U+001F.
fn is_python_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Remove ``!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~``. Non-ASCII punctuation is kept.
pub fn strip_ascii_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}
