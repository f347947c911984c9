/// Bag-of-words / TF-IDF feature extraction over a vocabulary fitted at training time.
///
/// The normalized string is re-tokenized with the vectorizer's own token pattern (by
/// default words of two or more word characters), so single-letter tokens produced by
/// normalization never reach the model. Terms missing from the vocabulary are dropped.
use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use serde::Deserialize;

use crate::error::ArtifactError;

pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// `DEFAULT_TOKEN_PATTERN` under Python's `\w`, which is letters, numbers and `_`
/// but not combining marks. A greedy run of two or more such characters is
/// bounded by non-word characters on both sides, so no `\b` is needed.
const PYTHON_WORD_TOKENS: &str = r"[\p{L}\p{N}_]{2,}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    L1,
    #[default]
    L2,
    None,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum Weighting {
    /// Raw term counts.
    Count,
    Tfidf {
        idf: Vec<f64>,
        #[serde(default)]
        norm: Norm,
        #[serde(default)]
        sublinear_tf: bool,
    },
}

/// Vectorizer section of the bundle file.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerSpec {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub binary: bool,
    pub weighting: Weighting,
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Sparse feature vector: `(index, value)` pairs sorted by index, zeros omitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    pub dimension: usize,
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries.iter().map(|&(i, v)| v * weights[i]).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Vectorizer {
    vocabulary: HashMap<String, usize>,
    token_pattern: Regex,
    lowercase: bool,
    ngram_range: (usize, usize),
    binary: bool,
    weighting: Weighting,
}

impl Vectorizer {
    /// Build a vectorizer, checking the vocabulary and weights for consistency.
    pub fn from_spec(spec: VectorizerSpec) -> Result<Self, ArtifactError> {
        let dimension = spec.vocabulary.len();
        if dimension == 0 {
            return Err(ArtifactError::Integrity("vocabulary is empty".to_string()));
        }

        let mut seen = vec![false; dimension];
        for (term, &index) in &spec.vocabulary {
            if index >= dimension {
                return Err(ArtifactError::Integrity(format!(
                    "vocabulary index {index} for {term:?} is outside 0..{dimension}"
                )));
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(ArtifactError::Integrity(format!(
                    "vocabulary index {index} is assigned more than once"
                )));
            }
        }

        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::Integrity(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        if let Weighting::Tfidf { idf, .. } = &spec.weighting {
            if idf.len() != dimension {
                return Err(ArtifactError::Integrity(format!(
                    "idf has {} weights but vocabulary has {dimension} terms",
                    idf.len()
                )));
            }
            if idf.iter().any(|w| !w.is_finite()) {
                return Err(ArtifactError::Integrity("idf contains non-finite weights".to_string()));
            }
        }

        let token_pattern = compile_token_pattern(&spec.token_pattern)?;

        Ok(Self {
            vocabulary: spec.vocabulary,
            token_pattern,
            lowercase: spec.lowercase,
            ngram_range: spec.ngram_range,
            binary: spec.binary,
            weighting: spec.weighting,
        })
    }

    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn transform(&self, document: &str) -> SparseVector {
        let document = if self.lowercase {
            document.to_lowercase()
        } else {
            document.to_string()
        };
        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&document)
            .map(|m| m.as_str())
            .collect();

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in word_ngrams(&tokens, self.ngram_range) {
            if let Some(&index) = self.vocabulary.get(term.as_str()) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(i, tf)| (i, if self.binary { 1.0 } else { tf }))
            .collect();

        if let Weighting::Tfidf {
            idf,
            norm,
            sublinear_tf,
        } = &self.weighting
        {
            for (i, value) in entries.iter_mut() {
                if *sublinear_tf {
                    *value = 1.0 + value.ln();
                }
                *value *= idf[*i];
            }
            normalize(&mut entries, *norm);
        }

        SparseVector {
            dimension: self.dimension(),
            entries,
        }
    }
}

/// Compile a bundle token pattern. The sklearn default is rewritten so that `\w`
/// and `\b` keep Python's meaning; custom patterns use Rust regex semantics.
fn compile_token_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    match pattern {
        DEFAULT_TOKEN_PATTERN | r"\b\w\w+\b" => Regex::new(PYTHON_WORD_TOKENS),
        custom => Regex::new(custom),
    }
}

fn word_ngrams(tokens: &[&str], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut terms = Vec::new();
    for n in min_n..=max_n {
        if n > tokens.len() {
            break;
        }
        terms.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    terms
}

fn normalize(entries: &mut [(usize, f64)], norm: Norm) {
    let total = match norm {
        Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
        Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
        Norm::None => return,
    };
    if total > 0.0 {
        for (_, v) in entries.iter_mut() {
            *v /= total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(terms: &[&str]) -> HashMap<String, usize> {
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect()
    }

    fn count_spec(terms: &[&str]) -> VectorizerSpec {
        VectorizerSpec {
            vocabulary: vocabulary(terms),
            token_pattern: default_token_pattern(),
            lowercase: true,
            ngram_range: (1, 1),
            binary: false,
            weighting: Weighting::Count,
        }
    }

    #[test]
    fn test_counts_in_vocabulary_terms() {
        let v = Vectorizer::from_spec(count_spec(&["free", "prize", "lunch"])).unwrap();
        let x = v.transform("free prize free unknown");
        assert_eq!(x.dimension, 3);
        assert_eq!(x.entries, vec![(0, 2.0), (1, 1.0)]);
    }

    #[test]
    fn test_single_character_tokens_are_ignored() {
        let v = Vectorizer::from_spec(count_spec(&["a", "win"])).unwrap();
        assert_eq!(v.transform("a win").entries, vec![(1, 1.0)]);
    }

    #[test]
    fn test_combining_marks_break_tokens() {
        // Devanagari vowel signs and virama are marks, not word characters
        let v = Vectorizer::from_spec(count_spec(&["नमस", "दुनिया", "नमस्ते"])).unwrap();
        assert_eq!(v.transform("नमस्ते दुनिया").entries, vec![(0, 1.0)]);
    }

    #[test]
    fn test_default_pattern_keeps_letters_digits_underscore() {
        let v = Vectorizer::from_spec(count_spec(&["café", "24h", "win_now", "ü"])).unwrap();
        assert_eq!(
            v.transform("café 24h win_now ü").entries,
            vec![(0, 1.0), (1, 1.0), (2, 1.0)]
        );
    }

    #[test]
    fn test_custom_pattern_is_used_as_is() {
        let mut spec = count_spec(&["a", "win"]);
        spec.token_pattern = r"\w+".to_string();
        let v = Vectorizer::from_spec(spec).unwrap();
        assert_eq!(v.transform("a win").entries, vec![(0, 1.0), (1, 1.0)]);
    }

    #[test]
    fn test_empty_document_is_zero_vector() {
        let v = Vectorizer::from_spec(count_spec(&["free"])).unwrap();
        let x = v.transform("");
        assert!(x.is_empty());
        assert_eq!(x.dimension, 1);
    }

    #[test]
    fn test_binary_counts() {
        let mut spec = count_spec(&["free"]);
        spec.binary = true;
        let v = Vectorizer::from_spec(spec).unwrap();
        assert_eq!(v.transform("free free free").entries, vec![(0, 1.0)]);
    }

    #[test]
    fn test_tfidf_l2_normalized() {
        let mut spec = count_spec(&["free", "prize"]);
        spec.weighting = Weighting::Tfidf {
            idf: vec![1.0, 2.0],
            norm: Norm::L2,
            sublinear_tf: false,
        };
        let v = Vectorizer::from_spec(spec).unwrap();
        let x = v.transform("free prize");
        let norm = (1.0f64 + 4.0).sqrt();
        assert!((x.entries[0].1 - 1.0 / norm).abs() < 1e-12);
        assert!((x.entries[1].1 - 2.0 / norm).abs() < 1e-12);
    }

    #[test]
    fn test_tfidf_sublinear_without_norm() {
        let mut spec = count_spec(&["free"]);
        spec.weighting = Weighting::Tfidf {
            idf: vec![2.0],
            norm: Norm::None,
            sublinear_tf: true,
        };
        let v = Vectorizer::from_spec(spec).unwrap();
        let x = v.transform("free free");
        assert!((x.entries[0].1 - 2.0 * (1.0 + 2f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_bigrams() {
        let mut spec = count_spec(&["free", "free prize", "prize"]);
        spec.ngram_range = (1, 2);
        let v = Vectorizer::from_spec(spec).unwrap();
        assert_eq!(
            v.transform("free prize").entries,
            vec![(0, 1.0), (1, 1.0), (2, 1.0)]
        );
    }

    #[test]
    fn test_rejects_sparse_vocabulary_indices() {
        let mut spec = count_spec(&["free"]);
        spec.vocabulary.insert("prize".to_string(), 5);
        let err = Vectorizer::from_spec(spec).unwrap_err();
        assert!(matches!(err, ArtifactError::Integrity(_)), "{err}");
    }

    #[test]
    fn test_rejects_idf_length_mismatch() {
        let mut spec = count_spec(&["free", "prize"]);
        spec.weighting = Weighting::Tfidf {
            idf: vec![1.0],
            norm: Norm::L2,
            sublinear_tf: false,
        };
        assert!(Vectorizer::from_spec(spec).is_err());
    }

    #[test]
    fn test_rejects_bad_token_pattern() {
        let mut spec = count_spec(&["free"]);
        spec.token_pattern = "(".to_string();
        let err = Vectorizer::from_spec(spec).unwrap_err();
        assert!(matches!(err, ArtifactError::TokenPattern(_)));
    }
}
