/// Word stemming matching the training-time preprocessing.
///
/// The `porter` algorithm is Porter's suffix-stripping algorithm with the extensions
/// NLTK applies by default (irregular forms, short-word passthrough, the `ies`/`ied`
/// four-letter cases, the stricter `y` rule and the extra step-2 suffixes). A bundle
/// may also carry an exception table that overrides the algorithm word by word.
use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StemAlgorithm {
    Porter,
    /// Identity transform, for bundles trained without stemming.
    None,
}

/// Stemmer section of the bundle file.
#[derive(Debug, Clone, Deserialize)]
pub struct StemmerSpec {
    pub algorithm: StemAlgorithm,
    #[serde(default)]
    pub exceptions: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Stemmer {
    algorithm: StemAlgorithm,
    exceptions: HashMap<String, String>,
}

impl Stemmer {
    pub fn new(algorithm: StemAlgorithm) -> Self {
        Self {
            algorithm,
            exceptions: HashMap::new(),
        }
    }

    pub fn from_spec(spec: StemmerSpec) -> Self {
        Self {
            algorithm: spec.algorithm,
            exceptions: spec.exceptions,
        }
    }

    pub fn stem(&self, word: &str) -> String {
        if let Some(stem) = self.exceptions.get(word) {
            return stem.clone();
        }
        match self.algorithm {
            StemAlgorithm::Porter => porter_stem(word),
            StemAlgorithm::None => word.to_string(),
        }
    }
}

type Condition = fn(&[char]) -> bool;

const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("sky", "sky"),
    ("skies", "sky"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("news", "news"),
    ("innings", "inning"),
    ("inning", "inning"),
    ("outings", "outing"),
    ("outing", "outing"),
    ("cannings", "canning"),
    ("canning", "canning"),
    ("howe", "howe"),
    ("proceed", "proceed"),
    ("exceed", "exceed"),
    ("succeed", "succeed"),
];

/// Stem a single word with the Porter algorithm.
pub fn porter_stem(word: &str) -> String {
    let lower = word.to_lowercase();
    if let Some((_, stem)) = IRREGULAR_FORMS.iter().find(|(form, _)| *form == lower) {
        return stem.to_string();
    }

    let w: Vec<char> = lower.chars().collect();
    if w.len() <= 2 {
        return lower;
    }

    let w = step1a(w);
    let w = step1b(w);
    let w = step1c(w);
    let w = step2(w);
    let w = step3(w);
    let w = step4(w);
    let w = step5a(w);
    let w = step5b(w);
    w.into_iter().collect()
}

fn is_consonant(w: &[char], i: usize) -> bool {
    match w[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

/// Porter's `m`: the number of vowel-consonant sequences in `stem`.
fn measure(stem: &[char]) -> usize {
    let mut m = 0;
    let mut prev_vowel = false;
    for i in 0..stem.len() {
        let consonant = is_consonant(stem, i);
        if consonant && prev_vowel {
            m += 1;
        }
        prev_vowel = !consonant;
    }
    m
}

fn has_positive_measure(stem: &[char]) -> bool {
    measure(stem) > 0
}

fn measure_gt_1(stem: &[char]) -> bool {
    measure(stem) > 1
}

fn ends_with_consonant(stem: &[char]) -> bool {
    stem.len() > 1 && is_consonant(stem, stem.len() - 1)
}

/// Measure is taken over the stem plus the retained `l` (`logi` → `log`, `ll` → `l`).
fn positive_measure_with_l(stem: &[char]) -> bool {
    has_positive_measure(&with_suffix(stem, "l"))
}

fn measure_gt_1_with_l(stem: &[char]) -> bool {
    measure_gt_1(&with_suffix(stem, "l"))
}

fn ion_condition(stem: &[char]) -> bool {
    measure_gt_1(stem) && matches!(stem.last(), Some('s') | Some('t'))
}

fn contains_vowel(stem: &[char]) -> bool {
    (0..stem.len()).any(|i| !is_consonant(stem, i))
}

fn ends_double_consonant(w: &[char]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

fn ends_cvc(w: &[char]) -> bool {
    let n = w.len();
    (n >= 3
        && is_consonant(w, n - 3)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 1)
        && !matches!(w[n - 1], 'w' | 'x' | 'y'))
        || (n == 2 && !is_consonant(w, 0) && is_consonant(w, 1))
}

fn ends_with(w: &[char], suffix: &str) -> bool {
    let n = suffix.len();
    w.len() >= n && w[w.len() - n..].iter().copied().eq(suffix.chars())
}

fn with_suffix(stem: &[char], suffix: &str) -> Vec<char> {
    let mut out = stem.to_vec();
    out.extend(suffix.chars());
    out
}

/// Apply the first rule whose suffix matches. A matching rule whose condition fails
/// still ends the search and leaves the word unchanged.
fn apply_rules(w: Vec<char>, rules: &[(&str, &str, Option<Condition>)]) -> Vec<char> {
    for &(suffix, replacement, condition) in rules {
        if ends_with(&w, suffix) {
            let stem = &w[..w.len() - suffix.len()];
            if condition.map_or(true, |holds| holds(stem)) {
                return with_suffix(stem, replacement);
            }
            return w;
        }
    }
    w
}

fn step1a(w: Vec<char>) -> Vec<char> {
    if w.len() == 4 && ends_with(&w, "ies") {
        return with_suffix(&w[..1], "ie");
    }
    apply_rules(
        w,
        &[
            ("sses", "ss", None),
            ("ies", "i", None),
            ("ss", "ss", None),
            ("s", "", None),
        ],
    )
}

fn step1b(w: Vec<char>) -> Vec<char> {
    if ends_with(&w, "ied") {
        let stem = &w[..w.len() - 3];
        return if w.len() == 4 {
            with_suffix(stem, "ie")
        } else {
            with_suffix(stem, "i")
        };
    }

    if ends_with(&w, "eed") {
        let stem = &w[..w.len() - 3];
        return if measure(stem) > 0 {
            with_suffix(stem, "ee")
        } else {
            w
        };
    }

    let mut intermediate = None;
    for suffix in ["ed", "ing"] {
        if ends_with(&w, suffix) {
            let stem = &w[..w.len() - suffix.len()];
            if contains_vowel(stem) {
                intermediate = Some(stem.to_vec());
                break;
            }
        }
    }
    let Some(stem) = intermediate else {
        return w;
    };

    if ends_with(&stem, "at") || ends_with(&stem, "bl") || ends_with(&stem, "iz") {
        return with_suffix(&stem, "e");
    }
    if ends_double_consonant(&stem) {
        let last = stem[stem.len() - 1];
        if matches!(last, 'l' | 's' | 'z') {
            return stem;
        }
        return stem[..stem.len() - 1].to_vec();
    }
    if measure(&stem) == 1 && ends_cvc(&stem) {
        return with_suffix(&stem, "e");
    }
    stem
}

fn step1c(w: Vec<char>) -> Vec<char> {
    let condition: Option<Condition> = Some(ends_with_consonant);
    apply_rules(w, &[("y", "i", condition)])
}

fn step2(w: Vec<char>) -> Vec<char> {
    if ends_with(&w, "alli") && has_positive_measure(&w[..w.len() - 4]) {
        return step2(with_suffix(&w[..w.len() - 4], "al"));
    }

    let pm: Option<Condition> = Some(has_positive_measure);
    let logi: Option<Condition> = Some(positive_measure_with_l);
    apply_rules(
        w,
        &[
            ("ational", "ate", pm),
            ("tional", "tion", pm),
            ("enci", "ence", pm),
            ("anci", "ance", pm),
            ("izer", "ize", pm),
            ("bli", "ble", pm),
            ("alli", "al", pm),
            ("entli", "ent", pm),
            ("eli", "e", pm),
            ("ousli", "ous", pm),
            ("ization", "ize", pm),
            ("ation", "ate", pm),
            ("ator", "ate", pm),
            ("alism", "al", pm),
            ("iveness", "ive", pm),
            ("fulness", "ful", pm),
            ("ousness", "ous", pm),
            ("aliti", "al", pm),
            ("iviti", "ive", pm),
            ("biliti", "ble", pm),
            ("fulli", "ful", pm),
            ("logi", "log", logi),
        ],
    )
}

fn step3(w: Vec<char>) -> Vec<char> {
    let pm: Option<Condition> = Some(has_positive_measure);
    apply_rules(
        w,
        &[
            ("icate", "ic", pm),
            ("ative", "", pm),
            ("alize", "al", pm),
            ("iciti", "ic", pm),
            ("ical", "ic", pm),
            ("ful", "", pm),
            ("ness", "", pm),
        ],
    )
}

fn step4(w: Vec<char>) -> Vec<char> {
    let gt1: Option<Condition> = Some(measure_gt_1);
    let ion: Option<Condition> = Some(ion_condition);
    apply_rules(
        w,
        &[
            ("al", "", gt1),
            ("ance", "", gt1),
            ("ence", "", gt1),
            ("er", "", gt1),
            ("ic", "", gt1),
            ("able", "", gt1),
            ("ible", "", gt1),
            ("ant", "", gt1),
            ("ement", "", gt1),
            ("ment", "", gt1),
            ("ent", "", gt1),
            ("ion", "", ion),
            ("ou", "", gt1),
            ("ism", "", gt1),
            ("ate", "", gt1),
            ("iti", "", gt1),
            ("ous", "", gt1),
            ("ive", "", gt1),
            ("ize", "", gt1),
        ],
    )
}

fn step5a(w: Vec<char>) -> Vec<char> {
    if ends_with(&w, "e") {
        let stem = &w[..w.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_vec();
        }
    }
    w
}

fn step5b(w: Vec<char>) -> Vec<char> {
    let condition: Option<Condition> = Some(measure_gt_1_with_l);
    apply_rules(w, &[("ll", "l", condition)])
}
