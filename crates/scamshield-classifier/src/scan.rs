use serde::{Deserialize, Serialize};

use crate::bundle::ArtifactBundle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Scam,
    Human,
}

impl Label {
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            Label::Scam
        } else {
            Label::Human
        }
    }
}

/// Outcome of classifying one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// The input with surrounding whitespace removed.
    pub text: String,
    pub prediction: u8,
    pub label: Label,
    pub prob_scam: f64,
    pub prob_not_scam: f64,
}

impl ArtifactBundle {
    /// Normalize, vectorize and classify `text`.
    pub fn scan(&self, text: &str) -> ScanResult {
        let normalized = self.normalizer().normalize(text);
        let features = self.vectorizer().transform(&normalized);
        let prediction = self.classifier().predict(&features);

        ScanResult {
            text: text.trim().to_string(),
            prediction: prediction.class,
            label: Label::from_class(prediction.class),
            prob_scam: prediction.probabilities[1],
            prob_not_scam: prediction.probabilities[0],
        }
    }
}
