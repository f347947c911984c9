use serde::Deserialize;

use crate::error::ArtifactError;
use crate::vectorizer::SparseVector;

/// Classifier section of the bundle file. Class 0 is "human", class 1 is "scam".
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    MultinomialNb {
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    },
    LogisticRegression {
        coef: Vec<f64>,
        intercept: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class index, 0 or 1.
    pub class: u8,
    /// `[P(class 0), P(class 1)]`.
    pub probabilities: [f64; 2],
}

#[derive(Debug, Clone)]
pub struct Classifier {
    spec: ClassifierSpec,
}

impl Classifier {
    /// Validate the parameters against the vectorizer's dimensionality.
    pub fn from_spec(spec: ClassifierSpec, dimension: usize) -> Result<Self, ArtifactError> {
        match &spec {
            ClassifierSpec::MultinomialNb {
                class_log_prior,
                feature_log_prob,
            } => {
                for (class, row) in feature_log_prob.iter().enumerate() {
                    if row.len() != dimension {
                        return Err(ArtifactError::Integrity(format!(
                            "feature_log_prob[{class}] has {} columns, vectorizer has {dimension}",
                            row.len()
                        )));
                    }
                }
                // smoothed training never yields -inf; anything non-finite is a broken export
                if class_log_prior
                    .iter()
                    .chain(feature_log_prob.iter().flatten())
                    .any(|v| !v.is_finite())
                {
                    return Err(ArtifactError::Integrity(
                        "naive bayes parameters must be finite".to_string(),
                    ));
                }
            }
            ClassifierSpec::LogisticRegression { coef, intercept } => {
                if coef.len() != dimension {
                    return Err(ArtifactError::Integrity(format!(
                        "coef has {} weights, vectorizer has {dimension}",
                        coef.len()
                    )));
                }
                if !intercept.is_finite() || coef.iter().any(|v| !v.is_finite()) {
                    return Err(ArtifactError::Integrity(
                        "logistic regression parameters must be finite".to_string(),
                    ));
                }
            }
        }
        Ok(Self { spec })
    }

    pub fn kind(&self) -> &'static str {
        match self.spec {
            ClassifierSpec::MultinomialNb { .. } => "multinomial_nb",
            ClassifierSpec::LogisticRegression { .. } => "logistic_regression",
        }
    }

    pub fn predict(&self, x: &SparseVector) -> Prediction {
        match &self.spec {
            ClassifierSpec::MultinomialNb {
                class_log_prior,
                feature_log_prob,
            } => {
                let jll = [
                    class_log_prior[0] + x.dot(&feature_log_prob[0]),
                    class_log_prior[1] + x.dot(&feature_log_prob[1]),
                ];
                let probabilities = softmax2(jll);
                // ties go to class 0, like argmax
                let class = u8::from(jll[1] > jll[0]);
                Prediction {
                    class,
                    probabilities,
                }
            }
            ClassifierSpec::LogisticRegression { coef, intercept } => {
                let decision = x.dot(coef) + intercept;
                let p = sigmoid(decision);
                Prediction {
                    class: u8::from(decision > 0.0),
                    probabilities: [1.0 - p, p],
                }
            }
        }
    }
}

fn softmax2(jll: [f64; 2]) -> [f64; 2] {
    let max = jll[0].max(jll[1]);
    let log_norm = max + ((jll[0] - max).exp() + (jll[1] - max).exp()).ln();
    [(jll[0] - log_norm).exp(), (jll[1] - log_norm).exp()]
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
