/// Loading and integrity checking of the trained artifact bundle.
///
/// The bundle is a single versioned JSON document holding the four training-time
/// artifacts: stopword set, stemmer rules, fitted vectorizer and classifier parameters.
/// Every cross-member invariant is checked here, once, so the scan path never fails.
use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::ArtifactError;
use crate::model::{Classifier, ClassifierSpec};
use crate::normalize::Normalizer;
use crate::stemmer::{Stemmer, StemmerSpec};
use crate::vectorizer::{Vectorizer, VectorizerSpec};

pub const FORMAT_VERSION: u32 = 1;

/// On-disk layout of a bundle.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleFile {
    pub format_version: u32,
    /// Identifier of the training run that produced all four members.
    #[serde(default)]
    pub run_id: Option<String>,
    pub stopwords: Vec<String>,
    pub stemmer: StemmerSpec,
    pub vectorizer: VectorizerSpec,
    pub classifier: ClassifierSpec,
}

#[derive(Debug)]
pub struct ArtifactBundle {
    normalizer: Normalizer,
    vectorizer: Vectorizer,
    classifier: Classifier,
    fingerprint: String,
    run_id: Option<String>,
}

impl ArtifactBundle {
    /// Read and check the bundle at `path`.
    ///
    /// When `expected_sha256` is given the file digest must match it before anything
    /// is parsed.
    pub fn load(
        path: impl AsRef<Path>,
        expected_sha256: Option<&str>,
    ) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let fingerprint = sha256_hex(&bytes);
        if let Some(expected) = expected_sha256 {
            if !expected.trim().eq_ignore_ascii_case(&fingerprint) {
                return Err(ArtifactError::ChecksumMismatch {
                    expected: expected.trim().to_lowercase(),
                    actual: fingerprint,
                });
            }
        }

        let bundle = Self::parse(&bytes, fingerprint)?;
        info!(
            path = %path.display(),
            fingerprint = %bundle.fingerprint,
            run_id = bundle.run_id.as_deref().unwrap_or("unknown"),
            vocabulary = bundle.vectorizer.dimension(),
            stopwords = bundle.normalizer.stopword_count(),
            classifier = bundle.classifier.kind(),
            "artifact bundle loaded"
        );
        Ok(bundle)
    }

    /// Build a bundle from in-memory JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        Self::parse(bytes, sha256_hex(bytes))
    }

    fn parse(bytes: &[u8], fingerprint: String) -> Result<Self, ArtifactError> {
        let file: BundleFile = serde_json::from_slice(bytes)?;
        Self::from_file(file, fingerprint)
    }

    fn from_file(file: BundleFile, fingerprint: String) -> Result<Self, ArtifactError> {
        if file.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: file.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let stopwords: HashSet<String> = file.stopwords.into_iter().collect();
        let normalizer = Normalizer::new(stopwords, Stemmer::from_spec(file.stemmer));
        let vectorizer = Vectorizer::from_spec(file.vectorizer)?;
        let classifier = Classifier::from_spec(file.classifier, vectorizer.dimension())?;

        Ok(Self {
            normalizer,
            vectorizer,
            classifier,
            fingerprint,
            run_id: file.run_id,
        })
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn vectorizer(&self) -> &Vectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Lowercase hex SHA-256 of the bundle bytes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex_lower(&digest)
}

fn hex_lower(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

/// Demo bundle shipped in `models/demo.json`, used as a fixture by tests.
#[cfg(test)]
pub(crate) const DEMO_BUNDLE: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/demo.json"));

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn minimal() -> serde_json::Value {
        json!({
            "format_version": 1,
            "stopwords": ["the"],
            "stemmer": {"algorithm": "porter"},
            "vectorizer": {
                "vocabulary": {"free": 0, "lunch": 1},
                "weighting": {"scheme": "count"}
            },
            "classifier": {"kind": "logistic_regression", "coef": [1.0, -1.0], "intercept": 0.0}
        })
    }

    fn bytes(value: &serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(value).unwrap()
    }

    #[test]
    fn test_loads_demo_bundle() {
        let bundle = ArtifactBundle::from_slice(DEMO_BUNDLE).unwrap();
        assert_eq!(bundle.run_id(), Some("demo-2024-sms"));
        assert_eq!(bundle.classifier().kind(), "multinomial_nb");
        assert!(bundle.vectorizer().dimension() > 0);
        assert_eq!(bundle.fingerprint().len(), 64);
    }

    #[test]
    fn test_defaults_fill_optional_fields() {
        let bundle = ArtifactBundle::from_slice(&bytes(&minimal())).unwrap();
        assert_eq!(bundle.run_id(), None);
        assert_eq!(bundle.vectorizer().dimension(), 2);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut value = minimal();
        value["format_version"] = json!(2);
        let err = ArtifactBundle::from_slice(&bytes(&value)).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::UnsupportedVersion { found: 2, expected: 1 }
        ));
    }

    #[test]
    fn test_rejects_dimension_mismatch_between_members() {
        let mut value = minimal();
        value["classifier"]["coef"] = json!([1.0, -1.0, 0.5]);
        let err = ArtifactBundle::from_slice(&bytes(&value)).unwrap_err();
        assert!(matches!(err, ArtifactError::Integrity(_)), "{err}");
    }

    #[test]
    fn test_rejects_unknown_classifier_kind() {
        let mut value = minimal();
        value["classifier"] = json!({"kind": "random_forest"});
        let err = ArtifactBundle::from_slice(&bytes(&value)).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse(_)));
    }

    #[test]
    fn test_load_from_disk_with_checksum() {
        let raw = bytes(&minimal());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&raw).unwrap();

        let digest = sha256_hex(&raw);
        let bundle = ArtifactBundle::load(file.path(), Some(&digest.to_uppercase())).unwrap();
        assert_eq!(bundle.fingerprint(), digest);
    }

    #[test]
    fn test_load_rejects_checksum_mismatch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes(&minimal())).unwrap();

        let err = ArtifactBundle::load(file.path(), Some("deadbeef")).unwrap_err();
        assert!(matches!(err, ArtifactError::ChecksumMismatch { .. }), "{err}");
    }

    #[test]
    fn test_load_missing_file() {
        let err = ArtifactBundle::load("/nonexistent/model.json", None).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/model.json"));
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
