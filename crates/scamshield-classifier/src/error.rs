use std::path::PathBuf;

/// Failures while loading or checking an artifact bundle.
///
/// All of these are raised once at startup; a bundle that loads is never re-checked.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bundle is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported bundle format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("bundle checksum mismatch: expected {expected}, found {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("invalid token pattern: {0}")]
    TokenPattern(#[from] regex::Error),

    #[error("bundle integrity check failed: {0}")]
    Integrity(String),
}
