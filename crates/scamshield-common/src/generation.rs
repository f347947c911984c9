/// Provider-neutral interface to the text-generation service.
///
/// Services depend on [`Generator`] rather than on a concrete HTTP client, and every
/// provider failure is translated into the closed [`GenerationError`] union before it
/// reaches business logic.
use async_trait::async_trait;
use reqwest::StatusCode;

use crate::openai::ResponseFormat;

/// One schema-constrained, single-turn generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fixed behavioural instructions, sent with the `system` role.
    pub system: String,
    /// Call-specific content, sent with the `user` role.
    pub user: String,
    /// Output schema the provider is asked to honour.
    pub response_format: ResponseFormat,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The service could not be reached (connect failure, timeout, broken body).
    #[error("network failure: {0}")]
    Network(String),

    #[error("rate limited by upstream: {message}")]
    RateLimited { message: String },

    #[error("upstream returned error: status={status} message={message}")]
    Status { status: StatusCode, message: String },

    /// A successful response that carried no usable completion text.
    #[error("malformed completion: {0}")]
    MalformedOutput(String),

    #[error("unexpected generation failure: {0}")]
    Unexpected(String),
}

impl GenerationError {
    /// Short machine-friendly name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Network(_) => "network",
            GenerationError::RateLimited { .. } => "rate_limited",
            GenerationError::Status { .. } => "status",
            GenerationError::MalformedOutput(_) => "malformed_output",
            GenerationError::Unexpected(_) => "unexpected",
        }
    }
}

#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one generation and return the raw completion text.
    ///
    /// No retry is attempted; the first failure is returned to the caller.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}
