use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::warn;

use scamshield_classifier::ArtifactError;
use scamshield_common::error::CommonError;
use scamshield_common::generation::GenerationError;

use crate::coach::PipelineError;

/// Startup failures of the service binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("artifact bundle error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("config error: {0}")]
    Config(String),
}

/// Endpoint a generation failure came from. Only the suggestion text depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSite {
    Coach,
    Quiz,
    Tip,
}

/// Request failures, converted to the `{"detail": {...}}` envelope at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Validation(String),

    #[error("generation failed: {error}")]
    Generation { site: CallSite, error: PipelineError },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    UpstreamUnavailable,
    OutputInvalid,
    RateLimited,
    UpstreamStatus,
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::UpstreamUnavailable => "groq_api_error",
            ErrorKind::OutputInvalid => "model_output_invalid",
            ErrorKind::RateLimited => "rate_limit_exceeded",
            ErrorKind::UpstreamStatus => "api_status_error",
            ErrorKind::Internal => "unexpected_error",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::OutputInvalid => StatusCode::BAD_GATEWAY,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::UpstreamStatus => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub error: &'static str,
    pub message: String,
    pub details: String,
    pub suggestion: String,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Internal(_) => ErrorKind::Internal,
            ApiError::Generation { error, .. } => match error {
                PipelineError::OutputInvalid(_) => ErrorKind::OutputInvalid,
                PipelineError::Generation(e) => match e {
                    GenerationError::Network(_) => ErrorKind::UpstreamUnavailable,
                    GenerationError::RateLimited { .. } => ErrorKind::RateLimited,
                    GenerationError::Status { .. } => ErrorKind::UpstreamStatus,
                    GenerationError::MalformedOutput(_) => ErrorKind::OutputInvalid,
                    GenerationError::Unexpected(_) => ErrorKind::Internal,
                },
            },
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        let kind = self.kind();
        let (message, details, suggestion) = match self {
            ApiError::Validation(reason) => (
                "The request body is not valid.".to_string(),
                reason.clone(),
                "Check the request fields and try again.".to_string(),
            ),
            ApiError::Internal(reason) => internal(reason),
            ApiError::Generation { site, error } => generation_detail(kind, *site, error),
        };
        ErrorDetail {
            error: kind.code(),
            message,
            details,
            suggestion,
        }
    }
}

fn generation_detail(
    kind: ErrorKind,
    site: CallSite,
    error: &PipelineError,
) -> (String, String, String) {
    match (kind, error) {
        (ErrorKind::UpstreamUnavailable, PipelineError::Generation(GenerationError::Network(raw))) => {
            let details = if raw.trim().is_empty() {
                "Connection timeout or network error".to_string()
            } else {
                raw.clone()
            };
            (
                "Failed to communicate with the AI service. Please check your internet connection and try again."
                    .to_string(),
                details,
                "Please wait a moment and try again. If the problem persists, check your API key configuration."
                    .to_string(),
            )
        }
        (ErrorKind::RateLimited, _) => (
            "Too many requests. Please wait a moment before trying again.".to_string(),
            "The AI service is temporarily limiting requests to manage load.".to_string(),
            "Please wait 30-60 seconds before making another request.".to_string(),
        ),
        (ErrorKind::UpstreamStatus, PipelineError::Generation(GenerationError::Status { status, .. })) => {
            let code = status.as_u16();
            (
                status_message(code),
                format!("HTTP {code}"),
                "Please try again in a few moments. If the problem persists, check your API configuration."
                    .to_string(),
            )
        }
        (ErrorKind::OutputInvalid, error) => {
            let details = match error {
                PipelineError::OutputInvalid(invalid) => invalid.to_string(),
                PipelineError::Generation(e) => format!("JSON parsing failed: {e}"),
            };
            let suggestion = match site {
                CallSite::Coach => "Please try again. If the problem continues, the request may be too complex - try simplifying question.",
                CallSite::Quiz | CallSite::Tip => "Please try again.",
            };
            (
                "The AI service returned an invalid response format. This may be a temporary issue."
                    .to_string(),
                details,
                suggestion.to_string(),
            )
        }
        (_, error) => internal(&error.to_string()),
    }
}

fn internal(raw: &str) -> (String, String, String) {
    (
        "An unexpected error occurred while generating the response.".to_string(),
        raw.to_string(),
        "Please try again. If the problem continues, contact support.".to_string(),
    )
}

fn status_message(code: u16) -> String {
    let known = match code {
        400 => "Invalid request to AI service. Please check your input and try again.",
        401 => "Authentication failed. Please check your API key configuration.",
        403 => "Access forbidden. Please check your API key permissions.",
        404 => "AI service endpoint not found. This may indicate a configuration issue.",
        500 => "The AI service encountered an internal error. Please try again later.",
        502 => "Bad gateway. The AI service is temporarily unavailable.",
        503 => "Service unavailable. The AI service is temporarily down.",
        504 => "Gateway timeout. The request took too long to process.",
        _ => return format!("The AI service returned an error (status {code})"),
    };
    known.to_string()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match &self {
            ApiError::Generation { site, error } => {
                let source = match error {
                    PipelineError::Generation(e) => e.kind(),
                    PipelineError::OutputInvalid(_) => "output_invalid",
                };
                warn!(?site, source, code = kind.code(), error = %error, "generation request failed");
            }
            other => warn!(code = kind.code(), error = %other, "request failed"),
        }

        let body = serde_json::json!({ "detail": self.detail() });
        (kind.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scamshield_common::structured::OutputInvalid;

    fn generation(site: CallSite, error: GenerationError) -> ApiError {
        ApiError::Generation {
            site,
            error: PipelineError::Generation(error),
        }
    }

    fn status(code: u16) -> ApiError {
        generation(
            CallSite::Tip,
            GenerationError::Status {
                status: StatusCode::from_u16(code).unwrap(),
                message: "upstream said no".to_string(),
            },
        )
    }

    #[test]
    fn network_failure_is_upstream_unavailable() {
        let err = generation(CallSite::Coach, GenerationError::Network("connection refused".to_string()));
        assert_eq!(err.kind().status(), StatusCode::SERVICE_UNAVAILABLE);

        let detail = err.detail();
        assert_eq!(detail.error, "groq_api_error");
        assert_eq!(detail.details, "connection refused");
        assert!(detail.message.starts_with("Failed to communicate with the AI service."));
    }

    #[test]
    fn empty_network_text_gets_default_details() {
        let detail = generation(CallSite::Quiz, GenerationError::Network(String::new())).detail();
        assert_eq!(detail.details, "Connection timeout or network error");
    }

    #[test]
    fn rate_limit_mapping() {
        let err = generation(
            CallSite::Tip,
            GenerationError::RateLimited {
                message: "slow down".to_string(),
            },
        );
        assert_eq!(err.kind().status(), StatusCode::TOO_MANY_REQUESTS);
        let detail = err.detail();
        assert_eq!(detail.error, "rate_limit_exceeded");
        assert_eq!(detail.suggestion, "Please wait 30-60 seconds before making another request.");
    }

    #[test]
    fn status_errors_use_known_messages() {
        let detail = status(401).detail();
        assert_eq!(detail.error, "api_status_error");
        assert_eq!(
            detail.message,
            "Authentication failed. Please check your API key configuration."
        );
        assert_eq!(detail.details, "HTTP 401");
        assert_eq!(status(401).kind().status(), StatusCode::BAD_GATEWAY);

        assert_eq!(
            status(504).detail().message,
            "Gateway timeout. The request took too long to process."
        );
    }

    #[test]
    fn unknown_status_falls_back() {
        assert_eq!(
            status(418).detail().message,
            "The AI service returned an error (status 418)"
        );
    }

    #[test]
    fn output_invalid_suggestion_depends_on_site() {
        let invalid = |site| ApiError::Generation {
            site,
            error: PipelineError::OutputInvalid(OutputInvalid {
                reason: "expected value at line 1 column 1".to_string(),
            }),
        };

        let coach = invalid(CallSite::Coach).detail();
        assert_eq!(coach.error, "model_output_invalid");
        assert_eq!(coach.details, "JSON parsing failed: expected value at line 1 column 1");
        assert!(coach.suggestion.contains("try simplifying question"));

        assert_eq!(invalid(CallSite::Quiz).detail().suggestion, "Please try again.");
        assert_eq!(invalid(CallSite::Quiz).kind().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn malformed_completion_is_output_invalid() {
        let err = generation(
            CallSite::Coach,
            GenerationError::MalformedOutput("completion has no content".to_string()),
        );
        assert_eq!(err.kind(), ErrorKind::OutputInvalid);
        assert!(err.detail().details.starts_with("JSON parsing failed:"));
    }

    #[test]
    fn unexpected_is_internal() {
        let err = generation(CallSite::Quiz, GenerationError::Unexpected("bad envelope".to_string()));
        assert_eq!(err.kind().status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = err.detail();
        assert_eq!(detail.error, "unexpected_error");
        assert_eq!(detail.details, "unexpected generation failure: bad envelope");
        assert_eq!(
            detail.message,
            "An unexpected error occurred while generating the response."
        );
    }

    #[test]
    fn validation_is_422() {
        let err = ApiError::Validation("missing field `text`".to_string());
        assert_eq!(err.kind().status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail().error, "validation_error");
    }
}
