/// Error types shared across ScamShield crates.
///
/// These errors represent failures while wiring up infrastructure (configuration, HTTP
/// client construction). Service-specific errors are defined in each crate and wrap
/// `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("config error: {0}")]
    Config(String),

    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
