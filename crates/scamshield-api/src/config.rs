use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;

use crate::error::AppError;

const DEFAULT_BUNDLE_PATH: &str = "models/model.json";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Service settings. Generation client settings live in `GenerationConfig`.
#[derive(Debug, Clone)]
pub struct Config {
    pub bundle_path: PathBuf,
    pub bundle_sha256: Option<String>,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let set = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let bundle_path =
            PathBuf::from(set("MODEL_BUNDLE_PATH").unwrap_or_else(|| DEFAULT_BUNDLE_PATH.to_string()));
        if !bundle_path.is_file() {
            return Err(AppError::Config(format!(
                "model bundle not found at {}",
                bundle_path.display()
            )));
        }

        let bundle_sha256 = set("MODEL_BUNDLE_SHA256").map(|s| s.trim().to_string());

        let origin = set("CORS_ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin = HeaderValue::from_str(origin.trim())
            .map_err(|e| AppError::Config(format!("invalid CORS_ALLOWED_ORIGIN {origin:?}: {e}")))?;

        let addr = set("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("invalid BIND_ADDR {addr:?}: {e}")))?;

        Ok(Self {
            bundle_path,
            bundle_sha256,
            cors_origin,
            bind_addr,
        })
    }
}
