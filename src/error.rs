//! Error types for vigil

use thiserror::Error;

/// Setup-time errors. Failures while probing are recorded as
/// [`ScanError`](crate::models::ScanError) values instead and never abort a scan.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown probe category '{0}'")]
    UnknownCategory(String),

    #[error("Unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
}

/// Result type alias for vigil operations
pub type Result<T> = std::result::Result<T, ProbeError>;
