//! Captured evidence of one HTTP exchange

use crate::models::ScanError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Status, headers, body and timing of a single probe response.
///
/// Classifiers only ever see this type, so it can be built by hand in tests:
///
/// ```
/// use vigil::http::ProbeResponse;
///
/// let resp = ProbeResponse::new("http://example.com/.env", 200)
///     .with_header("Server", "nginx/1.18.0")
///     .with_body("DB_PASSWORD=x");
/// assert_eq!(resp.header("server"), Some("nginx/1.18.0"));
/// ```
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// Final URL after any redirects
    pub url: String,
    pub status: u16,
    pub headers: HeaderMap,
    /// Decoded body, possibly truncated at the probe's read ceiling
    pub body: String,
    /// Time from sending the request until the body was read
    pub elapsed: Duration,
}

impl ProbeResponse {
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
            headers: HeaderMap::new(),
            body: String::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Adds a header. Names or values that are not valid HTTP are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Case-insensitive header lookup. Non-visible-ASCII values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.status)
    }

    /// Lower-cased copy of the body for keyword matching
    pub fn body_lower(&self) -> String {
        self.body.to_lowercase()
    }
}

/// A response together with the non-fatal problems noticed while reading it
#[derive(Debug, Clone)]
pub struct Exchange {
    pub response: ProbeResponse,
    pub warnings: Vec<ScanError>,
}
