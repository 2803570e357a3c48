//! Mapping of transport failures onto [`ScanErrorKind`]

use crate::models::{ScanError, ScanErrorKind};
use std::error::Error as StdError;
use std::io;

/// Classifies a failure from whether the deadline fired and the lower-cased
/// text of the whole error chain. First match wins.
pub fn classify_transport_error(timed_out: bool, chain: &str) -> ScanErrorKind {
    let text = chain.to_lowercase();

    if timed_out || text.contains("timed out") || text.contains("deadline") {
        ScanErrorKind::Timeout
    } else if text.contains("dns error") || text.contains("failed to lookup address") {
        ScanErrorKind::Dns
    } else if text.contains("tls") || text.contains("certificate") || text.contains("handshake")
    {
        ScanErrorKind::Tls
    } else if text.contains("connection refused") {
        ScanErrorKind::ConnectionRefused
    } else if text.contains("no such host")
        || text.contains("host unreachable")
        || text.contains("no route to host")
    {
        ScanErrorKind::HostUnreachable
    } else {
        ScanErrorKind::Generic
    }
}

/// Joins an error and all of its sources into one line
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}

/// First `io::Error` kind found while walking the error's sources
pub fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        current = e.source();
    }
    None
}

/// Converts a reqwest failure into a recorded scan error.
///
/// Typed signals are checked first. The text fallback never sees the
/// request URL, so a host or path cannot influence the kind.
pub fn from_reqwest(err: reqwest::Error) -> ScanError {
    let err = err.without_url();
    let chain = error_chain(&err);

    let kind = match io_error_kind(&err) {
        _ if err.is_timeout() => ScanErrorKind::Timeout,
        Some(io::ErrorKind::TimedOut) => ScanErrorKind::Timeout,
        Some(io::ErrorKind::ConnectionRefused) => ScanErrorKind::ConnectionRefused,
        _ => classify_transport_error(false, &chain),
    };
    ScanError::new(kind, chain)
}
