//! Reflected cross-site scripting detection

use crate::http::ProbeResponse;
use crate::models::{Category, Finding, RiskLevel};
use crate::patterns::catalog::XSS_DANGEROUS_TOKENS;
use crate::patterns::PayloadClass;

/// True when the payload comes back verbatim, or a dangerous token from the
/// payload shows up in the body. Case-insensitive.
pub fn is_reflected(payload: &str, body: &str) -> bool {
    if payload.is_empty() || body.is_empty() {
        return false;
    }
    let payload = payload.to_lowercase();
    let body = body.to_lowercase();

    body.contains(&payload)
        || XSS_DANGEROUS_TOKENS
            .iter()
            .any(|token| payload.contains(token) && body.contains(token))
}

pub fn risk_for_payload(payload: &str) -> RiskLevel {
    let payload = payload.to_lowercase();
    if payload.contains("script") {
        RiskLevel::High
    } else if payload.contains("onerror") || payload.contains("onload") {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn classify_xss(
    parameter: &str,
    payload: &str,
    class: PayloadClass,
    resp: &ProbeResponse,
) -> Option<Finding> {
    if !class.is_xss() || !is_reflected(payload, &resp.body) {
        return None;
    }

    Some(
        Finding::new(
            format!("Cross-site scripting ({class}) in parameter '{parameter}'"),
            risk_for_payload(payload),
            Category::Xss,
            &resp.url,
        )
        .with_evidence(format!("Payload reflected without encoding: {payload}"))
        .with_remediation("HTML-encode user input on output and set a Content-Security-Policy")
        .with_cwe("CWE-79"),
    )
}
