//! Security header checks

use crate::http::ProbeResponse;
use crate::models::{Category, Finding, RiskLevel};

/// Judges one catalog header against the response
pub fn classify_header(
    name: &str,
    accepted_values: &[&str],
    risk: RiskLevel,
    required: bool,
    description: &str,
    resp: &ProbeResponse,
) -> Option<Finding> {
    let value = resp.header(name).filter(|v| !v.trim().is_empty());

    match value {
        None if required => Some(
            Finding::new(
                format!("Missing security header: {name}"),
                risk,
                Category::Headers,
                &resp.url,
            )
            .with_evidence(format!("Header '{name}' not present in response"))
            .with_remediation(format!(
                "Add the '{name}' header ({})",
                description.to_lowercase()
            ))
            .with_cwe("CWE-693"),
        ),
        None => None,
        Some(value) if !is_accepted(value, accepted_values) => Some(
            Finding::new(
                format!("Weak security header value: {name}"),
                RiskLevel::Medium,
                Category::Headers,
                &resp.url,
            )
            .with_evidence(format!(
                "Header '{name}' is '{value}', expected one of: {}",
                accepted_values.join(", ")
            ))
            .with_remediation(format!(
                "Set '{name}' to one of: {}",
                accepted_values.join(", ")
            ))
            .with_cwe("CWE-693"),
        ),
        Some(_) => None,
    }
}

/// Case-insensitive equality or substring match against any accepted value.
/// An empty list accepts anything.
fn is_accepted(value: &str, accepted_values: &[&str]) -> bool {
    if accepted_values.is_empty() {
        return true;
    }
    let value = value.to_lowercase();
    accepted_values.iter().any(|accepted| {
        let accepted = accepted.to_lowercase();
        value == accepted || value.contains(&accepted)
    })
}

/// HSTS enforcement for a target reached over https. The final response url
/// is not consulted, so a redirect down to http still counts as unenforced.
pub fn classify_transport_security(https: bool, resp: &ProbeResponse) -> Option<Finding> {
    if !https {
        return None;
    }

    match resp.header("Strict-Transport-Security") {
        None => Some(
            Finding::new(
                "HTTPS not properly enforced",
                RiskLevel::High,
                Category::Headers,
                &resp.url,
            )
            .with_evidence("HTTPS target answered without a Strict-Transport-Security header")
            .with_remediation(
                "Send 'Strict-Transport-Security: max-age=31536000; includeSubDomains'",
            )
            .with_cwe("CWE-319"),
        ),
        Some(hsts) if !hsts.to_lowercase().contains("max-age=") => Some(
            Finding::new(
                "Weak HSTS configuration",
                RiskLevel::Medium,
                Category::Headers,
                &resp.url,
            )
            .with_evidence(format!("HSTS header lacks a max-age directive: {hsts}"))
            .with_remediation("Include a max-age directive, e.g. max-age=31536000")
            .with_cwe("CWE-319"),
        ),
        Some(_) => None,
    }
}
