//! Server configuration checks: HTTP verbs, banners, error pages and redirects

use crate::http::ProbeResponse;
use crate::models::{Category, Finding, RiskLevel};
use crate::patterns::catalog::REDIRECT_CANARY_HOST;
use crate::patterns::Signatures;
use crate::scanner::classify::preview;

const ERROR_PAGE_PREVIEW: usize = 200;

pub fn classify_method(
    verb: &str,
    dangerous: bool,
    description: &str,
    resp: &ProbeResponse,
) -> Option<Finding> {
    if !matches!(resp.status, 200 | 202 | 204) {
        return None;
    }

    let risk = if dangerous {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    };

    Some(
        Finding::new(
            format!("Dangerous HTTP method enabled: {verb}"),
            risk,
            Category::ServerConfig,
            &resp.url,
        )
        .with_evidence(format!("{verb} request returned status {}", resp.status))
        .with_remediation(format!("Disable {verb} if it is not required. {description}"))
        .with_cwe("CWE-749"),
    )
}

pub fn classify_banner(resp: &ProbeResponse, sigs: &Signatures) -> Option<Finding> {
    let server = resp.header("Server").filter(|s| !s.is_empty())?;

    if let Some(version) = sigs.detect_version(server) {
        return Some(
            Finding::new(
                "Server version disclosed in banner",
                RiskLevel::Low,
                Category::ServerConfig,
                &resp.url,
            )
            .with_evidence(format!(
                "Server header reveals {} {} ({})",
                version.software, version.version, version.matched
            ))
            .with_remediation("Hide version information in the Server header")
            .with_cwe("CWE-200"),
        );
    }

    let lower = server.to_lowercase();
    if ["apache", "nginx", "iis", "microsoft"]
        .iter()
        .any(|name| lower.contains(name))
    {
        return Some(
            Finding::new(
                "Server software disclosed in banner",
                RiskLevel::Low,
                Category::ServerConfig,
                &resp.url,
            )
            .with_evidence(format!("Server header reveals software: {server}"))
            .with_remediation("Use a generic Server header or remove it")
            .with_cwe("CWE-200"),
        );
    }

    None
}

/// Looks for leaked internals on 4xx/5xx pages
pub fn classify_error_page(resp: &ProbeResponse, sigs: &Signatures) -> Option<Finding> {
    if !resp.is_error() || resp.body.is_empty() {
        return None;
    }

    if sigs.leaks_information(&resp.body) {
        return Some(
            Finding::new(
                "Information leakage in error messages",
                RiskLevel::Medium,
                Category::ServerConfig,
                &resp.url,
            )
            .with_evidence(format!(
                "Error page (status {}) exposes internals: {}",
                resp.status,
                preview(&resp.body, ERROR_PAGE_PREVIEW)
            ))
            .with_remediation("Serve custom error pages that do not reveal system details")
            .with_cwe("CWE-209"),
        );
    }

    let version = sigs.detect_version(&resp.body)?;
    Some(
        Finding::new(
            "Version information disclosed in error page",
            RiskLevel::Low,
            Category::ServerConfig,
            &resp.url,
        )
        .with_evidence(format!(
            "Error page (status {}) reveals {} {}: {}",
            resp.status, version.software, version.version, version.matched
        ))
        .with_remediation("Configure custom error pages to hide version information")
        .with_cwe("CWE-200"),
    )
}

pub fn classify_redirect(description: &str, resp: &ProbeResponse) -> Option<Finding> {
    if !resp.is_redirect() {
        return None;
    }
    let location = resp.header("Location").filter(|l| !l.is_empty())?;
    if !location.to_lowercase().contains(REDIRECT_CANARY_HOST) {
        return None;
    }

    Some(
        Finding::new(
            "Insecure redirect configuration detected",
            RiskLevel::Medium,
            Category::ServerConfig,
            &resp.url,
        )
        .with_evidence(format!("{description}: redirects to {location}"))
        .with_remediation("Only allow redirects to trusted destinations")
        .with_cwe("CWE-601"),
    )
}
