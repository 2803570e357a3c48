//! Default installation page detection

use crate::http::ProbeResponse;
use crate::models::{Category, Finding, RiskLevel};
use crate::patterns::Signatures;

pub fn classify_default_page(path: &str, resp: &ProbeResponse, sigs: &Signatures) -> Option<Finding> {
    if !resp.is_ok() || resp.body.is_empty() {
        return None;
    }

    if sigs.is_default_installation(&resp.body) {
        return Some(
            Finding::new(
                "Default installation page detected",
                RiskLevel::Medium,
                Category::Defaults,
                &resp.url,
            )
            .with_evidence(format!("Stock installer page served at {path}"))
            .with_remediation("Remove or replace default installation pages")
            .with_cwe("CWE-1188"),
        );
    }

    let version = sigs.detect_version(&resp.body)?;
    Some(
        Finding::new(
            "Version information disclosed",
            RiskLevel::Low,
            Category::Defaults,
            &resp.url,
        )
        .with_evidence(format!(
            "{path} reveals {} {}: {}",
            version.software, version.version, version.matched
        ))
        .with_remediation("Hide version information in responses")
        .with_cwe("CWE-200"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installer_page() {
        let resp = ProbeResponse::new("http://example.com/", 200)
            .with_body("<html><h1>Welcome to nginx!</h1><p>nginx/1.18.0</p></html>");
        let finding = classify_default_page("/", &resp, Signatures::global()).unwrap();
        assert_eq!(finding.message, "Default installation page detected");
        assert_eq!(finding.risk, RiskLevel::Medium);
        assert_eq!(finding.category, Category::Defaults);
    }

    #[test]
    fn test_version_only_page() {
        let resp = ProbeResponse::new("http://example.com/info.php", 200)
            .with_body("<td>PHP/8.1.2</td>");
        let finding = classify_default_page("/info.php", &resp, Signatures::global()).unwrap();
        assert_eq!(finding.risk, RiskLevel::Low);
        assert!(finding.evidence.contains("PHP/8.1.2"));
    }

    #[test]
    fn test_ordinary_page() {
        let resp = ProbeResponse::new("http://example.com/", 200).with_body("<h1>Acme</h1>");
        assert!(classify_default_page("/", &resp, Signatures::global()).is_none());
        let missing = ProbeResponse::new("http://example.com/", 404).with_body("Welcome to nginx");
        assert!(classify_default_page("/", &missing, Signatures::global()).is_none());
    }
}
