//! Sensitive file, backup file and directory listing checks

use crate::http::ProbeResponse;
use crate::models::{Category, Finding, RiskLevel};
use crate::patterns::Signatures;
use crate::scanner::classify::preview;
use crate::scanner::work::FileKind;

const CONTENT_PREVIEW: usize = 100;

/// Judges a file probe. Only a 200 with a non-empty body counts as exposure.
pub fn classify_file(
    path: &str,
    risk: RiskLevel,
    label: &str,
    kind: FileKind,
    resp: &ProbeResponse,
    sigs: &Signatures,
) -> Option<Finding> {
    if !resp.is_ok() || resp.body.is_empty() {
        return None;
    }

    let finding = match kind {
        FileKind::Sensitive => Finding::new(
            format!("Sensitive file exposed: {label}"),
            risk,
            Category::SensitiveFiles,
            &resp.url,
        )
        .with_evidence(format!(
            "{path} returned {}: {}",
            resp.status,
            preview(&resp.body, CONTENT_PREVIEW)
        ))
        .with_remediation(format!("Remove {path} from the web root or deny access to it"))
        .with_cwe("CWE-538"),

        FileKind::Backup => Finding::new(
            "Backup file exposed",
            RiskLevel::High,
            Category::SensitiveFiles,
            &resp.url,
        )
        .with_evidence(format!(
            "{path} returned {}: {}",
            resp.status,
            preview(&resp.body, CONTENT_PREVIEW)
        ))
        .with_remediation(format!("Delete backup file {path} or restrict access to it"))
        .with_cwe("CWE-530"),

        FileKind::DirectoryListing => {
            if !sigs.is_directory_listing(&resp.body) {
                return None;
            }
            Finding::new(
                "Directory listing enabled",
                RiskLevel::Medium,
                Category::SensitiveFiles,
                &resp.url,
            )
            .with_evidence(format!("Auto-generated index served at {path}"))
            .with_remediation("Disable directory browsing in the web server configuration")
            .with_cwe("CWE-548")
        }
    };

    Some(finding)
}
