//! Core data models for vigil

use crate::error::{ProbeError, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Risk level for security findings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::Low => write!(f, "Low"),
        }
    }
}

/// Finding category. The vocabulary is closed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    SensitiveFiles,
    Headers,
    Defaults,
    ServerConfig,
    SqlInjection,
    Xss,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::SensitiveFiles,
        Category::Headers,
        Category::Defaults,
        Category::ServerConfig,
        Category::SqlInjection,
        Category::Xss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SensitiveFiles => "sensitive-files",
            Category::Headers => "headers",
            Category::Defaults => "defaults",
            Category::ServerConfig => "server-config",
            Category::SqlInjection => "sql-injection",
            Category::Xss => "xss",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three probe families run side by side by the scan engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    /// Sensitive files, headers, default pages and server configuration
    Content,
    /// Login discovery and default credential attempts
    Credentials,
    /// SQL/NoSQL injection and XSS payloads
    Injection,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Content => write!(f, "content"),
            Family::Credentials => write!(f, "credentials"),
            Family::Injection => write!(f, "injection"),
        }
    }
}

/// Category tags accepted in the `categories` setting. An empty selection enables all of them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProbeCategory {
    Files,
    Headers,
    Defaults,
    Server,
    Sqli,
    Xss,
}

impl ProbeCategory {
    pub const ALL: [ProbeCategory; 6] = [
        ProbeCategory::Files,
        ProbeCategory::Headers,
        ProbeCategory::Defaults,
        ProbeCategory::Server,
        ProbeCategory::Sqli,
        ProbeCategory::Xss,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ProbeCategory::Files => "files",
            ProbeCategory::Headers => "headers",
            ProbeCategory::Defaults => "defaults",
            ProbeCategory::Server => "server",
            ProbeCategory::Sqli => "sqli",
            ProbeCategory::Xss => "xss",
        }
    }
}

impl FromStr for ProbeCategory {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        ProbeCategory::ALL
            .into_iter()
            .find(|c| c.tag() == wanted)
            .ok_or_else(|| ProbeError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for ProbeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A security finding produced by classifying one probe response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    /// Unique identifier
    pub id: String,
    /// URL the probe was sent to
    pub url: String,
    /// Finding category
    pub category: Category,
    /// Short human readable statement of the issue
    pub message: String,
    /// Bounded snippet of the evidence that triggered the finding
    pub evidence: String,
    /// Risk level
    pub risk: RiskLevel,
    /// Remediation recommendation
    pub remediation: String,
    /// CWE reference (e.g., CWE-89)
    pub cwe_id: Option<String>,
}

impl Finding {
    /// Creates a new Finding with a generated UUID
    pub fn new(
        message: impl Into<String>,
        risk: RiskLevel,
        category: Category,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.into(),
            category,
            message: message.into(),
            evidence: String::new(),
            risk,
            remediation: String::new(),
            cwe_id: None,
        }
    }

    /// Sets the evidence for this finding
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = evidence.into();
        self
    }

    /// Sets the remediation for this finding
    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = remediation.into();
        self
    }

    /// Sets the CWE ID for this finding
    pub fn with_cwe(mut self, cwe: impl Into<String>) -> Self {
        self.cwe_id = Some(cwe.into());
        self
    }

    /// Compares two findings ignoring their generated ids
    pub fn same_observation(&self, other: &Finding) -> bool {
        self.url == other.url
            && self.category == other.category
            && self.message == other.message
            && self.evidence == other.evidence
            && self.risk == other.risk
            && self.remediation == other.remediation
            && self.cwe_id == other.cwe_id
    }
}

/// Classified kind of a probe failure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ScanErrorKind {
    Timeout,
    Dns,
    Tls,
    ConnectionRefused,
    HostUnreachable,
    BodyTooLarge,
    InvalidEncoding,
    Generic,
}

impl fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanErrorKind::Timeout => "timeout",
            ScanErrorKind::Dns => "dns",
            ScanErrorKind::Tls => "tls",
            ScanErrorKind::ConnectionRefused => "connection-refused",
            ScanErrorKind::HostUnreachable => "host-unreachable",
            ScanErrorKind::BodyTooLarge => "body-too-large",
            ScanErrorKind::InvalidEncoding => "invalid-encoding",
            ScanErrorKind::Generic => "generic",
        };
        f.write_str(s)
    }
}

/// A recorded, non-fatal failure that happened while probing
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{kind}: {cause}")]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub cause: String,
    /// Set when the error was raised at a family boundary
    pub family: Option<Family>,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            cause: cause.into(),
            family: None,
        }
    }

    /// Tags the error with the probe family it came from
    pub fn in_family(mut self, family: Family) -> Self {
        self.family = Some(family);
        self
    }
}

/// Snapshot of one completed scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Target URL
    pub target: String,
    /// Unique scan identifier
    pub scan_id: String,
    /// Scan start time (local timezone)
    pub started_at: DateTime<Local>,
    /// Scan end time (local timezone)
    pub finished_at: Option<DateTime<Local>>,
    /// All findings discovered
    pub findings: Vec<Finding>,
    /// Every recorded probe failure
    pub errors: Vec<ScanError>,
    /// Families that ran to completion without panicking
    pub families_completed: Vec<Family>,
    /// Total HTTP requests made
    pub total_requests: u64,
}

impl ScanReport {
    /// Creates a new ScanReport
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            scan_id: uuid::Uuid::new_v4().to_string(),
            started_at: Local::now(),
            finished_at: None,
            findings: Vec::new(),
            errors: Vec::new(),
            families_completed: Vec::new(),
            total_requests: 0,
        }
    }

    /// Returns count of findings by risk level
    pub fn count_by_risk(&self, risk: RiskLevel) -> usize {
        self.findings.iter().filter(|f| f.risk == risk).count()
    }

    /// Returns count of findings per category
    pub fn count_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for finding in &self.findings {
            *counts.entry(finding.category).or_insert(0) += 1;
        }
        counts
    }

    /// Wall-clock duration of the scan, once finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }

    /// Marks the scan as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    /// Serializes the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_category_parsing() {
        assert_eq!("files".parse::<ProbeCategory>().unwrap(), ProbeCategory::Files);
        assert_eq!(" SQLI ".parse::<ProbeCategory>().unwrap(), ProbeCategory::Sqli);
        assert!(matches!(
            "ssl".parse::<ProbeCategory>(),
            Err(ProbeError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_category_serializes_kebab_case() {
        let json = serde_json::to_string(&Category::SensitiveFiles).unwrap();
        assert_eq!(json, "\"sensitive-files\"");
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_report_counts() {
        let mut report = ScanReport::new("http://example.com");
        report.findings.push(Finding::new(
            "a",
            RiskLevel::High,
            Category::Headers,
            "http://example.com",
        ));
        report.findings.push(Finding::new(
            "b",
            RiskLevel::Low,
            Category::Headers,
            "http://example.com",
        ));
        report.findings.push(Finding::new(
            "c",
            RiskLevel::High,
            Category::Xss,
            "http://example.com",
        ));

        assert_eq!(report.count_by_risk(RiskLevel::High), 2);
        assert_eq!(report.count_by_risk(RiskLevel::Medium), 0);
        assert_eq!(report.count_by_category()[&Category::Headers], 2);
        assert!(report.duration().is_none());

        report.finish();
        assert!(report.duration().is_some());
        assert!(report.to_json().unwrap().contains("\"xss\""));
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::new(ScanErrorKind::ConnectionRefused, "tcp connect failed")
            .in_family(Family::Credentials);
        assert_eq!(err.to_string(), "connection-refused: tcp connect failed");
        assert_eq!(err.family, Some(Family::Credentials));
    }
}
