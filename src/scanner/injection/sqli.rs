//! SQL and NoSQL injection detection

use crate::http::ProbeResponse;
use crate::models::{Category, Finding, RiskLevel};
use crate::patterns::catalog::UNION_INDICATORS;
use crate::patterns::{PayloadClass, Signatures};
use std::time::Duration;

/// Slack allowed between the requested sleep and the observed delay
const TIMING_SLACK: Duration = Duration::from_secs(1);

/// Elapsed time a timing payload must exceed to count as a hit
pub fn time_based_threshold(expected_delay: Duration) -> Duration {
    expected_delay.saturating_sub(TIMING_SLACK)
}

pub fn classify_sqli(
    parameter: &str,
    payload: &str,
    class: PayloadClass,
    expected_delay: Option<Duration>,
    resp: &ProbeResponse,
    sigs: &Signatures,
) -> Option<Finding> {
    let (risk, evidence) = match class {
        PayloadClass::ErrorBased => {
            if !sigs.has_sql_error(&resp.body) {
                return None;
            }
            (RiskLevel::High, "Database error message in response".to_string())
        }
        PayloadClass::BooleanBased => {
            if !sigs.has_sql_error(&resp.body) {
                return None;
            }
            (
                RiskLevel::Medium,
                "Boolean condition produced a database error".to_string(),
            )
        }
        PayloadClass::TimeBased => {
            let threshold = time_based_threshold(expected_delay?);
            if threshold.is_zero() || resp.elapsed <= threshold {
                return None;
            }
            (
                RiskLevel::High,
                format!(
                    "Response delayed by {:.1}s (threshold {}s)",
                    resp.elapsed.as_secs_f64(),
                    threshold.as_secs()
                ),
            )
        }
        PayloadClass::UnionBased => {
            let body = resp.body_lower();
            let indicator = UNION_INDICATORS.iter().find(|kw| body.contains(*kw))?;
            (
                RiskLevel::High,
                format!("UNION query changed the response ({indicator})"),
            )
        }
        PayloadClass::NoSql => {
            if !sigs.has_nosql_error(&resp.body) {
                return None;
            }
            (RiskLevel::High, "NoSQL engine error in response".to_string())
        }
        PayloadClass::XssReflected | PayloadClass::XssDom | PayloadClass::XssFilterBypass => {
            return None
        }
    };

    Some(
        Finding::new(
            format!("SQL injection ({class}) in parameter '{parameter}'"),
            risk,
            Category::SqlInjection,
            &resp.url,
        )
        .with_evidence(format!("{evidence}; payload: {payload}"))
        .with_remediation("Use parameterized queries and validate input on the server")
        .with_cwe(if class == PayloadClass::NoSql {
            "CWE-943"
        } else {
            "CWE-89"
        }),
    )
}
