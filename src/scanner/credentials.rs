//! Default credential probing: login endpoint discovery, then one attempt per known pair

use crate::http::client::PAGE_BODY_LIMIT;
use crate::http::{ProbeRequest, ProbeResponse};
use crate::models::{Category, Family, Finding, RiskLevel};
use crate::patterns::catalog::{
    DEFAULT_CREDENTIALS, LOGIN_FAILURE_KEYWORDS, LOGIN_PATHS, LOGIN_SUCCESS_KEYWORDS,
};
use crate::scanner::orchestrator::ProbeContext;
use crate::scanner::work::WorkItem;
use crate::scanner::ProbeFamily;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

/// Tries the default credential table against every discovered login form
pub struct CredentialsFamily;

#[async_trait]
impl ProbeFamily for CredentialsFamily {
    fn family(&self) -> Family {
        Family::Credentials
    }

    fn description(&self) -> &str {
        "Discovers login forms and tries well-known default credentials"
    }

    async fn plan(&self, ctx: &ProbeContext) -> Vec<WorkItem> {
        let endpoints = discover_login_endpoints(ctx).await;
        endpoints
            .iter()
            .flat_map(|login_url| {
                DEFAULT_CREDENTIALS.iter().map(move |cred| WorkItem::Credential {
                    login_url: login_url.clone(),
                    username: cred.username,
                    password: cred.password,
                    context: cred.context,
                })
            })
            .collect()
    }
}

/// Probes the well-known admin paths and keeps those serving a login form.
/// Falls back to the target URL, minus query and fragment, when none do.
pub async fn discover_login_endpoints(ctx: &ProbeContext) -> Vec<String> {
    let target = ctx.target();
    let concurrency = target.concurrency();

    let urls: Vec<String> = LOGIN_PATHS.iter().map(|path| target.url_for(path)).collect();

    let mut found: Vec<String> = stream::iter(urls)
        .map(|url| {
            async move {
                let response = ctx.fetch(&ProbeRequest::get(url.as_str(), PAGE_BODY_LIMIT)).await?;
                if response.is_ok() && ctx.signatures().has_login_form(&response.body) {
                    debug!("Login form found at {url}");
                    Some(url)
                } else {
                    None
                }
            }
        })
        .buffer_unordered(concurrency)
        .filter_map(|found| async move { found })
        .collect()
        .await;

    if found.is_empty() {
        let fallback = target.base();
        debug!("No login form found, falling back to {fallback}");
        found.push(fallback);
    } else {
        found.sort();
    }

    info!("Credential probes will target {} endpoint(s)", found.len());
    found
}

/// A login attempt succeeded when no failure keyword appears and the response
/// either redirects somewhere or shows a post-login keyword
pub fn is_successful_login(resp: &ProbeResponse) -> bool {
    let body = resp.body_lower();
    if LOGIN_FAILURE_KEYWORDS.iter().any(|kw| body.contains(kw)) {
        return false;
    }

    let redirected = resp.is_redirect()
        && resp
            .header("Location")
            .map(|l| !l.trim().is_empty())
            .unwrap_or(false);

    redirected || LOGIN_SUCCESS_KEYWORDS.iter().any(|kw| body.contains(kw))
}

pub fn classify_login(
    username: &str,
    password: &str,
    context: &str,
    resp: &ProbeResponse,
) -> Option<Finding> {
    if !is_successful_login(resp) {
        return None;
    }

    let shown_password = if password.is_empty() {
        "<empty>"
    } else {
        password
    };

    Some(
        Finding::new(
            "Default credentials accepted",
            RiskLevel::High,
            Category::Defaults,
            &resp.url,
        )
        .with_evidence(format!(
            "Login succeeded with {username}:{shown_password} ({context}), status {}",
            resp.status
        ))
        .with_remediation("Change default credentials immediately and enforce a strong password policy")
        .with_cwe("CWE-1392"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(status: u16, body: &str) -> ProbeResponse {
        ProbeResponse::new("http://example.com/login", status).with_body(body)
    }

    #[test]
    fn test_failure_keyword_wins() {
        let resp = login(200, "<p>Invalid credentials</p><a href=/dashboard>dashboard</a>");
        assert!(classify_login("admin", "admin", "admin panel", &resp).is_none());

        let redirect = login(302, "Access denied").with_header("Location", "/home");
        assert!(!is_successful_login(&redirect));
    }

    #[test]
    fn test_success_keyword() {
        let resp = login(200, "<h1>Welcome back</h1><a href=/logout>Logout</a>");
        let finding = classify_login("admin", "admin", "admin panel", &resp).unwrap();
        assert_eq!(finding.risk, RiskLevel::High);
        assert_eq!(finding.category, Category::Defaults);
        assert!(finding.evidence.contains("admin:admin"));
    }

    #[test]
    fn test_redirect_with_location_is_success() {
        let resp = login(302, "").with_header("Location", "/app");
        assert!(is_successful_login(&resp));

        let no_location = login(302, "");
        assert!(!is_successful_login(&no_location));

        let empty_location = login(303, "").with_header("Location", "");
        assert!(!is_successful_login(&empty_location));
    }

    #[test]
    fn test_plain_login_page_is_not_success() {
        let resp = login(200, "<form><input type=password name=password></form>");
        assert!(!is_successful_login(&resp));
    }

    #[test]
    fn test_empty_password_is_shown() {
        let resp = login(200, "Dashboard");
        let finding = classify_login("admin", "", "admin panel", &resp).unwrap();
        assert!(finding.evidence.contains("admin:<empty>"));
    }
}
