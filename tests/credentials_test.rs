//! Integration tests for default credential probing

mod common;

use common::test_target;
use std::sync::Arc;
use vigil::models::{Category, Family, RiskLevel};
use vigil::patterns::catalog::{DEFAULT_CREDENTIALS, LOGIN_PATHS};
use vigil::scanner::credentials::CredentialsFamily;
use vigil::scanner::ScanEngine;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PAGE: &str = r#"<html><body>
    <form action="/login" method="post">
        <input type="text" name="username">
        <input type="password" name="password">
        <button type="submit">Sign in</button>
    </form>
</body></html>"#;

fn credentials_engine() -> ScanEngine {
    let mut engine = ScanEngine::new();
    engine.register(Arc::new(CredentialsFamily));
    engine
}

#[tokio::test]
async fn test_default_credentials_accepted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string(
            "username=admin&user=admin&email=admin&password=admin&pass=admin",
        ))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/dashboard"))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Invalid username or password"))
        .mount(&mock_server)
        .await;

    let report = credentials_engine()
        .scan(test_target(&mock_server.uri(), &["defaults"]))
        .await
        .expect("Scan failed");

    assert_eq!(report.findings.len(), 1, "got {:?}", report.findings);
    let finding = &report.findings[0];
    assert_eq!(finding.category, Category::Defaults);
    assert_eq!(finding.risk, RiskLevel::High);
    assert!(finding.url.ends_with("/login"));
    assert!(finding.evidence.contains("admin:admin"));

    assert_eq!(report.families_completed, vec![Family::Credentials]);
    assert_eq!(
        report.total_requests,
        (LOGIN_PATHS.len() + DEFAULT_CREDENTIALS.len()) as u64
    );
}

#[tokio::test]
async fn test_falls_back_to_target_without_login_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Login failed"))
        .mount(&mock_server)
        .await;

    let report = credentials_engine()
        .scan(test_target(&mock_server.uri(), &["defaults"]))
        .await
        .expect("Scan failed");

    assert!(report.findings.is_empty());

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    let posts: Vec<_> = requests
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .collect();
    assert_eq!(posts.len(), DEFAULT_CREDENTIALS.len());
    assert!(posts.iter().all(|r| r.url.path() == "/"));
}

#[tokio::test]
async fn test_credentials_skipped_when_defaults_not_selected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = credentials_engine()
        .scan(test_target(&mock_server.uri(), &["headers"]))
        .await
        .expect("Scan failed");

    assert!(report.findings.is_empty());
    assert!(report.families_completed.is_empty());
    assert_eq!(report.total_requests, 0);
}

#[tokio::test]
async fn test_fallback_drops_query_and_fragment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/portal"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Login failed"))
        .mount(&mock_server)
        .await;

    let target = test_target(
        &format!("{}/portal?session=abc123#top", mock_server.uri()),
        &["defaults"],
    );
    let report = credentials_engine().scan(target).await.expect("Scan failed");
    assert!(report.findings.is_empty());

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    let posts: Vec<_> = requests
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .collect();
    assert_eq!(posts.len(), DEFAULT_CREDENTIALS.len());
    assert!(posts
        .iter()
        .all(|r| r.url.path() == "/portal" && r.url.query().is_none()));
}
