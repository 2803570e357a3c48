//! Integration tests for the request executor

mod common;

use common::{closed_port_url, test_config, test_target};
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use vigil::config::ScanTarget;
use vigil::http::client::{FILE_BODY_LIMIT, MAX_RESPONSE_SIZE};
use vigil::http::{Executor, ProbeRequest};
use vigil::models::ScanErrorKind;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor(target: ScanTarget) -> Executor {
    Executor::new(Arc::new(target)).expect("Failed to create executor")
}

#[tokio::test]
async fn test_body_is_cut_at_the_ceiling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/big.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("A".repeat(FILE_BODY_LIMIT * 3)))
        .mount(&mock_server)
        .await;

    let exec = executor(test_target(&mock_server.uri(), &[]));
    let url = format!("{}/big.txt", mock_server.uri());
    let exchange = exec
        .execute(&ProbeRequest::get(url, FILE_BODY_LIMIT))
        .await
        .expect("Request failed");

    assert_eq!(exchange.response.status, 200);
    assert_eq!(exchange.response.body.len(), FILE_BODY_LIMIT);
    assert!(exchange.warnings.is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_a_warning_not_a_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("B".repeat(MAX_RESPONSE_SIZE + 1024)))
        .mount(&mock_server)
        .await;

    let exec = executor(test_target(&mock_server.uri(), &[]));
    let exchange = exec
        .execute(&ProbeRequest::get(mock_server.uri(), FILE_BODY_LIMIT))
        .await
        .expect("Request failed");

    assert_eq!(exchange.response.body.len(), FILE_BODY_LIMIT);
    assert_eq!(exchange.warnings.len(), 1);
    assert_eq!(exchange.warnings[0].kind, ScanErrorKind::BodyTooLarge);
}

#[tokio::test]
async fn test_invalid_utf8_is_replaced_and_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'o', b'k', 0xFF, b'!']))
        .mount(&mock_server)
        .await;

    let exec = executor(test_target(&mock_server.uri(), &[]));
    let exchange = exec
        .execute(&ProbeRequest::get(mock_server.uri(), FILE_BODY_LIMIT))
        .await
        .expect("Request failed");

    assert_eq!(exchange.response.body, "ok\u{FFFD}!");
    assert_eq!(exchange.warnings.len(), 1);
    assert_eq!(exchange.warnings[0].kind, ScanErrorKind::InvalidEncoding);
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server.uri(), &[]);
    config.timeout_secs = 1;
    let exec = executor(ScanTarget::from_config(&config).unwrap());

    let err = exec
        .execute(&ProbeRequest::get(mock_server.uri(), FILE_BODY_LIMIT))
        .await
        .expect_err("Request should time out");
    assert_eq!(err.kind, ScanErrorKind::Timeout);
}

#[tokio::test]
async fn test_connection_refused_is_classified() {
    let url = closed_port_url();
    let exec = executor(test_target(&url, &[]));

    let err = exec
        .execute(&ProbeRequest::get(url.as_str(), FILE_BODY_LIMIT))
        .await
        .expect_err("Nothing is listening");
    assert_eq!(err.kind, ScanErrorKind::ConnectionRefused);
    assert_eq!(exec.request_count(), 1);
}

#[tokio::test]
async fn test_url_text_does_not_affect_classification() {
    let url = format!("{}/tls-handshake/certificate-deadline-timed-out", closed_port_url());
    let exec = executor(test_target(&url, &[]));

    let err = exec
        .execute(&ProbeRequest::get(url.as_str(), FILE_BODY_LIMIT))
        .await
        .expect_err("Nothing is listening");
    assert_eq!(err.kind, ScanErrorKind::ConnectionRefused);
    assert!(!err.cause.contains("tls-handshake"));
}

#[tokio::test]
async fn test_redirect_policy_per_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("landed"))
        .mount(&mock_server)
        .await;

    let exec = executor(test_target(&mock_server.uri(), &[]));
    let url = format!("{}/old", mock_server.uri());

    let followed = exec
        .execute(&ProbeRequest::get(url.as_str(), FILE_BODY_LIMIT))
        .await
        .expect("Request failed");
    assert_eq!(followed.response.status, 200);
    assert_eq!(followed.response.body, "landed");
    assert!(followed.response.url.ends_with("/new"));

    let raw = exec
        .execute(&ProbeRequest::get(url.as_str(), FILE_BODY_LIMIT).without_redirects())
        .await
        .expect("Request failed");
    assert_eq!(raw.response.status, 302);
    assert_eq!(raw.response.header("location"), Some("/new"));
}

#[tokio::test]
async fn test_custom_headers_and_user_agent_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("X-Api-Key", "secret"))
        .and(header("User-Agent", "Vigil-Test/0.1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("authorized"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server.uri(), &[]);
    config.headers = vec!["X-Api-Key: secret".to_string(), "broken header".to_string()];
    let exec = executor(ScanTarget::from_config(&config).unwrap());

    let exchange = exec
        .execute(&ProbeRequest::get(mock_server.uri(), FILE_BODY_LIMIT))
        .await
        .expect("Request failed");
    assert_eq!(exchange.response.body, "authorized");
}

#[tokio::test]
async fn test_form_post_and_request_count() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("username=admin&password=admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Welcome"))
        .mount(&mock_server)
        .await;

    let exec = executor(test_target(&mock_server.uri(), &[]));
    let url = format!("{}/login", mock_server.uri());

    let exchange = exec
        .execute(
            &ProbeRequest::get(url.as_str(), FILE_BODY_LIMIT)
                .with_method(Method::POST)
                .with_form("username=admin&password=admin"),
        )
        .await
        .expect("Request failed");
    assert_eq!(exchange.response.body, "Welcome");

    for _ in 0..3 {
        let _ = exec.execute(&ProbeRequest::get(url.as_str(), FILE_BODY_LIMIT)).await;
    }
    assert_eq!(exec.request_count(), 4);
    assert_eq!(exec.clone().request_count(), 4);
}
