//! Common test utilities

#![allow(dead_code)]

use vigil::config::{ScanConfig, ScanTarget};

/// Creates a test ScanConfig pointing to a wiremock server
pub fn test_config(target: &str, categories: &[&str]) -> ScanConfig {
    ScanConfig {
        target: target.to_string(),
        threads: 4,
        timeout_secs: 5,
        user_agent: "Vigil-Test/0.1.0".to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        ..ScanConfig::default()
    }
}

pub fn test_target(target: &str, categories: &[&str]) -> ScanTarget {
    ScanTarget::from_config(&test_config(target, categories)).expect("Invalid test target")
}

/// A local address nothing is listening on
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind failed");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
