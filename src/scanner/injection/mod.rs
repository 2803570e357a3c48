//! Injection family: SQL, NoSQL and XSS payloads against the target's parameters

pub mod sqli;
pub mod xss;

use crate::config::ScanTarget;
use crate::models::{Family, ProbeCategory};
use crate::patterns::catalog::{DEFAULT_SQLI_PARAMS, DEFAULT_XSS_PARAMS};
use crate::patterns::PayloadClass;
use crate::scanner::orchestrator::ProbeContext;
use crate::scanner::work::WorkItem;
use crate::scanner::ProbeFamily;
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use url::form_urlencoded;

pub struct InjectionFamily;

#[async_trait]
impl ProbeFamily for InjectionFamily {
    fn family(&self) -> Family {
        Family::Injection
    }

    fn description(&self) -> &str {
        "Sends SQL, NoSQL and XSS payloads through the target's parameters"
    }

    async fn plan(&self, ctx: &ProbeContext) -> Vec<WorkItem> {
        injection_items(ctx.target())
    }
}

/// Every (class, parameter, payload) combination for the enabled injection categories
pub fn injection_items(target: &ScanTarget) -> Vec<WorkItem> {
    let mut items = Vec::new();
    let discovered = discover_parameters(target);

    let mut add = |classes: &[PayloadClass], defaults: &[&str]| {
        let params: Vec<String> = if discovered.is_empty() {
            debug!("No parameters found, using common names");
            defaults.iter().map(|p| p.to_string()).collect()
        } else {
            discovered.clone()
        };

        for &class in classes {
            for parameter in &params {
                items.extend(class.payloads().iter().map(|&payload| WorkItem::Payload {
                    parameter: parameter.clone(),
                    payload,
                    class,
                    expected_delay: class.expected_delay(),
                }));
            }
        }
    };

    if target.is_enabled(ProbeCategory::Sqli) {
        add(&PayloadClass::SQL[..], DEFAULT_SQLI_PARAMS);
    }
    if target.is_enabled(ProbeCategory::Xss) {
        add(&PayloadClass::XSS[..], DEFAULT_XSS_PARAMS);
    }

    items
}

/// Parameters to inject into: explicit ones first, otherwise those in the
/// URL query and, for POST targets, the form body. Order is preserved, duplicates dropped.
pub fn discover_parameters(target: &ScanTarget) -> Vec<String> {
    let explicit: Vec<String> = target
        .parameters
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    if !explicit.is_empty() {
        return dedup(explicit);
    }

    let mut params: Vec<String> = target
        .base_url
        .query_pairs()
        .map(|(k, _)| k.into_owned())
        .collect();

    if target.method == Method::POST {
        if let Some(data) = &target.post_data {
            params.extend(form_urlencoded::parse(data.as_bytes()).map(|(k, _)| k.into_owned()));
        }
    }

    dedup(params.into_iter().filter(|p| !p.is_empty()).collect())
}

fn dedup(params: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    params
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}
