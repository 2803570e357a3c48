//! Self-contained units of probe work

use crate::config::ScanTarget;
use crate::error::{ProbeError, Result};
use crate::http::client::{
    ProbeRequest, FILE_BODY_LIMIT, LISTING_BODY_LIMIT, MAX_RESPONSE_SIZE, PAGE_BODY_LIMIT,
};
use crate::models::{ProbeCategory, RiskLevel};
use crate::patterns::PayloadClass;
use reqwest::Method;
use std::time::Duration;
use url::{form_urlencoded, Url};

/// What a file probe is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Sensitive,
    Backup,
    DirectoryListing,
}

/// One probe: enough to build its request and to judge its response
#[derive(Debug, Clone)]
pub enum WorkItem {
    File {
        /// Full URL probed
        url: String,
        /// Path shown in evidence
        path: String,
        risk: RiskLevel,
        label: String,
        kind: FileKind,
    },
    Header {
        name: &'static str,
        accepted_values: &'static [&'static str],
        risk: RiskLevel,
        required: bool,
        description: &'static str,
    },
    /// HSTS enforcement, judged by the scheme the scan was pointed at
    TransportSecurity { https: bool },
    Credential {
        login_url: String,
        username: &'static str,
        password: &'static str,
        context: &'static str,
    },
    Method {
        verb: &'static str,
        dangerous: bool,
        description: &'static str,
    },
    ServerBanner,
    DefaultPage {
        path: &'static str,
    },
    ErrorPage {
        path: &'static str,
    },
    Redirect {
        path: &'static str,
        description: &'static str,
    },
    Payload {
        parameter: String,
        payload: &'static str,
        class: PayloadClass,
        expected_delay: Option<Duration>,
    },
}

impl WorkItem {
    /// Category tag that must be enabled for this item to run
    pub fn gate(&self) -> ProbeCategory {
        match self {
            WorkItem::File { .. } => ProbeCategory::Files,
            WorkItem::Header { .. } | WorkItem::TransportSecurity { .. } => ProbeCategory::Headers,
            WorkItem::Credential { .. } | WorkItem::DefaultPage { .. } => ProbeCategory::Defaults,
            WorkItem::Method { .. }
            | WorkItem::ServerBanner
            | WorkItem::ErrorPage { .. }
            | WorkItem::Redirect { .. } => ProbeCategory::Server,
            WorkItem::Payload { class, .. } if class.is_xss() => ProbeCategory::Xss,
            WorkItem::Payload { .. } => ProbeCategory::Sqli,
        }
    }

    /// Short label for logs
    pub fn describe(&self) -> String {
        match self {
            WorkItem::File { path, .. } => format!("file {path}"),
            WorkItem::Header { name, .. } => format!("header {name}"),
            WorkItem::TransportSecurity { .. } => "transport security".to_string(),
            WorkItem::Credential {
                login_url,
                username,
                ..
            } => format!("credential {username} at {login_url}"),
            WorkItem::Method { verb, .. } => format!("method {verb}"),
            WorkItem::ServerBanner => "server banner".to_string(),
            WorkItem::DefaultPage { path } => format!("default page {path}"),
            WorkItem::ErrorPage { path } => format!("error page {path}"),
            WorkItem::Redirect { path, .. } => format!("redirect {path}"),
            WorkItem::Payload {
                parameter, class, ..
            } => format!("{class} payload on {parameter}"),
        }
    }

    /// Builds the HTTP request for this item against `target`
    pub fn build_request(&self, target: &ScanTarget) -> Result<ProbeRequest> {
        let request = match self {
            WorkItem::File { url, kind, .. } => {
                let limit = match kind {
                    FileKind::DirectoryListing => LISTING_BODY_LIMIT,
                    FileKind::Sensitive | FileKind::Backup => FILE_BODY_LIMIT,
                };
                ProbeRequest::get(url.as_str(), limit)
            }
            WorkItem::Header { .. } | WorkItem::TransportSecurity { .. } | WorkItem::ServerBanner => {
                ProbeRequest::get(target.base_url.as_str(), FILE_BODY_LIMIT)
                    .with_method(target.method.clone())
            }
            WorkItem::Credential {
                login_url,
                username,
                password,
                ..
            } => ProbeRequest::get(login_url.as_str(), LISTING_BODY_LIMIT)
                .with_method(Method::POST)
                .with_form(credential_form(username, password))
                .without_redirects(),
            WorkItem::Method { verb, .. } => {
                let method = Method::from_bytes(verb.as_bytes())
                    .map_err(|_| ProbeError::ConfigError(format!("Invalid HTTP verb '{verb}'")))?;
                ProbeRequest::get(target.base_url.as_str(), FILE_BODY_LIMIT).with_method(method)
            }
            WorkItem::DefaultPage { path } => {
                ProbeRequest::get(target.url_for(path), PAGE_BODY_LIMIT)
            }
            WorkItem::ErrorPage { path } => {
                ProbeRequest::get(target.url_for(path), MAX_RESPONSE_SIZE)
            }
            WorkItem::Redirect { path, .. } => {
                ProbeRequest::get(target.url_for(path), FILE_BODY_LIMIT).without_redirects()
            }
            WorkItem::Payload {
                parameter, payload, ..
            } => payload_request(target, parameter, payload),
        };

        Url::parse(&request.url)?;
        Ok(request)
    }
}

/// Login form body. Field names vary between applications, so the common ones are all sent.
pub fn credential_form(username: &str, password: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("username", username)
        .append_pair("user", username)
        .append_pair("email", username)
        .append_pair("password", password)
        .append_pair("pass", password)
        .finish()
}

fn payload_request(target: &ScanTarget, parameter: &str, payload: &str) -> ProbeRequest {
    if target.method == Method::POST {
        let base = target.post_data.as_deref().unwrap_or("");
        let body = with_form_param(base, parameter, payload);
        ProbeRequest::get(target.base_url.as_str(), MAX_RESPONSE_SIZE)
            .with_method(Method::POST)
            .with_form(body)
    } else {
        let url = with_query_param(&target.base_url, parameter, payload);
        ProbeRequest::get(url.as_str(), MAX_RESPONSE_SIZE).with_method(target.method.clone())
    }
}

/// Replaces `name` in the URL's query (or appends it), keeping other parameters in order
pub fn with_query_param(base: &Url, name: &str, value: &str) -> Url {
    let pairs = replace_pair(
        base.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        name,
        value,
    );
    let mut url = base.clone();
    url.query_pairs_mut().clear().extend_pairs(&pairs);
    url
}

/// Same as [`with_query_param`] for a form-encoded body
pub fn with_form_param(body: &str, name: &str, value: &str) -> String {
    let pairs = replace_pair(
        form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        name,
        value,
    );
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&pairs)
        .finish()
}

fn replace_pair(mut pairs: Vec<(String, String)>, name: &str, value: &str) -> Vec<(String, String)> {
    let mut replaced = false;
    for (k, v) in pairs.iter_mut() {
        if k == name {
            *v = value.to_string();
            replaced = true;
        }
    }
    if !replaced {
        pairs.push((name.to_string(), value.to_string()));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;

    fn target(url: &str) -> ScanTarget {
        ScanTarget::new(url).unwrap()
    }

    #[test]
    fn test_query_injection_replaces_existing_parameter() {
        let base = Url::parse("http://example.com/search?q=shoes&page=2").unwrap();
        let url = with_query_param(&base, "q", "' OR 1=1--");
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "' OR 1=1--".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );

        let url = with_query_param(&base, "id", "1");
        assert_eq!(url.query_pairs().count(), 3);
    }

    #[test]
    fn test_form_injection() {
        let body = with_form_param("user=bob&comment=hi", "comment", "<svg onload=alert(1)>");
        let pairs: Vec<_> = form_urlencoded::parse(body.as_bytes()).into_owned().collect();
        assert_eq!(pairs[0], ("user".to_string(), "bob".to_string()));
        assert_eq!(
            pairs[1],
            ("comment".to_string(), "<svg onload=alert(1)>".to_string())
        );
    }

    #[test]
    fn test_credential_request_does_not_follow_redirects() {
        let item = WorkItem::Credential {
            login_url: "http://example.com/login".to_string(),
            username: "admin",
            password: "admin",
            context: "admin panel",
        };
        let req = item.build_request(&target("http://example.com")).unwrap();
        assert_eq!(req.method, Method::POST);
        assert!(!req.follow_redirects);
        let body = req.form_body.unwrap();
        assert!(body.contains("username=admin"));
        assert!(body.contains("pass=admin"));
        assert_eq!(item.gate(), ProbeCategory::Defaults);
    }

    #[test]
    fn test_file_request_ceilings() {
        let t = target("http://example.com/");
        let sensitive = WorkItem::File {
            url: t.url_for("/.env"),
            path: "/.env".to_string(),
            risk: RiskLevel::High,
            label: "env".to_string(),
            kind: FileKind::Sensitive,
        };
        let listing = WorkItem::File {
            url: t.url_for("/uploads"),
            path: "/uploads".to_string(),
            risk: RiskLevel::Medium,
            label: "listing".to_string(),
            kind: FileKind::DirectoryListing,
        };
        let req = sensitive.build_request(&t).unwrap();
        assert_eq!(req.url, "http://example.com/.env");
        assert_eq!(req.body_limit, FILE_BODY_LIMIT);
        assert_eq!(listing.build_request(&t).unwrap().body_limit, LISTING_BODY_LIMIT);
    }

    #[test]
    fn test_payload_delivery_follows_target_method() {
        let item = WorkItem::Payload {
            parameter: "id".to_string(),
            payload: "'",
            class: PayloadClass::ErrorBased,
            expected_delay: None,
        };

        let get = item.build_request(&target("http://example.com/item")).unwrap();
        assert_eq!(get.method, Method::GET);
        assert_eq!(get.url, "http://example.com/item?id=%27");
        assert!(get.form_body.is_none());

        let post_target = ScanTarget::from_config(&ScanConfig {
            target: "http://example.com/item".to_string(),
            method: "POST".to_string(),
            post_data: Some("id=1&name=x".to_string()),
            ..ScanConfig::default()
        })
        .unwrap();
        let post = item.build_request(&post_target).unwrap();
        assert_eq!(post.method, Method::POST);
        assert_eq!(post.form_body.as_deref(), Some("id=%27&name=x"));
    }

    #[test]
    fn test_gates() {
        let xss = WorkItem::Payload {
            parameter: "q".to_string(),
            payload: "<svg/onload=alert('XSS')>",
            class: PayloadClass::XssFilterBypass,
            expected_delay: None,
        };
        assert_eq!(xss.gate(), ProbeCategory::Xss);
        assert_eq!(
            WorkItem::TransportSecurity { https: true }.gate(),
            ProbeCategory::Headers
        );
        assert_eq!(WorkItem::ServerBanner.gate(), ProbeCategory::Server);
        assert_eq!(
            WorkItem::DefaultPage { path: "/" }.gate(),
            ProbeCategory::Defaults
        );
    }

    #[test]
    fn test_invalid_verb_is_a_construction_error() {
        let item = WorkItem::Method {
            verb: "BAD VERB",
            dangerous: true,
            description: "",
        };
        assert!(item.build_request(&target("http://example.com")).is_err());
    }
}
