//! Response classification: one work item plus its response in, at most one finding out
//!
//! Everything here is pure. No I/O, no shared state, and the same inputs always
//! produce the same finding (apart from its generated id).

use crate::http::ProbeResponse;
use crate::models::Finding;
use crate::patterns::Signatures;
use crate::scanner::work::WorkItem;
use crate::scanner::{credentials, defaults, files, headers, injection, server};

/// Classifies a response using the process-wide signature tables
pub fn classify(item: &WorkItem, resp: &ProbeResponse) -> Option<Finding> {
    classify_with(item, resp, Signatures::global())
}

pub fn classify_with(item: &WorkItem, resp: &ProbeResponse, sigs: &Signatures) -> Option<Finding> {
    match item {
        WorkItem::File {
            path,
            risk,
            label,
            kind,
            ..
        } => files::classify_file(path, *risk, label, *kind, resp, sigs),
        WorkItem::Header {
            name,
            accepted_values,
            risk,
            required,
            description,
        } => headers::classify_header(name, accepted_values, *risk, *required, description, resp),
        WorkItem::TransportSecurity { https } => headers::classify_transport_security(*https, resp),
        WorkItem::Credential {
            username,
            password,
            context,
            ..
        } => credentials::classify_login(username, password, context, resp),
        WorkItem::Method {
            verb,
            dangerous,
            description,
        } => server::classify_method(verb, *dangerous, description, resp),
        WorkItem::ServerBanner => server::classify_banner(resp, sigs),
        WorkItem::DefaultPage { path } => defaults::classify_default_page(path, resp, sigs),
        WorkItem::ErrorPage { .. } => server::classify_error_page(resp, sigs),
        WorkItem::Redirect { description, .. } => server::classify_redirect(description, resp),
        WorkItem::Payload {
            parameter,
            payload,
            class,
            expected_delay,
        } => {
            if class.is_xss() {
                injection::xss::classify_xss(parameter, payload, *class, resp)
            } else {
                injection::sqli::classify_sqli(parameter, payload, *class, *expected_delay, resp, sigs)
            }
        }
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
