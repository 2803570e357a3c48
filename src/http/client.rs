//! Request executor: shared HTTP clients, bounded body reads and request tracking

use crate::config::ScanTarget;
use crate::error::Result;
use crate::http::response::{Exchange, ProbeResponse};
use crate::http::transport;
use crate::models::{ScanError, ScanErrorKind};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{redirect, Client, Method};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Read ceiling for existence checks on sensitive and backup files
pub const FILE_BODY_LIMIT: usize = 10 * 1024;
/// Read ceiling for directory listings and login responses
pub const LISTING_BODY_LIMIT: usize = 50 * 1024;
/// Read ceiling for login and default pages
pub const PAGE_BODY_LIMIT: usize = 100 * 1024;
/// Hard cap for any response; also the ceiling for error pages and payload responses
pub const MAX_RESPONSE_SIZE: usize = 1024 * 1024;

/// One fully described probe request
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub method: Method,
    pub url: String,
    /// `application/x-www-form-urlencoded` body
    pub form_body: Option<String>,
    /// Bytes of body to buffer before reading stops
    pub body_limit: usize,
    pub follow_redirects: bool,
}

impl ProbeRequest {
    pub fn get(url: impl Into<String>, body_limit: usize) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            form_body: None,
            body_limit,
            follow_redirects: true,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_form(mut self, body: impl Into<String>) -> Self {
        self.form_body = Some(body.into());
        self
    }

    /// Keeps 3xx responses observable instead of following them
    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }
}

/// Executes probe requests against one target.
///
/// Cloning is cheap; clones share connection pools and the request counter.
#[derive(Clone)]
pub struct Executor {
    client: Client,
    no_redirect_client: Client,
    custom_headers: HeaderMap,
    target: Arc<ScanTarget>,
    request_count: Arc<AtomicU64>,
}

impl Executor {
    /// Builds both HTTP clients for the target
    pub fn new(target: Arc<ScanTarget>) -> Result<Self> {
        let client = build_client(&target, redirect::Policy::limited(10))?;
        let no_redirect_client = build_client(&target, redirect::Policy::none())?;
        let custom_headers = parse_custom_headers(&target.custom_headers);

        Ok(Self {
            client,
            no_redirect_client,
            custom_headers,
            target,
            request_count: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn target(&self) -> &ScanTarget {
        &self.target
    }

    /// Total number of requests sent so far
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Sends the request and reads the body, all within the target's timeout.
    ///
    /// Transport failures come back as classified [`ScanError`]s. Problems that
    /// still leave usable evidence (oversized or mis-encoded bodies) are
    /// returned as warnings on the [`Exchange`].
    pub async fn execute(&self, request: &ProbeRequest) -> std::result::Result<Exchange, ScanError> {
        let client = if request.follow_redirects {
            &self.client
        } else {
            &self.no_redirect_client
        };

        let mut builder = client
            .request(request.method.clone(), &request.url)
            .headers(self.custom_headers.clone());
        if let Some(body) = &request.form_body {
            builder = builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.clone());
        }

        self.request_count.fetch_add(1, Ordering::Relaxed);
        debug!("{} {}", request.method, request.url);

        let deadline = self.target.request_timeout;
        match tokio::time::timeout(deadline, read_exchange(builder, request.body_limit)).await {
            Ok(Ok(exchange)) => Ok(exchange),
            Ok(Err(e)) => {
                let err = transport::from_reqwest(e);
                warn!("Request to {} failed: {}", request.url, err);
                Err(err)
            }
            Err(_) => {
                warn!("Request to {} exceeded {:?}", request.url, deadline);
                Err(ScanError::new(
                    ScanErrorKind::Timeout,
                    format!("{} did not complete within {deadline:?}", request.url),
                ))
            }
        }
    }
}

fn build_client(target: &ScanTarget, policy: redirect::Policy) -> Result<Client> {
    Ok(Client::builder()
        .timeout(target.request_timeout)
        .user_agent(&target.user_agent)
        .redirect(policy)
        .danger_accept_invalid_certs(target.accept_invalid_certs)
        .build()?)
}

/// Parses `"Name: Value"` strings, skipping anything that is not a valid header
pub fn parse_custom_headers(raw: &[String]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for entry in raw {
        let Some((name, value)) = entry.split_once(':') else {
            debug!("Skipping custom header without ':' {entry:?}");
            continue;
        };
        match (
            HeaderName::from_bytes(name.trim().as_bytes()),
            HeaderValue::from_str(value.trim()),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => debug!("Skipping invalid custom header {entry:?}"),
        }
    }
    headers
}

async fn read_exchange(
    builder: reqwest::RequestBuilder,
    body_limit: usize,
) -> reqwest::Result<Exchange> {
    let started = Instant::now();
    let mut response = builder.send().await?;

    let url = response.url().to_string();
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let mut warnings = Vec::new();

    if let Some(declared) = response.content_length() {
        if declared > MAX_RESPONSE_SIZE as u64 {
            warnings.push(ScanError::new(
                ScanErrorKind::BodyTooLarge,
                format!("{url} declares {declared} bytes, read at most {body_limit}"),
            ));
        }
    }

    let limit = body_limit.min(MAX_RESPONSE_SIZE);
    let mut bytes = Vec::new();
    let mut truncated = false;
    while let Some(chunk) = response.chunk().await? {
        let room = limit - bytes.len();
        if chunk.len() >= room {
            bytes.extend_from_slice(&chunk[..room]);
            truncated = true;
            break;
        }
        bytes.extend_from_slice(&chunk);
    }

    let (body, valid) = decode_body(bytes, truncated);
    if !valid {
        warnings.push(ScanError::new(
            ScanErrorKind::InvalidEncoding,
            format!("{url} returned a body that is not valid UTF-8"),
        ));
    }

    Ok(Exchange {
        response: ProbeResponse {
            url,
            status,
            headers,
            body,
            elapsed: started.elapsed(),
        },
        warnings,
    })
}

/// Decodes a body as UTF-8. A multi-byte sequence cut by the read ceiling is
/// dropped; any other invalid byte becomes U+FFFD and `false` is returned.
pub fn decode_body(mut bytes: Vec<u8>, truncated: bool) -> (String, bool) {
    if truncated {
        if let Err(e) = std::str::from_utf8(&bytes) {
            if e.error_len().is_none() {
                bytes.truncate(e.valid_up_to());
            }
        }
    }

    match String::from_utf8(bytes) {
        Ok(body) => (body, true),
        Err(e) => (String::from_utf8_lossy(e.as_bytes()).into_owned(), false),
    }
}
